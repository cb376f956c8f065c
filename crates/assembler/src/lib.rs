//! Per-chain transaction queue and epoch-timed block building (spec §4.4).

mod build;
mod error;
mod ordering;
mod worker;

pub use build::build_block;
pub use error::AssemblerError;
pub use ordering::order;
pub use worker::{spawn, AssemblerConfig, AssemblerHandle};

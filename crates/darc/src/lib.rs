//! Distributed Access Right Controls: hierarchical delegation structures
//! authorizing subjects to perform actions on keys (spec §4.2).

mod darc;
mod resolve;
mod verify;

pub use darc::{Darc, Rule, Subject, USER_RULE};
pub use resolve::{resolve, DarcResolver, MalformedReason, Outcome};
pub use verify::{authorize, Authorization};

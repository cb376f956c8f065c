//! OmniLedger standalone node binary: loads configuration, initializes
//! logging, and runs a single-process ledger service against an in-memory
//! substrate (spec §1 Non-goals excludes real multi-node transport; this
//! binary is the dev/standalone mode spec §6 describes).

use clap::Parser;
use omniledger_darc::{Darc, Rule, Subject};
use omniledger_node::{build_service, init_logging, NodeConfig, DEFAULT_VALUE_KIND};
use omniledger_types::{Action, Key, KeyPair, Roster, Transaction, ACTION_ADD_GENESIS};

#[derive(Parser)]
#[command(name = "omniledger-node")]
#[command(about = "Standalone OmniLedger ledger service node")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file (spec §6 "Configuration").
    #[arg(short, long)]
    config: Option<String>,

    /// Override the configured epoch length, in seconds.
    #[arg(long)]
    epoch_secs: Option<u64>,

    /// Override the configured bucket file directory.
    #[arg(long)]
    bucket_dir: Option<String>,

    /// Override the configured tracing filter directive.
    #[arg(long)]
    log_filter: Option<String>,
}

/// Install a demo chain owned by a fixed key, so the node is immediately
/// useful for manually exercising the service once a transport is layered
/// on top (real wire framing is out of scope here, spec §1 Non-goals).
fn create_demo_chain(service: &omniledger_service::Service) -> anyhow::Result<()> {
    let owner = KeyPair::from_seed(&[0u8; 32]);
    let darc = Darc::genesis(
        vec![Rule::new(ACTION_ADD_GENESIS, vec![Subject::Key(owner.public_key())])],
        "demo chain owner",
    );
    let key = Key::new(darc.id(), b"greet".to_vec());
    let body = || Transaction::new(Action::Create, key.clone(), DEFAULT_VALUE_KIND.into(), b"hello, omniledger".to_vec());
    let probe = body().signed(owner.public_key(), owner.sign(b"placeholder"));
    let message = probe.genesis_signing_message(darc.id());
    let genesis_tx = body().signed(owner.public_key(), owner.sign(&message));

    let block = service.create_genesis(
        omniledger_service::CURRENT_VERSION,
        Roster::new(vec![owner.public_key()]),
        darc,
        genesis_tx,
    )?;
    tracing::info!(chain = %block.chain_id, "demo chain genesis committed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => NodeConfig::from_file(path)?,
        None => NodeConfig::default(),
    };
    let config = config.with_overrides(cli.epoch_secs, cli.bucket_dir, cli.log_filter);

    init_logging(&config.logging);

    tracing::info!(
        epoch = ?config.epoch(),
        bucket_dir = %config.bucket_file_path,
        "starting omniledger node"
    );

    let service = build_service(&config);
    create_demo_chain(&service)?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, draining in-flight epochs");

    Ok(())
}

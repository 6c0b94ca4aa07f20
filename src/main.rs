//! lazykv demo
//!
//! Builds a store from environment configuration, starts the sweeper if
//! enabled, and replays a short session through the command handler.
//! Set `RUST_LOG=debug` to watch the store and sweeper at work.

use lazykv::storage::{ExpiringStore, ExpirySweeper};
use lazykv::{CommandHandler, StoreConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SESSION: &[&[&str]] = &[
    &["SET", "name", "arun"],
    &["GET", "name"],
    &["DEL", "name"],
    &["GET", "name"],
    &["SET", "counter", "10"],
    &["INCR", "counter"],
    &["DECR", "counter"],
    &["SET", "session", "token", "1"],
    &["TTL", "session"],
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = StoreConfig::from_env()?;
    let store = Arc::new(ExpiringStore::with_config(&config));
    let _sweeper = ExpirySweeper::start_if_enabled(Arc::clone(&store), &config);

    info!(version = lazykv::VERSION, shards = store.num_shards(), "lazykv demo starting");

    let handler = CommandHandler::new(Arc::clone(&store));
    for args in SESSION {
        println!("{} -> {}", args.join(" "), handler.execute_args(args.iter().copied()));
    }

    tokio::time::sleep(Duration::from_millis(1100)).await;
    println!("TTL session -> {}", handler.execute_args(["TTL", "session"]));

    let stats = store.stats();
    info!(
        keys = stats.keys,
        expired = stats.expired,
        "lazykv demo finished"
    );

    Ok(())
}

mod decoding;
mod pipeline;
mod rpc;
mod state;
mod store;
mod types;

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use decoding::RawLog;
use pipeline::{build_registry, AggregationEngine};
use rpc::RpcClient;
use state::RpcStateRegistry;
use store::PgStore;
use types::config::AggregatorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AggregatorConfig::load(Path::new("config/config.json"))?;
    load_required_env_vars(&config)?;

    let rpc_url = env::var(&config.rpc_url_env_var)
        .with_context(|| format!("env var {} not set", config.rpc_url_env_var))?;
    let database_url = env::var(&config.database_url_env_var)
        .with_context(|| format!("env var {} not set", config.database_url_env_var))?;

    let store = PgStore::new(&database_url)
        .await
        .context("failed to create database pool")?;
    store
        .run_migrations()
        .await
        .context("failed to run database migrations")?;
    let store = Arc::new(store);

    let client = Arc::new(RpcClient::from_url(&rpc_url)?);
    let registries = Arc::new(RpcStateRegistry::new(client, &config.registries));

    let registry = Arc::new(build_registry());
    let engine = AggregationEngine::new(
        registry,
        store,
        registries.clone(),
        registries,
        config.totals_policy,
    );

    tracing::info!(
        "Aggregator ready (rent registry {}, spectate registry {}, totals policy {:?})",
        config.registries.rent,
        config.registries.spectate,
        config.totals_policy
    );

    let capacity = config.channel_capacity.unwrap_or(1000);
    let (log_tx, log_rx) = mpsc::channel::<RawLog>(capacity);

    let mut tasks: JoinSet<anyhow::Result<()>> = JoinSet::new();

    tasks.spawn(async move {
        read_stdin_logs(log_tx).await.context("log input failed")
    });

    tasks.spawn(async move {
        engine
            .run(log_rx)
            .await
            .context("aggregation engine failed")
    });

    while let Some(result) = tasks.join_next().await {
        result.context("pipeline task panicked")??;
    }

    tracing::info!("All events processed");
    Ok(())
}

/// Ensures all required env vars are set, loading .env if needed.
fn load_required_env_vars(config: &AggregatorConfig) -> anyhow::Result<()> {
    let required = [
        config.rpc_url_env_var.as_str(),
        config.database_url_env_var.as_str(),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|var| env::var(var).is_err())
        .copied()
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    dotenvy::dotenv().with_context(|| {
        format!(
            "Missing env vars {:?} and failed to load .env file",
            missing
        )
    })?;

    let still_missing: Vec<&str> = required
        .iter()
        .filter(|var| env::var(var).is_err())
        .copied()
        .collect();

    anyhow::ensure!(
        still_missing.is_empty(),
        "Missing required env vars after loading .env: {:?}",
        still_missing
    );

    Ok(())
}

/// Read JSON-lines raw logs from stdin and feed them to the engine in
/// order. Blank lines are skipped; a malformed line is a hard error.
async fn read_stdin_logs(tx: mpsc::Sender<RawLog>) -> anyhow::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut line_number: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let log: RawLog = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid log record on line {}", line_number))?;

        // A closed receiver means the engine stopped; its error surfaces
        // from the other task.
        if tx.send(log).await.is_err() {
            break;
        }
    }

    Ok(())
}

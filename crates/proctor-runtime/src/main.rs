//! proctor: interview proctoring runtime binary.
//! Feeds detection snapshots into a violation manager and streams its
//! decisions to stdout as JSON lines. Logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;

use proctor_core::ManagerConfig;
use proctor_core::perception::PerceptionPolicy;

mod cli;
mod controller;
mod live;
mod replay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("PROCTOR_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(io::stderr)
        .init();

    match args.command {
        cli::Command::Replay(opts) => {
            let config = ManagerConfig::with_pause_ms(opts.session.pause_ms);
            let stdout = io::stdout().lock();
            let summary = match &opts.input {
                Some(path) => {
                    let file = File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    replay::run_replay(BufReader::new(file), stdout, config)?
                }
                None => replay::run_replay(io::stdin().lock(), stdout, config)?,
            };
            tracing::info!(
                records = summary.records,
                skipped = summary.skipped,
                phone = summary.counts.phone,
                multiple_people = summary.counts.multiple_people,
                "replay finished"
            );
            if let (Some(path), Some(record)) = (&opts.session.record, &summary.termination) {
                controller::write_record(path, record)?;
            }
        }
        cli::Command::Live(opts) => {
            let config = ManagerConfig::with_pause_ms(opts.session.pause_ms);
            let policy = match &opts.policy {
                Some(path) => {
                    let raw = std::fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    serde_json::from_str(&raw)
                        .with_context(|| format!("invalid perception policy {}", path.display()))?
                }
                None => PerceptionPolicy::default(),
            };

            tracing::info!(pause_ms = config.pause_ms, tick_ms = opts.tick_ms, "proctor live starting");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let summary = live::run_live(stdin, io::stdout(), config, policy, opts.tick_ms).await?;
            tracing::info!(
                frames = summary.frames,
                phone = summary.counts.phone,
                multiple_people = summary.counts.multiple_people,
                "proctor live stopped"
            );
            if let (Some(path), Some(record)) = (&opts.session.record, &summary.termination) {
                controller::write_record(path, record)?;
            }
        }
    }

    Ok(())
}

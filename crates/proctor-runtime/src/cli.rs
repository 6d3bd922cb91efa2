//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "proctor", about = "interview proctoring violation monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay recorded snapshots (JSON lines) and print manager events
    Replay(ReplayOpts),
    /// Read live detection frames from stdin and print manager events
    Live(LiveOpts),
}

#[derive(clap::Args, Clone)]
pub struct SessionOpts {
    /// Pause window after a warning, in milliseconds
    #[arg(long, env = "PROCTOR_PAUSE_MS", default_value = "5000")]
    pub pause_ms: u64,

    /// Write the termination record (JSON) to this path
    #[arg(long)]
    pub record: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ReplayOpts {
    /// Input file (default: stdin)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionOpts,
}

#[derive(clap::Args)]
pub struct LiveOpts {
    /// Resume check interval in milliseconds
    #[arg(long, env = "PROCTOR_TICK_MS", default_value = "100")]
    pub tick_ms: u64,

    /// Perception policy (JSON) overriding class names and score thresholds
    #[arg(long)]
    pub policy: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionOpts,
}

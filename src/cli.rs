use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Consultant task and external-dependency tracker.
/// Data lives under ~/.tasktrack or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "tt", version, about = "Track consultant tasks, external dependencies and team stats")]
pub struct Cli {
    /// Directory holding the snapshot, session and remote export files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

use lrcsync::MultiTag;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lrcsync")]
#[command(about = "Parse timed captions and follow them along a playback position")]
pub struct Cli {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// How to treat lines with several leading time tags
    #[arg(long, global = true, value_enum)]
    pub multi_tag: Option<MultiTag>,

    /// Shift timestamps by the file's [offset:] header
    #[arg(long, global = true)]
    pub apply_offset: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a caption file and print the normalised timeline
    Parse(ParseCmd),
    /// Read playback positions (seconds, one per line) from stdin and print each change of line
    Follow(FollowCmd),
    /// Step through a caption file at the sampling interval and print each change of line
    Simulate(SimulateCmd),
    /// List playable tracks in a library directory or listing file
    Scan(ScanCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, clap::Args)]
pub struct ParseCmd {
    /// Caption file, or '-' for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Print JSON instead of caption text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct FollowCmd {
    /// Caption file
    pub captions: String,
}

#[derive(Debug, clap::Args)]
pub struct SimulateCmd {
    /// Caption file
    pub captions: String,

    /// Track duration in seconds (defaults to the last caption's timestamp)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Sampling interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Sleep for the interval between samples
    #[arg(long)]
    pub realtime: bool,
}

#[derive(Debug, clap::Args)]
pub struct ScanCmd {
    /// Library root directory
    pub root: PathBuf,

    /// Directory inside the root to scan
    pub dir: Option<String>,

    /// Read entries from a JSON listing instead of the directory
    #[arg(long, value_name = "FILE")]
    pub listing: Option<PathBuf>,

    /// Also load each caption file and report its line count
    #[arg(long)]
    pub load: bool,
}

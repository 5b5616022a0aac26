use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "diffreport",
    about = "Typed change reports between two JSON snapshots",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (overrides the config file)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML file with default settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two snapshots and print every change
    Compare(CompareArgs),
    /// Show the kind of every top-level property of a snapshot
    Kinds(KindsArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    pub past: PathBuf,
    pub current: PathBuf,
    /// Category label of the comparison root
    #[arg(short, long)]
    pub category: Option<String>,
    /// Key of the comparison root
    #[arg(short, long)]
    pub key: Option<String>,
    /// Treat a missing snapshot file as an absent (null) snapshot
    #[arg(long)]
    pub allow_missing: bool,
}

#[derive(Args)]
pub struct KindsArgs {
    pub file: PathBuf,
}

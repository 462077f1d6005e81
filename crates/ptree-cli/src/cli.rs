use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ptree",
    about = "Plot configuration tree: merge updates and inspect the key schema",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge JSON update files into a fresh tree and print the result
    Merge(MergeArgs),
    /// Show which level owns a key, or list every key by level
    Schema(SchemaArgs),
    /// Show how a combined id string resolves
    Ids(IdsArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Files holding one JSON object or an array of objects
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Never clear the addressed plot before merging
    #[arg(long)]
    pub hold: bool,
    /// Label attached to each merge completion event
    #[arg(long)]
    pub label: Option<String>,
    /// TOML merge configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SchemaArgs {
    pub key: Option<String>,
}

#[derive(Args)]
pub struct IdsArgs {
    /// Combined id such as "2:1:3" or "2.1:3"
    pub id: String,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "retrofix",
    version,
    about = "Idempotent, drift-aware patching of installed npm package trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Config file (default: ./retrofix.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// The CLI package's dist/src directory (overrides BASE)
    #[arg(long, global = true, value_name = "DIR")]
    pub base: Option<PathBuf>,
    /// Directory holding the patch sub-directories
    #[arg(long, global = true, value_name = "DIR")]
    pub patch_dir: Option<PathBuf>,
    /// Only print the summary
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply every patch in order
    Patch {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Restrict to these patch IDs (repeatable)
        #[arg(long, value_name = "ID")]
        only: Vec<String>,
    },
    /// Verify sentinels against the installation
    Check {
        #[arg(long, value_name = "ID")]
        only: Vec<String>,
    },
    /// List discovered patches
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fxcache")]
#[command(about = "Inspect and prune versioned FX cache folders", long_about = None)]
pub struct Cli {
    /// Cache root to work in (overrides `cache_root` from Config.toml)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List cache folders under the root
    Folders {
        /// Cache kind: All, .bgeo.sc, .vdb or .abc
        #[arg(long, short)]
        filter: Option<String>,
        /// Only show folders containing this text
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List frame ranges grouped by name, revision and kind
    Sequences {
        folder: PathBuf,
        /// Only show sequences containing this text
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show size, frame count and modification time of one revision
    Describe {
        folder: PathBuf,
        base_name: String,
        /// Revision number, with or without the `v` prefix
        revision: String,
    },
    /// Delete every revision that is not the latest for its name
    Prune {
        folder: PathBuf,
        /// Show what would be deleted without deleting it
        #[arg(long)]
        dry_run: bool,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the full path of a cache folder
    Path { folder: PathBuf },
    /// Print configuration values
    PrintConfig,
}

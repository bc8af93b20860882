use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cinesync")]
#[command(author, version, about = "Movie catalog reconciliation against disk and Radarr")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the library folders and match every file against TMDB
    Scan {
        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Match a single file
    Match {
        /// Media file to match
        #[arg(required = true)]
        file: PathBuf,

        /// Re-match even if the file is already in the catalog
        #[arg(long)]
        force: bool,
    },

    /// Reconcile the catalog with every movie in Radarr
    Sync {
        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reconcile a single Radarr movie
    SyncMovie {
        /// Radarr movie ID
        #[arg(required = true)]
        radarr_id: i64,
    },

    /// Handle a saved Radarr webhook payload
    Webhook {
        /// JSON file with the webhook body
        #[arg(required = true)]
        payload: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

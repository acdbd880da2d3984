use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::DEFAULT_TOKEN_DURATION_DAYS;

#[derive(Parser, Debug)]
#[command(name = "tempfiles")]
#[command(version)]
#[command(about = "Upload files and text snippets to a tempfiles server", long_about = None)]
pub struct Cli {
    /// Server base URL (e.g., https://files.example.com)
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// API token sent as a bearer credential
    #[arg(long, env = "TEMPFILES_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive upload form (default)
    Ui,
    /// Upload a file
    Upload {
        /// File to upload
        path: PathBuf,
    },
    /// Upload text read from stdin
    Paste {
        /// Extension of the synthesized file name
        #[arg(short, long)]
        ext: Option<String>,
        /// Base name of the synthesized file (defaults to "paste")
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Manage API tokens
    #[command(subcommand)]
    Token(TokenCommands),
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Create a new API token
    Create {
        /// Token name, 5 to 40 characters
        #[arg(short, long)]
        name: String,
        /// Lifetime in days
        #[arg(short, long, default_value_t = DEFAULT_TOKEN_DURATION_DAYS)]
        duration: u32,
    },
    /// Delete an API token
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show who the configured credentials belong to
    Whoami,
}

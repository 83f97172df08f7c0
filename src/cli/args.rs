//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sessioncache - timestamped values in a session store
///
/// Reads, writes and invalidates JSON values in a per-session store,
/// refusing entries older than a freshness window (at most one day).
#[derive(Parser, Debug)]
#[command(name = "sessioncache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SESSIONCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Session to operate on (defaults to storage.session from config)
    #[arg(short, long, global = true, env = "SESSIONCACHE_SESSION")]
    pub session: Option<String>,

    /// Key namespace (defaults to cache.namespace from config)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a value if it is fresh enough
    Get(GetArgs),

    /// Write a value, keeping the original creation time
    Set(SetArgs),

    /// Remove a value
    Invalidate(InvalidateArgs),

    /// List stored keys
    Keys(KeysArgs),

    /// Manage sessions
    Session(SessionArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Key to read
    pub key: String,

    /// Maximum age in minutes (capped at one day)
    #[arg(short, long, allow_negative_numbers = true)]
    pub max_age: Option<f64>,

    /// Print only the stored value, not the envelope
    #[arg(long)]
    pub data_only: bool,
}

/// Arguments for the set command
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Key to write
    pub key: String,

    /// Value as JSON; anything that is not valid JSON is stored as a string
    pub value: String,
}

/// Arguments for the invalidate command
#[derive(Parser, Debug)]
pub struct InvalidateArgs {
    /// Key to remove
    pub key: String,
}

/// Arguments for the keys command
#[derive(Parser, Debug)]
pub struct KeysArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the session command
#[derive(Parser, Debug)]
pub struct SessionArgs {
    /// Session action
    #[command(subcommand)]
    pub action: SessionAction,
}

/// Session subcommands
#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Create a session with a random id and print the id
    New,

    /// List sessions
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// End a session, deleting everything in it
    End {
        /// Session id (defaults to the current session)
        id: Option<String>,
    },

    /// End sessions not modified for a while
    Cleanup {
        /// Age threshold in hours
        #[arg(long, default_value = "24")]
        hours: u32,
    },

    /// Show the current session's directory
    Path,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config action
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.namespace)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

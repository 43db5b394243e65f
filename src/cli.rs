//! CLI argument parsing via clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage Claude Code API profiles and switch the active one.
#[derive(Debug, Parser)]
#[command(name = "ccman", version, long_version = ccman::build_info::LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./ccman.toml or ~/.config/ccman/ccman.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Override the profile collection file.
    #[arg(long = "data-file", global = true)]
    pub data_file: Option<PathBuf>,

    /// Override the Claude Code settings.json path.
    #[arg(long = "settings", global = true)]
    pub settings: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored profiles.
    #[command(alias = "ls")]
    List {
        /// Show full API keys instead of masked ones.
        #[arg(long = "show-keys")]
        show_keys: bool,
        /// Print JSON to stdout.
        #[arg(long)]
        json: bool,
    },
    /// Add a profile. The first profile becomes active automatically.
    Add {
        name: String,
        /// API base URL (http:// or https://).
        #[arg(long = "base-url")]
        base_url: String,
        /// API key. Prompted for without echo when omitted.
        #[arg(long = "api-key")]
        api_key: Option<String>,
    },
    /// Change fields of an existing profile.
    Update {
        /// Profile id or name.
        selector: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "api-key")]
        api_key: Option<String>,
        #[arg(long = "base-url")]
        base_url: Option<String>,
    },
    /// Delete a profile.
    #[command(alias = "rm")]
    Remove {
        /// Profile id or name.
        selector: String,
    },
    /// Activate a profile and write it into Claude Code settings.
    #[command(alias = "apply")]
    Use {
        /// Profile id or name.
        selector: String,
    },
    /// Show the active profile and what settings.json contains.
    Current {
        #[arg(long)]
        json: bool,
    },
    /// Show store status.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Copy the profile collection to a timestamped backup file.
    Backup,
    /// Write a commented ccman.toml template.
    Init {
        /// Replace an existing file (a backup is kept).
        #[arg(long)]
        force: bool,
    },
    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

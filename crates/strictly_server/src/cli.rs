//! Command-line interface for strictly_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Checkers - authoritative checkers session server
#[derive(Parser, Debug)]
#[command(name = "strictly_server")]
#[command(about = "Authoritative checkers rules engine and session server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP session server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable turn enforcement for new sessions
        #[arg(long)]
        free_turns: bool,
    },

    /// Print the starting board
    Board,

    /// Apply a JSON list of moves to the starting position and print the result
    Replay {
        /// File containing `[{"from": [r, c], "to": [r, c]}, ...]`
        file: PathBuf,

        /// Disable turn enforcement
        #[arg(long)]
        free_turns: bool,
    },
}

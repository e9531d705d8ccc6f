//! CLI interface for Seatgallery

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "seatgallery")]
#[command(version = "1.2.0")]
#[command(about = "Admin-managed before/after media gallery", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new seatgallery.toml configuration file
    Init,

    /// Start the HTTP server and web UI
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Run with in-memory storage instead of PostgreSQL
        #[arg(long)]
        ephemeral: bool,
    },

    /// Manage accounts in the user directory
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create an account (prompts for the password)
    Add {
        /// Username for login
        username: String,

        /// Role: ADMIN or USER
        #[arg(short, long, default_value = "USER")]
        role: String,
    },

    /// Reset an account's password (prompts for the new password)
    Passwd {
        /// Username of the account
        username: String,
    },

    /// List accounts
    List,
}

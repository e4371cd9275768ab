//! CLI entry point for Kiosk.

pub mod commands;

use clap::{Parser, Subcommand};

/// Kiosk store-session CLI
#[derive(Parser, Debug)]
#[command(name = "kiosk", version, about = "Kiosk — store session CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with explicit credentials
    Login(LoginArgs),
    /// Log in silently from persisted state or an app-provided account
    SilentLogin,
    /// Drop the stored session token and negotiate a new one
    Refresh,
    /// Show the persisted session state
    Status,
    /// Clear the persisted session state
    Logout,
}

/// Arguments for `kiosk login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account identity (email)
    pub identity: String,

    /// Account secret; read from KIOSK_SECRET when omitted
    #[arg(short, long)]
    pub secret: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

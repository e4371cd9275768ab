//! Kiosk CLI binary entry point.

use clap::Parser;
use kiosk::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login(args) => commands::handle_login(&args).await,
        Commands::SilentLogin => commands::handle_silent_login().await,
        Commands::Refresh => commands::handle_refresh().await,
        Commands::Status => commands::handle_status().await,
        Commands::Logout => commands::handle_logout().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

//! Gatehouse - command-line front end for the session-aware API client.
//!
//! Logs in, checks guarded navigation and sends authenticated requests
//! against the configured API.

mod commands;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::App;

#[derive(Parser)]
#[command(name = "gatehouse")]
#[command(version)]
#[command(about = "Session-aware API client")]
struct Cli {
    /// Build mode (dev or prod), overrides config and GATEHOUSE_MODE
    #[arg(long, global = true, value_name = "MODE")]
    mode: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        username: String,

        /// Store this token directly instead of asking the server for one
        #[arg(long)]
        token: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show whether a session is held
    Status,
    /// Navigate to a path through the route guard
    Open { path: String },
    /// Send an authenticated GET request
    Get { endpoint: String },
    /// Send an authenticated POST request with a JSON body
    Post { endpoint: String, body: String },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    info!("Gatehouse starting");

    let app = App::new(cli.mode.as_deref())?;

    match cli.command {
        Commands::Login { username, token } => app.login(&username, token).await,
        Commands::Logout => app.logout(),
        Commands::Status => {
            app.status();
            Ok(())
        }
        Commands::Open { path } => app.open(&path),
        Commands::Get { endpoint } => app.get(&endpoint).await,
        Commands::Post { endpoint, body } => app.post(&endpoint, &body).await,
    }
}

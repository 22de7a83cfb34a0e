//! Campus portal CLI - a command-line client for the student portal backend.
//!
//! Signs in with an access token issued by the portal's OAuth login, keeps
//! the session locally and exposes the profile, ticket and food-services
//! calls as subcommands.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portal_core::Config;

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "portal.log";

#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Campus portal command-line client")]
struct Cli {
    /// Backend base URL (overrides environment and config file)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Also write logs to a daily-rotated file in the cache directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the URL that starts the OAuth sign-in flow
    LoginUrl,
    /// Store an access token and fetch the signed-in user
    Login {
        /// Access token; prompted for when omitted
        #[arg(long)]
        token: Option<String>,
    },
    /// Show the signed-in user as the backend sees them
    Whoami,
    /// Show the locally stored session
    Status,
    /// Exchange the current token for a new one
    Refresh,
    /// End the session on the backend and clear local state
    Logout,
    /// Send an authenticated request and print the response
    Request {
        /// HTTP method, e.g. GET or POST
        method: String,
        /// Path relative to the backend URL, e.g. /profile
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
    /// Show the profile of the signed-in user
    Profile,
    /// Profile and this month's meal plan side by side
    Dashboard {
        /// Portal user id whose meal plan to show
        user_id: i64,
    },
    /// List mess vendors
    Vendors,
    /// List vendor meal plans
    Plans,
    /// Show a user's current meal plan selection
    MyPlan {
        user_id: i64,
    },
    /// Choose a meal plan for a month
    SelectPlan {
        plan_id: i64,
        user_id: i64,
        /// Month name, e.g. June
        month: String,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Check sign-up form fields against the portal's rules
    ValidateSignup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
/// Returns the file writer guard, which must live until exit.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    let log_dir = if cli.log_file {
        Some(config.cache_dir()?.join("logs"))
    } else {
        None
    };
    let _guard = init_tracing(log_dir);
    info!("Campus portal CLI starting");

    commands::run(cli.command, &mut config, cli.backend_url.as_deref()).await
}

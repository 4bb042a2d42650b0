//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod check;
pub mod config;
pub mod location;
pub mod resolve;
pub mod serve;

use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Resolve the current location and check delivery eligibility
#[derive(Parser)]
#[command(name = "delivery-locator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the current location
    Resolve(resolve::ResolveArgs),

    /// Show the last resolved location
    Last(location::LastArgs),

    /// Skip location setup
    Skip,

    /// Forget the stored location and skip flag
    Forget,

    /// Check whether a coordinate is inside the service area
    Check(check::CheckArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Resolve(args) => resolve::run(args).await,
        Commands::Last(args) => location::last(args),
        Commands::Skip => location::skip(),
        Commands::Forget => location::forget(),
        Commands::Check(args) => check::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}

/// Install the global subscriber; `RUST_LOG` wins over `default_level`
///
/// Logs go to stderr so formatted output on stdout stays parseable.
pub fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Look up `--format`, listing the valid names on a miss
pub(crate) fn formatter_for(name: &str) -> Result<Box<dyn OutputFormatter>> {
    get_formatter(name).ok_or_else(|| {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format '{}', expected one of: {}",
            name,
            names.join(", ")
        ))
    })
}

//! Resolve command handler
//!
//! Runs one resolution attempt and prints the record with its verdict.

use crate::cli::formatter_for;
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::position::DevicePosition;
use crate::resolver::DeviceResolver;
use crate::store::{FileLocationStore, LocationStore, MemoryLocationStore};
use clap::Args;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Latitude (skips position acquisition)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (skips position acquisition)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Don't save the result
    #[arg(long)]
    pub no_persist: bool,

    /// Print each state transition
    #[arg(long, short = 'w')]
    pub watch: bool,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> Result<()> {
    let config = Config::load()?;
    let formatter = formatter_for(&args.format)?;

    let position = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => DevicePosition::fixed(Coordinate::try_new(lat, lng)?),
        _ => DevicePosition::from_config(&config)?,
    };

    if args.no_persist {
        let resolver = DeviceResolver::from_config(&config, position, MemoryLocationStore::new())?;
        resolve_and_print(&resolver, args.watch, formatter.as_ref()).await
    } else {
        let store = FileLocationStore::from_option(config.store.path.as_deref())?;
        let resolver = DeviceResolver::from_config(&config, position, store)?;
        resolve_and_print(&resolver, args.watch, formatter.as_ref()).await
    }
}

async fn resolve_and_print<S: LocationStore + 'static>(
    resolver: &DeviceResolver<S>,
    watch: bool,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let outcome = if watch {
        let mut rx = resolver.subscribe();
        // Terminal states are reported below
        let print_transitions = async {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                if state.is_terminal() {
                    break;
                }
                println!("{}", formatter.format_state(&state)?);
            }
            Ok::<(), Error>(())
        };

        let (outcome, printed) = tokio::join!(resolver.resolve(), print_transitions);
        printed?;
        outcome
    } else {
        resolver.resolve().await
    };

    let resolution = outcome?;
    println!("{}", formatter.format_resolution(&resolution)?.trim_end());

    Ok(())
}

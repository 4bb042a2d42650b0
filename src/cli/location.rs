//! Stored location commands: last, skip, forget

use crate::cli::formatter_for;
use crate::config::Config;
use crate::error::Result;
use crate::position::ip::IpPositionSource;
use crate::record::Resolution;
use crate::store::{FileLocationStore, LocationStore};
use clap::Args;

/// Last command arguments
#[derive(Args)]
pub struct LastArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

fn open_store(config: &Config) -> Result<FileLocationStore> {
    FileLocationStore::from_option(config.store.path.as_deref())
}

/// Show the last resolved location, re-evaluated against the current service area
pub fn last(args: LastArgs) -> Result<()> {
    let config = Config::load()?;
    let formatter = formatter_for(&args.format)?;
    let state = open_store(&config)?.load()?;

    match state.last_record {
        Some(record) => {
            let resolution = Resolution::evaluate(record, &config.service_area);
            println!("{}", formatter.format_resolution(&resolution)?.trim_end());
        }
        None => println!("No location resolved yet"),
    }

    if state.setup_skipped {
        println!("(location setup was skipped)");
    }

    Ok(())
}

/// Persist the skip flag, keeping any stored record
pub fn skip() -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    let mut state = store.load()?;
    state.setup_skipped = true;
    store.save(&state)?;

    println!("Location setup skipped");
    Ok(())
}

/// Clear stored location state and the cached IP fix
pub fn forget() -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config)?;

    store.clear()?;
    IpPositionSource::new().clear_cache();

    println!("Stored location cleared ({})", store.path().display());
    Ok(())
}

//! Check command handler
//!
//! Evaluates a coordinate against the configured service area without
//! touching position sources or the store.

use crate::config::Config;
use crate::coord::Coordinate;
use crate::eligibility::{evaluate, DeliveryVerdict};
use crate::error::{Error, Result};
use clap::Args;
use serde::Serialize;

/// Check command arguments
#[derive(Args)]
pub struct CheckArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Output format (json or text)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    coordinate: Coordinate,
    service_area: &'a str,
    #[serde(flatten)]
    verdict: DeliveryVerdict,
}

/// Run the check command
pub fn run(args: CheckArgs) -> Result<()> {
    let config = Config::load()?;
    let coordinate = Coordinate::try_new(args.lat, args.lng)?;
    let verdict = evaluate(coordinate, &config.service_area);

    match args.format.to_lowercase().as_str() {
        "json" => {
            let output = CheckOutput {
                coordinate,
                service_area: config.service_area.shape(),
                verdict,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "text" => {
            let answer = if verdict.within_service_area { "inside" } else { "outside" };
            println!(
                "{} is {} the {} service area",
                coordinate,
                answer,
                config.service_area.shape()
            );
        }
        other => {
            return Err(Error::Config(format!(
                "Unknown format '{}', expected one of: json, text",
                other
            )))
        }
    }

    Ok(())
}

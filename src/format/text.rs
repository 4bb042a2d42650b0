//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::record::Resolution;
use crate::resolver::ResolverState;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format_resolution(&self, resolution: &Resolution) -> Result<String> {
        let record = &resolution.record;
        let mut output = String::new();

        output.push_str(&format!("{}\n", record.formatted_address));
        output.push_str(&format!("Coordinate: {}\n", record.coordinate));
        output.push_str(&format!("City: {}\n", record.city));
        output.push_str(&format!("State: {}\n", record.state));
        output.push_str(&format!("Country: {}\n", record.country));
        output.push_str(&format!("Quality: {}\n", record.resolution_quality));
        output.push_str(&format!(
            "Resolved: {}\n\n",
            record.resolved_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if resolution.verdict.within_service_area {
            output.push_str("Delivery: available\n");
        } else {
            output.push_str("Delivery: outside service area\n");
        }

        Ok(output)
    }

    fn format_state(&self, state: &ResolverState) -> Result<String> {
        Ok(match state {
            ResolverState::Idle => "idle".to_string(),
            ResolverState::Acquiring => "acquiring position...".to_string(),
            ResolverState::ReverseGeocoding => "looking up address...".to_string(),
            ResolverState::Resolved(resolution) => {
                format!("resolved: {}", resolution.record.formatted_address)
            }
            ResolverState::Failed(err) => format!("failed: {}", err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::eligibility::ServiceArea;
    use crate::error::ResolutionError;
    use crate::record::LocationRecord;

    #[test]
    fn test_text_format() {
        let record = LocationRecord::degraded(Coordinate::new(12.9716, 77.5946));
        let resolution = Resolution::evaluate(record, &ServiceArea::default());

        let output = TextFormatter.format_resolution(&resolution).unwrap();

        assert!(output.starts_with("12.9716, 77.5946\n"));
        assert!(output.contains("City: Unknown"));
        assert!(output.contains("Quality: degraded"));
        assert!(output.contains("Delivery: available"));
    }

    #[test]
    fn test_text_format_outside_area() {
        let record = LocationRecord::degraded(Coordinate::new(40.7128, -74.0060));
        let resolution = Resolution::evaluate(record, &ServiceArea::default());

        let output = TextFormatter.format_resolution(&resolution).unwrap();
        assert!(output.contains("outside service area"));
    }

    #[test]
    fn test_text_state() {
        let failed = ResolverState::Failed(ResolutionError::permission_denied("denied by user"));
        assert_eq!(
            TextFormatter.format_state(&failed).unwrap(),
            "failed: permission_denied: denied by user"
        );
    }
}

//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::record::Resolution;
use crate::resolver::ResolverState;

/// JSON formatter - pretty-printed resolutions, one compact line per state
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON record and verdict"
    }

    fn format_resolution(&self, resolution: &Resolution) -> Result<String> {
        Ok(serde_json::to_string_pretty(resolution)?)
    }

    fn format_state(&self, state: &ResolverState) -> Result<String> {
        Ok(serde_json::to_string(state)?)
    }
}

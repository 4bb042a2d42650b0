//! Resolver states published to subscribers

use crate::error::ResolutionError;
use crate::record::Resolution;
use serde::{Deserialize, Serialize};

/// Where the current (or last) attempt stands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ResolverState {
    #[default]
    Idle,
    Acquiring,
    ReverseGeocoding,
    Resolved(Resolution),
    Failed(ResolutionError),
}

impl ResolverState {
    /// Resolved or Failed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }

    /// Acquiring or ReverseGeocoding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Acquiring | Self::ReverseGeocoding)
    }

    /// Short state name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::ReverseGeocoding => "reverse_geocoding",
            Self::Resolved(_) => "resolved",
            Self::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for ResolverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

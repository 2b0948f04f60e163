//! Neighborhood range tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named distance threshold bucketing "neighborhood" proximity.
///
/// Tiers are ordered by radius: `Small < Medium < Large`. The discriminant
/// is the radius in meters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RangeTier {
    /// Apartment complex or a few blocks (1 km).
    Small = 1000,
    /// A typical neighborhood (3 km).
    #[default]
    Medium = 3000,
    /// A wide area around the user (6 km).
    Large = 6000,
}

impl RangeTier {
    /// All tiers, smallest first.
    pub const ALL: [RangeTier; 3] = [RangeTier::Small, RangeTier::Medium, RangeTier::Large];

    /// Radius in meters.
    #[inline]
    pub const fn meters(self) -> u32 {
        self as u32
    }

    /// Radius in kilometers.
    #[inline]
    pub fn kilometers(self) -> f64 {
        f64::from(self.meters()) / 1000.0
    }

    /// The next wider tier, or `None` for `Large`.
    pub fn next_larger(self) -> Option<RangeTier> {
        match self {
            RangeTier::Small => Some(RangeTier::Medium),
            RangeTier::Medium => Some(RangeTier::Large),
            RangeTier::Large => None,
        }
    }

    /// Lowercase identifier used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeTier::Small => "small",
            RangeTier::Medium => "medium",
            RangeTier::Large => "large",
        }
    }

    /// Short description of the area the tier covers.
    pub fn description(&self) -> &'static str {
        match self {
            RangeTier::Small => "Apartment complex or small block (1km)",
            RangeTier::Medium => "Typical neighborhood (3km)",
            RangeTier::Large => "Wide area (6km)",
        }
    }
}

impl fmt::Display for RangeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a range tier name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown range tier '{0}' (expected small, medium or large)")]
pub struct RangeTierParseError(pub String);

impl FromStr for RangeTier {
    type Err = RangeTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" | "1km" => Ok(RangeTier::Small),
            "medium" | "3km" => Ok(RangeTier::Medium),
            "large" | "6km" => Ok(RangeTier::Large),
            _ => Err(RangeTierParseError(s.to_string())),
        }
    }
}

//! Location acquisition types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;

/// Default for [`LocationOptions::high_accuracy`].
pub const DEFAULT_HIGH_ACCURACY: bool = true;

/// Default for [`LocationOptions::timeout_ms`] (10 seconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default for [`LocationOptions::max_cache_age_ms`] (5 minutes).
pub const DEFAULT_MAX_CACHE_AGE_MS: u64 = 300_000;

/// Platform error code for a denied permission (W3C Geolocation API).
pub const CODE_PERMISSION_DENIED: u16 = 1;

/// Platform error code for an unavailable position.
pub const CODE_POSITION_UNAVAILABLE: u16 = 2;

/// Platform error code for a request that timed out.
pub const CODE_TIMEOUT: u16 = 3;

/// Why a location could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationErrorKind {
    /// The platform has no location capability at all.
    #[error("Location services are not supported on this platform")]
    Unsupported,

    /// The user or platform policy refused access.
    #[error("Location permission was denied")]
    PermissionDenied,

    /// The platform could not determine a position.
    #[error("Location information is unavailable")]
    PositionUnavailable,

    /// The platform did not produce a position in time.
    #[error("Location request timed out")]
    Timeout,

    /// Any other failure.
    #[error("An unknown error occurred while getting the location")]
    Unknown,
}

impl LocationErrorKind {
    /// Map a platform failure code to an error kind.
    ///
    /// Codes follow the W3C Geolocation API; anything unrecognized is
    /// [`LocationErrorKind::Unknown`].
    pub fn from_platform_code(code: u16) -> Self {
        match code {
            CODE_PERMISSION_DENIED => LocationErrorKind::PermissionDenied,
            CODE_POSITION_UNAVAILABLE => LocationErrorKind::PositionUnavailable,
            CODE_TIMEOUT => LocationErrorKind::Timeout,
            _ => LocationErrorKind::Unknown,
        }
    }

    /// Short identifier for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationErrorKind::Unsupported => "unsupported",
            LocationErrorKind::PermissionDenied => "permission_denied",
            LocationErrorKind::PositionUnavailable => "position_unavailable",
            LocationErrorKind::Timeout => "timeout",
            LocationErrorKind::Unknown => "unknown",
        }
    }
}

/// Coarse status of a [`DetectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionStatus {
    Idle,
    Detecting,
    Succeeded,
    Failed,
}

impl DetectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStatus::Idle => "Idle",
            DetectionStatus::Detecting => "Detecting",
            DetectionStatus::Succeeded => "Succeeded",
            DetectionStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of one consumer's location detection.
///
/// ```text
/// Idle ──► Detecting ──► Succeeded { location }
///   ▲                └─► Failed { error_kind }
///   └──────── reset ◄──────────┘
/// ```
///
/// A new request may start from any state except `Detecting`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DetectionState {
    #[default]
    Idle,
    Detecting,
    Succeeded {
        location: GeoPoint,
    },
    Failed {
        error_kind: LocationErrorKind,
    },
}

impl DetectionState {
    pub fn status(&self) -> DetectionStatus {
        match self {
            DetectionState::Idle => DetectionStatus::Idle,
            DetectionState::Detecting => DetectionStatus::Detecting,
            DetectionState::Succeeded { .. } => DetectionStatus::Succeeded,
            DetectionState::Failed { .. } => DetectionStatus::Failed,
        }
    }

    /// The detected location, only present after success.
    pub fn location(&self) -> Option<GeoPoint> {
        match self {
            DetectionState::Succeeded { location } => Some(*location),
            _ => None,
        }
    }

    /// The failure kind, only present after failure.
    pub fn error_kind(&self) -> Option<LocationErrorKind> {
        match self {
            DetectionState::Failed { error_kind } => Some(*error_kind),
            _ => None,
        }
    }

    pub fn is_detecting(&self) -> bool {
        matches!(self, DetectionState::Detecting)
    }

    /// Whether a new request may be issued from this state.
    pub fn can_request(&self) -> bool {
        !self.is_detecting()
    }
}

/// Options passed through to the platform position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOptions {
    /// Ask for the most precise fix the device can give (GPS over Wi-Fi).
    pub high_accuracy: bool,
    /// How long the platform may take before failing with a timeout.
    pub timeout_ms: u64,
    /// Accept a cached fix no older than this.
    pub max_cache_age_ms: u64,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: DEFAULT_HIGH_ACCURACY,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_cache_age_ms: DEFAULT_MAX_CACHE_AGE_MS,
        }
    }
}

impl LocationOptions {
    pub fn with_high_accuracy(mut self, high_accuracy: bool) -> Self {
        self.high_accuracy = high_accuracy;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_cache_age_ms(mut self, max_cache_age_ms: u64) -> Self {
        self.max_cache_age_ms = max_cache_age_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn max_cache_age(&self) -> Duration {
        Duration::from_millis(self.max_cache_age_ms)
    }
}

/// Answer of a platform permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionState {
    Granted,
    Denied,
    /// The user has not decided yet; the request will prompt.
    Prompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_code_mapping() {
        assert_eq!(
            LocationErrorKind::from_platform_code(1),
            LocationErrorKind::PermissionDenied
        );
        assert_eq!(
            LocationErrorKind::from_platform_code(2),
            LocationErrorKind::PositionUnavailable
        );
        assert_eq!(
            LocationErrorKind::from_platform_code(3),
            LocationErrorKind::Timeout
        );
        assert_eq!(
            LocationErrorKind::from_platform_code(0),
            LocationErrorKind::Unknown
        );
        assert_eq!(
            LocationErrorKind::from_platform_code(42),
            LocationErrorKind::Unknown
        );
    }

    #[test]
    fn test_default_options() {
        let options = LocationOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout(), Duration::from_secs(10));
        assert_eq!(options.max_cache_age(), Duration::from_secs(300));
    }

    #[test]
    fn test_option_builders() {
        let options = LocationOptions::default()
            .with_high_accuracy(false)
            .with_timeout_ms(500)
            .with_max_cache_age_ms(0);
        assert!(!options.high_accuracy);
        assert_eq!(options.timeout_ms, 500);
        assert_eq!(options.max_cache_age_ms, 0);
    }

    #[test]
    fn test_detection_state_accessors() {
        let point = GeoPoint::new(37.5, 127.0);

        assert_eq!(DetectionState::default(), DetectionState::Idle);
        assert!(DetectionState::Idle.can_request());
        assert!(!DetectionState::Detecting.can_request());

        let ok = DetectionState::Succeeded { location: point };
        assert_eq!(ok.status(), DetectionStatus::Succeeded);
        assert_eq!(ok.location(), Some(point));
        assert_eq!(ok.error_kind(), None);
        assert!(ok.can_request());

        let failed = DetectionState::Failed {
            error_kind: LocationErrorKind::Timeout,
        };
        assert_eq!(failed.status(), DetectionStatus::Failed);
        assert_eq!(failed.location(), None);
        assert_eq!(failed.error_kind(), Some(LocationErrorKind::Timeout));
    }

    #[test]
    fn test_error_kind_display() {
        assert!(LocationErrorKind::PermissionDenied
            .to_string()
            .contains("denied"));
        assert_eq!(LocationErrorKind::Timeout.as_str(), "timeout");
    }
}

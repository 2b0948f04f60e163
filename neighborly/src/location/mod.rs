//! Device location acquisition
//!
//! Obtains the device's current position through a host-provided
//! [`GeolocationPlatform`] and exposes the progress as a [`DetectionState`].
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐  request   ┌────────────────────────┐
//! │ LocationAcquirer  │───────────►│ GeolocationPlatform    │
//! │  (DetectionState) │◄───────────│  (host implementation) │
//! └────────┬──────────┘  position  └────────────────────────┘
//!          │ watch
//!          ▼
//!      consumers
//! ```
//!
//! Failures are typed with [`LocationErrorKind`] so the caller can show the
//! right message. There is no automatic retry and no continuous tracking.

mod acquirer;
mod platform;
mod types;

pub use acquirer::{AcquireError, LocationAcquirer};
pub use platform::{
    position_request, GeolocationPlatform, PermissionQueryError, PlatformPositionError,
    PositionResponder, CODE_ABANDONED,
};
pub use types::{
    DetectionState, DetectionStatus, LocationErrorKind, LocationOptions, PermissionState,
    CODE_PERMISSION_DENIED, CODE_POSITION_UNAVAILABLE, CODE_TIMEOUT, DEFAULT_HIGH_ACCURACY,
    DEFAULT_MAX_CACHE_AGE_MS, DEFAULT_TIMEOUT_MS,
};

//! Mapping SDK readiness monitoring
//!
//! Third-party map SDKs load in stages: a script tag, then a global
//! namespace, then a lazily loaded maps module (sometimes only after a
//! manual load call), then the individual constructors. Any stage can stall.
//! This module polls the SDK through an [`SdkProbe`] and reports a
//! [`ProviderStatus`] until the SDK is usable or a budget runs out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ Observation ┌──────────────────┐ StatusTransition ┌─────────────┐
//! │   SdkProbe   │────────────►│ ReadinessMachine │─────────────────►│ subscribers │
//! │ (host impl)  │◄────────────│  (pure advance)  │                  └─────────────┘
//! └──────────────┘ manual load └────────▲─────────┘
//!                                       │ one poll per interval
//!                              ┌────────┴─────────┐
//!                              │ ReadinessMonitor │──► MonitorHandle (cancel, wait)
//!                              └──────────────────┘
//! ```
//!
//! [`describe_problems`] turns a [`DiagnosticFlags`] snapshot into
//! human-readable reasons; the monitor logs them when it times out.

mod diagnostics;
mod machine;
mod monitor;
mod probe;
mod status;

pub use diagnostics::{describe_problems, DiagnosticFlags, ProviderProblem, MIN_API_KEY_LEN};
pub use machine::{
    Action, Observation, ReadinessConfig, ReadinessMachine, DEFAULT_MAX_CAPABILITY_ATTEMPTS,
    DEFAULT_MAX_SCRIPT_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use monitor::{MonitorHandle, ReadinessMonitor};
pub use probe::{SdkCapability, SdkProbe};
pub use status::{ProviderStatus, StatusTransition};

//! Provider readiness status.

use std::fmt;

use serde::Serialize;

/// Where the mapping SDK is in its load sequence.
///
/// ```text
/// Unstarted → ScriptMissing → NamespaceMissing → ModuleMissing → ApisIncomplete → Ready
///                    └────────────────┴─────────────────┴───────────────┴────────► TimedOut
/// ```
///
/// Stages may be skipped (an SDK already loaded goes straight to `Ready`).
/// `Ready` and `TimedOut` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    /// No poll has run yet.
    #[default]
    Unstarted,
    /// No script tag and no namespace found.
    ScriptMissing,
    /// Script is present but the global namespace is not.
    NamespaceMissing,
    /// Namespace exists but the maps module has not loaded.
    ModuleMissing,
    /// Module is loaded but some required capabilities are missing.
    ApisIncomplete,
    /// Every required capability is present.
    Ready,
    /// An attempt budget ran out.
    TimedOut,
}

impl ProviderStatus {
    /// Whether no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProviderStatus::Ready | ProviderStatus::TimedOut)
    }

    /// Whether the SDK can be used.
    pub fn is_ready(&self) -> bool {
        matches!(self, ProviderStatus::Ready)
    }

    /// Short identifier for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Unstarted => "unstarted",
            ProviderStatus::ScriptMissing => "script_missing",
            ProviderStatus::NamespaceMissing => "namespace_missing",
            ProviderStatus::ModuleMissing => "module_missing",
            ProviderStatus::ApisIncomplete => "apis_incomplete",
            ProviderStatus::Ready => "ready",
            ProviderStatus::TimedOut => "timed_out",
        }
    }

    /// User-facing status text.
    pub fn display_status(&self) -> &'static str {
        match self {
            ProviderStatus::Unstarted => "Not started",
            ProviderStatus::ScriptMissing => "Waiting for map script...",
            ProviderStatus::NamespaceMissing => "Initializing map library...",
            ProviderStatus::ModuleMissing => "Loading map module...",
            ProviderStatus::ApisIncomplete => "Preparing map features...",
            ProviderStatus::Ready => "Map ready",
            ProviderStatus::TimedOut => "Map failed to load",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status change, as broadcast to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusTransition {
    pub from: ProviderStatus,
    pub to: ProviderStatus,
    /// Poll number (1-based) that observed the change.
    pub attempt: u32,
}

impl StatusTransition {
    pub fn is_terminal(&self) -> bool {
        self.to.is_terminal()
    }
}

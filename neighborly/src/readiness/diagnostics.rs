//! Human-readable reasons the mapping SDK is not usable.
//!
//! Diagnostics are a snapshot, not part of the polling state machine. The
//! monitor logs them when it times out; hosts can also show them in a debug
//! panel.

use std::fmt;

use serde::Serialize;

use super::probe::{SdkCapability, SdkProbe};

/// API keys shorter than this are reported as implausible.
pub const MIN_API_KEY_LEN: usize = 10;

/// Everything [`describe_problems`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiagnosticFlags {
    /// Length of the configured API key, `None` when unset or empty.
    pub api_key_len: Option<usize>,
    pub script_tag: bool,
    pub online: bool,
    pub namespace: bool,
    pub module: bool,
    pub lat_lng: bool,
}

impl DiagnosticFlags {
    /// Snapshot the probe and the configured key.
    pub fn capture<P: SdkProbe + ?Sized>(probe: &P, api_key: Option<&str>, online: bool) -> Self {
        let script_tag = probe.has_script_tag();
        let namespace = probe.has_namespace();
        let module = namespace && probe.has_module();
        Self {
            api_key_len: api_key.filter(|key| !key.is_empty()).map(str::len),
            script_tag,
            online,
            namespace,
            module,
            lat_lng: module && probe.has_capability(SdkCapability::LatLng),
        }
    }
}

/// One reason the SDK is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderProblem {
    MissingApiKey,
    ApiKeyTooShort { length: usize },
    ScriptTagMissing,
    Offline,
    NamespaceMissing,
    ModuleMissing,
    LatLngMissing,
}

impl fmt::Display for ProviderProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderProblem::MissingApiKey => write!(f, "Map API key is not configured"),
            ProviderProblem::ApiKeyTooShort { length } => write!(
                f,
                "Map API key is too short ({} characters, expected at least {})",
                length, MIN_API_KEY_LEN
            ),
            ProviderProblem::ScriptTagMissing => write!(f, "Map SDK script tag is missing"),
            ProviderProblem::Offline => write!(f, "Network connection is offline"),
            ProviderProblem::NamespaceMissing => write!(
                f,
                "Map SDK namespace was not loaded (network error or invalid API key)"
            ),
            ProviderProblem::ModuleMissing => {
                write!(f, "Map SDK maps module is missing (module load failed)")
            }
            ProviderProblem::LatLngMissing => write!(
                f,
                "Map SDK LatLng constructor is missing (initialization failed)"
            ),
        }
    }
}

/// List what is wrong, most fundamental first. Empty when nothing is.
///
/// A missing script tag ends the analysis: nothing after it can be judged.
///
/// # Example
///
/// ```
/// use neighborly::readiness::{describe_problems, DiagnosticFlags, ProviderProblem};
///
/// let flags = DiagnosticFlags {
///     api_key_len: Some(32),
///     script_tag: true,
///     online: true,
///     namespace: true,
///     ..DiagnosticFlags::default()
/// };
/// assert_eq!(describe_problems(&flags), vec![ProviderProblem::ModuleMissing]);
/// ```
pub fn describe_problems(flags: &DiagnosticFlags) -> Vec<ProviderProblem> {
    let mut problems = Vec::new();

    match flags.api_key_len {
        None => problems.push(ProviderProblem::MissingApiKey),
        Some(length) if length < MIN_API_KEY_LEN => {
            problems.push(ProviderProblem::ApiKeyTooShort { length })
        }
        Some(_) => {}
    }

    if !flags.script_tag {
        problems.push(ProviderProblem::ScriptTagMissing);
        return problems;
    }

    if !flags.online {
        problems.push(ProviderProblem::Offline);
    }

    if !flags.namespace {
        problems.push(ProviderProblem::NamespaceMissing);
    } else if !flags.module {
        problems.push(ProviderProblem::ModuleMissing);
    } else if !flags.lat_lng {
        problems.push(ProviderProblem::LatLngMissing);
    }

    problems
}

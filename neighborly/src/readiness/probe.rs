//! Capability probe for an externally loaded mapping SDK.
//!
//! The monitor never touches the SDK directly. Hosts implement [`SdkProbe`]
//! over whatever global object the SDK installs.

use std::fmt;

/// A sub-capability the SDK exposes once its maps module has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkCapability {
    /// Coordinate constructor.
    LatLng,
    /// Map widget constructor.
    Map,
    /// Marker placement.
    Marker,
    /// Info window popups.
    InfoWindow,
    /// Reverse geocoding service.
    Geocoder,
}

impl SdkCapability {
    /// Capabilities needed to place a marker, open an info window and
    /// reverse-geocode a coordinate.
    pub const REQUIRED: [SdkCapability; 4] = [
        SdkCapability::LatLng,
        SdkCapability::Marker,
        SdkCapability::InfoWindow,
        SdkCapability::Geocoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SdkCapability::LatLng => "LatLng",
            SdkCapability::Map => "Map",
            SdkCapability::Marker => "Marker",
            SdkCapability::InfoWindow => "InfoWindow",
            SdkCapability::Geocoder => "Geocoder",
        }
    }
}

impl fmt::Display for SdkCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the SDK's load progress, plus the manual load hook.
///
/// Every method is a cheap synchronous check; the monitor calls them once
/// per poll.
pub trait SdkProbe: Send + Sync {
    /// Whether the SDK's script element is present in the host.
    fn has_script_tag(&self) -> bool;

    /// Whether the SDK's top-level namespace exists.
    fn has_namespace(&self) -> bool;

    /// Whether the namespace's maps module has loaded.
    fn has_module(&self) -> bool;

    /// Whether one sub-capability is available.
    fn has_capability(&self, capability: SdkCapability) -> bool;

    /// Whether all of [`SdkCapability::REQUIRED`] are available.
    fn has_required_apis(&self) -> bool {
        SdkCapability::REQUIRED
            .iter()
            .all(|&capability| self.has_capability(capability))
    }

    /// Required capabilities that are not yet available.
    fn missing_capabilities(&self) -> Vec<SdkCapability> {
        SdkCapability::REQUIRED
            .into_iter()
            .filter(|&capability| !self.has_capability(capability))
            .collect()
    }

    /// Whether the host reports network connectivity. Only used for
    /// diagnostics; hosts without such a signal keep the default.
    fn is_online(&self) -> bool {
        true
    }

    /// Call the namespace's manual load function, when auto-load is off.
    ///
    /// Returns false if no such function exists. Must be safe to call
    /// repeatedly.
    fn invoke_manual_load(&self) -> bool;
}

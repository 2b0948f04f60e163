//! Neighborly - geospatial core for community issue reporting
//!
//! This library provides the parts of the reporting app that need more than
//! CRUD plumbing:
//!
//! - [`geo`] - great-circle distance between WGS84 points
//! - [`neighborhood`] - range-tier filtering, distance ranking and stats
//! - [`location`] - one-shot device location acquisition with typed failures
//! - [`readiness`] - polling monitor for an externally loaded mapping SDK
//!
//! Supporting modules handle configuration ([`config`]) and log setup
//! ([`logging`]).

pub mod config;
pub mod geo;
pub mod location;
pub mod logging;
pub mod neighborhood;
pub mod readiness;

pub use geo::{distance, GeoPoint};
pub use neighborhood::{NeighborhoodView, RangeTier};

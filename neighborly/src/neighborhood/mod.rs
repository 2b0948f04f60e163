//! Neighborhood range filtering
//!
//! Turns a set of geo-tagged items and a center point into the "my
//! neighborhood" view: items within a [`RangeTier`] of the center, ranked
//! nearest first, with distances and in-range statistics.
//!
//! # Architecture
//!
//! ```text
//! items + center + tier ──► filter ──► sort_by_distance ──► annotate
//!                              │
//!                              └──► compute_stats
//!
//! NeighborhoodSelector (inputs, cache) ──► NeighborhoodView (all of the above)
//! ```
//!
//! Every operation is pure. [`NeighborhoodSelector`] is the only stateful
//! piece and only caches on exact input equality.
//!
//! # Example
//!
//! ```
//! use neighborly::geo::GeoPoint;
//! use neighborly::neighborhood::{filter, format_distance, NeighborhoodView, RangeTier};
//!
//! let center = GeoPoint::new(37.5665, 126.9780);
//! let items = vec![GeoPoint::new(37.5675, 126.9790), GeoPoint::new(37.60, 127.05)];
//!
//! assert_eq!(filter(&items, Some(center), RangeTier::Large).len(), 1);
//!
//! let view = NeighborhoodView::compute(&items, Some(center), RangeTier::Small);
//! assert_eq!(view.stats.percentage, 50);
//! assert_eq!(format_distance(view.with_distance[0].distance_meters), "142m");
//! ```

mod filter;
mod format;
mod range;
mod view;

pub use filter::{
    annotate, compute_stats, filter, rank_within, sort_by_distance, DistanceAnnotated,
    FilterStats,
};
pub use format::format_distance;
pub use range::{RangeTier, RangeTierParseError};
pub use view::{NeighborhoodSelector, NeighborhoodView};

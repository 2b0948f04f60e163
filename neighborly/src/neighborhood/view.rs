//! Reactive neighborhood view.
//!
//! [`NeighborhoodView`] bundles everything a report list needs for one
//! combination of (items, center, tier). [`NeighborhoodSelector`] holds the
//! inputs and recomputes the view only when one of them actually changes.

use serde::Serialize;

use crate::geo::{distance, GeoPoint, GeoTagged};

use super::filter::{annotate, compute_stats, filter, sort_by_distance, DistanceAnnotated, FilterStats};
use super::range::RangeTier;

/// Filter output for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodView<T> {
    /// Items within range, in input order (all items when there is no center).
    pub filtered: Vec<T>,
    /// `filtered`, nearest first.
    pub sorted: Vec<T>,
    /// `sorted` with distances. Empty when there is no center.
    pub with_distance: Vec<DistanceAnnotated<T>>,
    /// Center the view was computed against.
    pub center: Option<GeoPoint>,
    /// In-range statistics.
    pub stats: FilterStats,
    /// Selected tier.
    pub tier: RangeTier,
}

impl<T: GeoTagged + Clone> NeighborhoodView<T> {
    /// Compute the view for the given inputs.
    pub fn compute(items: &[T], center: Option<GeoPoint>, tier: RangeTier) -> Self {
        let filtered = filter(items, center, tier);
        let sorted = sort_by_distance(&filtered, center);
        let with_distance = match center {
            Some(center) => annotate(&sorted, center),
            None => Vec::new(),
        };
        let stats = compute_stats(items, &filtered, tier);

        tracing::trace!(
            total = stats.total,
            in_range = stats.in_range,
            tier = %tier,
            has_center = center.is_some(),
            "Neighborhood view computed"
        );

        Self {
            filtered,
            sorted,
            with_distance,
            center,
            stats,
            tier,
        }
    }
}

impl<T> NeighborhoodView<T> {
    /// Selected radius in meters.
    pub fn range_meters(&self) -> u32 {
        self.tier.meters()
    }

    /// Selected radius in kilometers.
    pub fn range_km(&self) -> f64 {
        self.tier.kilometers()
    }
}

/// Holds filter inputs and caches the resulting view.
///
/// The effective center is the explicit user location when one is set,
/// otherwise the detected device location. Every setter compares against the
/// current input and drops the cached view only on a real change, so the
/// cache is always keyed on (items, effective center, tier).
///
/// # Example
///
/// ```
/// use neighborly::geo::GeoPoint;
/// use neighborly::neighborhood::{NeighborhoodSelector, RangeTier};
///
/// let mut selector = NeighborhoodSelector::new(RangeTier::Small);
/// selector.set_items(vec![GeoPoint::new(37.5675, 126.9790)]);
/// selector.set_detected_location(Some(GeoPoint::new(37.5665, 126.9780)));
///
/// assert_eq!(selector.view().stats.in_range, 1);
/// ```
#[derive(Debug, Clone)]
pub struct NeighborhoodSelector<T> {
    items: Vec<T>,
    user_location: Option<GeoPoint>,
    detected_location: Option<GeoPoint>,
    tier: RangeTier,
    cached: Option<NeighborhoodView<T>>,
}

impl<T> Default for NeighborhoodSelector<T> {
    fn default() -> Self {
        Self::new(RangeTier::default())
    }
}

impl<T> NeighborhoodSelector<T> {
    /// Create an empty selector with the given tier.
    pub fn new(tier: RangeTier) -> Self {
        Self {
            items: Vec::new(),
            user_location: None,
            detected_location: None,
            tier,
            cached: None,
        }
    }

    /// The center filtering is performed against, if any.
    pub fn effective_center(&self) -> Option<GeoPoint> {
        self.user_location.or(self.detected_location)
    }

    /// Current item set.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current tier.
    pub fn tier(&self) -> RangeTier {
        self.tier
    }

    /// Explicitly chosen location, if any.
    pub fn user_location(&self) -> Option<GeoPoint> {
        self.user_location
    }

    /// Location reported by the device, if any.
    pub fn detected_location(&self) -> Option<GeoPoint> {
        self.detected_location
    }

    /// Whether the next [`view`](Self::view) call will recompute.
    pub fn is_stale(&self) -> bool {
        self.cached.is_none()
    }

    /// Distance from the effective center to `point`, or `None` without a center.
    pub fn distance_from_center(&self, point: GeoPoint) -> Option<f64> {
        self.effective_center().map(|center| distance(center, point))
    }

    /// Change the tier.
    pub fn set_tier(&mut self, tier: RangeTier) {
        if self.tier != tier {
            self.tier = tier;
            self.cached = None;
        }
    }

    /// Set or clear the explicit location. Takes precedence over detection.
    pub fn set_user_location(&mut self, location: Option<GeoPoint>) {
        let before = self.effective_center();
        self.user_location = location;
        self.invalidate_if_center_changed(before);
    }

    /// Set or clear the detected device location.
    pub fn set_detected_location(&mut self, location: Option<GeoPoint>) {
        let before = self.effective_center();
        self.detected_location = location;
        self.invalidate_if_center_changed(before);
    }

    fn invalidate_if_center_changed(&mut self, before: Option<GeoPoint>) {
        if self.effective_center() != before {
            self.cached = None;
        }
    }
}

impl<T: GeoTagged + Clone + PartialEq> NeighborhoodSelector<T> {
    /// Replace the item set.
    pub fn set_items(&mut self, items: Vec<T>) {
        if self.items != items {
            self.items = items;
            self.cached = None;
        }
    }

    /// The view for the current inputs, recomputed only if an input changed.
    pub fn view(&mut self) -> &NeighborhoodView<T> {
        let center = self.effective_center();
        let (items, tier) = (&self.items, self.tier);
        self.cached
            .get_or_insert_with(|| NeighborhoodView::compute(items, center, tier))
    }
}

//! Range filtering, distance ranking and statistics.
//!
//! All functions here are pure: they borrow their inputs and return new
//! collections. Recomputing them on every input change is always correct.

use serde::Serialize;

use crate::geo::{distance, GeoPoint, GeoTagged};

use super::range::RangeTier;

/// An item paired with its distance from the filter center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceAnnotated<T> {
    /// The original item.
    #[serde(flatten)]
    pub item: T,
    /// Great-circle distance from the center in meters.
    pub distance_meters: f64,
}

/// Summary of how much of the item set falls within the selected range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterStats {
    /// Number of items before filtering.
    pub total: usize,
    /// Number of items within range.
    pub in_range: usize,
    /// `round(in_range / total * 100)`, or 0 for an empty set.
    pub percentage: u8,
    /// Selected range in kilometers.
    pub range_km: f64,
}

/// Keep the items within `tier` of `center`.
///
/// Input order is preserved. With no center every item is returned, since
/// there is nothing to measure against.
pub fn filter<T: GeoTagged + Clone>(
    items: &[T],
    center: Option<GeoPoint>,
    tier: RangeTier,
) -> Vec<T> {
    let Some(center) = center else {
        return items.to_vec();
    };

    let max_distance = f64::from(tier.meters());
    items
        .iter()
        .filter(|item| distance(center, item.location()) <= max_distance)
        .cloned()
        .collect()
}

/// Order items by ascending distance from `center`.
///
/// The sort is stable: items at equal distance keep their relative order.
/// With no center the items are returned unchanged.
pub fn sort_by_distance<T: GeoTagged + Clone>(items: &[T], center: Option<GeoPoint>) -> Vec<T> {
    let Some(center) = center else {
        return items.to_vec();
    };

    ranked_indices(items, center)
        .into_iter()
        .map(|(index, _)| items[index].clone())
        .collect()
}

/// Pair every item with its distance from `center`, keeping input order.
pub fn annotate<T: GeoTagged + Clone>(items: &[T], center: GeoPoint) -> Vec<DistanceAnnotated<T>> {
    items
        .iter()
        .map(|item| DistanceAnnotated {
            item: item.clone(),
            distance_meters: distance(center, item.location()),
        })
        .collect()
}

/// Compute the in-range statistics for a filter result.
///
/// `in_range` is capped at `total`, so a filtered slice that did not come
/// from `all_items` still yields a consistent result.
pub fn compute_stats<T, U>(all_items: &[T], filtered_items: &[U], tier: RangeTier) -> FilterStats {
    let total = all_items.len();
    let in_range = filtered_items.len().min(total);
    let percentage = if total > 0 {
        ((in_range as f64 / total as f64) * 100.0).round() as u8
    } else {
        0
    };

    FilterStats {
        total,
        in_range,
        percentage,
        range_km: tier.kilometers(),
    }
}

/// Filter, rank and annotate in one pass over the distances.
///
/// Equivalent to `annotate(sort_by_distance(filter(..)))` but measures each
/// item once.
pub fn rank_within<T: GeoTagged + Clone>(
    items: &[T],
    center: GeoPoint,
    tier: RangeTier,
) -> Vec<DistanceAnnotated<T>> {
    let max_distance = f64::from(tier.meters());
    ranked_indices(items, center)
        .into_iter()
        .filter(|(_, d)| *d <= max_distance)
        .map(|(index, distance_meters)| DistanceAnnotated {
            item: items[index].clone(),
            distance_meters,
        })
        .collect()
}

/// Indices of `items` with their distances, nearest first (stable).
fn ranked_indices<T: GeoTagged>(items: &[T], center: GeoPoint) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, distance(center, item.location())))
        .collect();
    // sort_by is stable; total_cmp keeps the comparator total
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

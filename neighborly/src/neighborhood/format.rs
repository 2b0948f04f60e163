//! Human-readable distance strings.

/// Format a distance for display.
///
/// Below one kilometer the distance is shown in whole meters (`"140m"`),
/// otherwise in kilometers with one decimal (`"2.3km"`).
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

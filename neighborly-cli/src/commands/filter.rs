//! `neighborly filter`: rank items from a JSON file around a center.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::{Deserialize, Serialize};

use neighborly::geo::{GeoPoint, GeoTagged};
use neighborly::neighborhood::{format_distance, NeighborhoodView};

use super::common::{resolve_tier, RangeArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `neighborly filter`.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// JSON file with an array of items ({"id", "title", "location": {"lat", "lng"}})
    #[arg(long)]
    pub items: PathBuf,

    /// Center latitude in decimal degrees
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Center longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Range tier (defaults to [neighborhood] default_range from config)
    #[arg(long, value_enum)]
    pub range: Option<RangeArg>,

    /// Print the full view as JSON
    #[arg(long)]
    pub json: bool,
}

/// Item identifier: numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of the items file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub id: ItemId,
    pub title: String,
    pub location: GeoPoint,
}

impl GeoTagged for ReportItem {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// Run the filter command.
pub fn run(runner: &CliRunner, args: FilterArgs) -> Result<(), CliError> {
    let items = load_items(&args.items)?;
    let center = parse_center(args.lat, args.lng)?;
    let tier = resolve_tier(args.range, runner.config().neighborhood.default_range);

    tracing::info!(
        items = items.len(),
        tier = %tier,
        has_center = center.is_some(),
        "Filtering items"
    );

    let view = NeighborhoodView::compute(&items, center, tier);

    if args.json {
        let json = serde_json::to_string_pretty(&view).map_err(CliError::Output)?;
        println!("{}", json);
    } else {
        for line in render_view(&view) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Read and parse the items file. Every item must have valid coordinates.
pub fn load_items(path: &Path) -> Result<Vec<ReportItem>, CliError> {
    let content = fs::read_to_string(path).map_err(|error| CliError::ItemsRead {
        path: path.to_path_buf(),
        error,
    })?;
    let items: Vec<ReportItem> =
        serde_json::from_str(&content).map_err(|error| CliError::ItemsParse {
            path: path.to_path_buf(),
            error,
        })?;

    if let Some(item) = items.iter().find(|item| !item.location.is_valid()) {
        return Err(CliError::InvalidItem {
            path: path.to_path_buf(),
            id: item.id.to_string(),
            lat: item.location.lat,
            lng: item.location.lng,
        });
    }

    Ok(items)
}

/// Both coordinates or neither; clap enforces the pairing.
fn parse_center(lat: Option<f64>, lng: Option<f64>) -> Result<Option<GeoPoint>, CliError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let center = GeoPoint::new(lat, lng);
            if !center.is_valid() {
                return Err(CliError::InvalidCenter { lat, lng });
            }
            Ok(Some(center))
        }
        _ => Ok(None),
    }
}

/// Human-readable lines for a view.
fn render_view(view: &NeighborhoodView<ReportItem>) -> Vec<String> {
    let mut lines = Vec::new();

    let Some(center) = view.center else {
        lines.push(format!(
            "{} items (no center given, showing all)",
            view.stats.total
        ));
        lines.push(String::new());
        for item in &view.sorted {
            lines.push(format!("  [{}] {}  {}", item.id, item.title, item.location));
        }
        return lines;
    };

    lines.push(format!(
        "{} of {} items within {} of {} ({}%)",
        style(view.stats.in_range).bold(),
        view.stats.total,
        format_distance(f64::from(view.range_meters())),
        center,
        view.stats.percentage
    ));
    lines.push(String::new());

    if view.with_distance.is_empty() {
        lines.push(format!(
            "  {}",
            style("Nothing in range. Try a larger --range.").dim()
        ));
        return lines;
    }

    for (rank, entry) in view.with_distance.iter().enumerate() {
        lines.push(format!(
            "  {:>3}. {:>7}  [{}] {}",
            rank + 1,
            style(format_distance(entry.distance_meters)).cyan(),
            entry.item.id,
            entry.item.title
        ));
    }

    lines
}

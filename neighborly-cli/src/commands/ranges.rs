//! `neighborly ranges`: list the neighborhood range tiers.

use console::style;
use neighborly::RangeTier;

use crate::runner::CliRunner;

/// Print every tier, marking the configured default.
pub fn run(runner: &CliRunner) {
    let default = runner.config().neighborhood.default_range;
    for line in tier_lines(default) {
        println!("{}", line);
    }
}

fn tier_lines(default: RangeTier) -> Vec<String> {
    RangeTier::ALL
        .iter()
        .map(|tier| {
            let marker = if *tier == default {
                style(" (default)").green().to_string()
            } else {
                String::new()
            };
            format!(
                "  {:<7} {:>5}m  {}{}",
                tier.as_str(),
                tier.meters(),
                tier.description(),
                marker
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_all_tiers_in_order() {
        console::set_colors_enabled(false);
        let lines = tier_lines(RangeTier::Medium);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("small"));
        assert!(lines[0].contains("1000m"));
        assert!(lines[2].contains("6000m"));
    }

    #[test]
    fn test_marks_only_the_default() {
        console::set_colors_enabled(false);
        let lines = tier_lines(RangeTier::Large);

        let marked: Vec<_> = lines.iter().filter(|l| l.contains("(default)")).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("large"));
    }
}

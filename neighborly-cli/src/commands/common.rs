//! Types shared across CLI commands.

use clap::ValueEnum;
use neighborly::RangeTier;

/// Range tier selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RangeArg {
    /// Apartment complex or a few blocks (1km)
    Small,
    /// Typical neighborhood (3km)
    Medium,
    /// Wide area (6km)
    Large,
}

impl RangeArg {
    pub fn to_tier(self) -> RangeTier {
        match self {
            RangeArg::Small => RangeTier::Small,
            RangeArg::Medium => RangeTier::Medium,
            RangeArg::Large => RangeTier::Large,
        }
    }
}

impl From<RangeArg> for RangeTier {
    fn from(arg: RangeArg) -> Self {
        arg.to_tier()
    }
}

/// Resolve the tier: explicit argument first, then the config default.
pub fn resolve_tier(arg: Option<RangeArg>, config_default: RangeTier) -> RangeTier {
    arg.map(RangeArg::to_tier).unwrap_or(config_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_arg_mapping() {
        assert_eq!(RangeArg::Small.to_tier(), RangeTier::Small);
        assert_eq!(RangeTier::from(RangeArg::Medium), RangeTier::Medium);
        assert_eq!(RangeArg::Large.to_tier().meters(), 6000);
    }

    #[test]
    fn test_explicit_range_overrides_config() {
        assert_eq!(
            resolve_tier(Some(RangeArg::Small), RangeTier::Large),
            RangeTier::Small
        );
        assert_eq!(resolve_tier(None, RangeTier::Large), RangeTier::Large);
    }

    #[test]
    fn test_value_enum_names_match_tier_names() {
        for arg in RangeArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(name, arg.to_tier().as_str());
        }
    }
}

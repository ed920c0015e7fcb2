use crate::{state::MemberRole, types::Money};
use serde::{Deserialize, Serialize};

/// Per-role amounts: hiring fees and monthly salaries share this shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoleTable {
    pub engineer: Money,
    pub designer: Money,
    pub marketer: Money,
}

impl RoleTable {
    /// Founders never appear in a role table; they cost `founder_monthly_cost`.
    pub fn for_role(&self, role: MemberRole) -> Option<Money> {
        match role {
            MemberRole::Founder  => None,
            MemberRole::Engineer => Some(self.engineer),
            MemberRole::Designer => Some(self.designer),
            MemberRole::Marketer => Some(self.marketer),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPrices {
    pub patent: Money,
    /// Upgrade price indexed by the CURRENT infra level (0..=2).
    pub infra_upgrades: [Money; 3],
}

impl AssetPrices {
    pub fn infra_upgrade(&self, current_level: u8) -> Option<Money> {
        self.infra_upgrades.get(current_level as usize).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationConfig {
    pub saas_multiple:   f64,
    pub patent_bonus:    Money,
    pub infra_bonus:     Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnConfig {
    pub founder_monthly_cost: Money,
    pub infra_upkeep_per_level: Money,
    pub cost_per_user: Money,
    /// Per-user cost multiplier indexed by infra level 0..=3.
    pub infra_user_discounts: [f64; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthConfig {
    pub baseline_rate:     f64,
    pub per_engineer:      f64,
    pub per_marketer:      f64,
    pub per_infra_level:   f64,
    /// Minimum organic users gained per month, even from zero.
    pub minimum_growth:    u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Chance per month that the event pipeline runs at all.
    pub trigger_probability: f64,
    /// Pool weight of the outage event indexed by infra level 0..=3.
    pub outage_weights:      [u32; 4],
    pub offer_multiplier_min: f64,
    pub offer_multiplier_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartConfig {
    pub cash:          Money,
    pub users:         u64,
    pub mrr_per_user:  Money,
    /// Attribute points the founder must distribute.
    pub founder_points: u8,
}

/// Settings for the optional network-sourced event generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalEventsConfig {
    pub enabled:     bool,
    pub endpoint:    String,
    /// Minimum wall-clock duration of a month advance, in milliseconds.
    #[serde(default)]
    pub min_busy_ms: u64,
}

impl Default for ExternalEventsConfig {
    fn default() -> Self {
        Self {
            enabled:     false,
            endpoint:    "http://127.0.0.1:3000/api/generate-event".into(),
            min_busy_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BalanceFile {
    hiring_costs:        RoleTable,
    team_monthly_costs:  RoleTable,
    asset_prices:        AssetPrices,
    valuation:           ValuationConfig,
    burn:                BurnConfig,
    growth:              GrowthConfig,
    events:              EventConfig,
    start:               StartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub hiring_costs:       RoleTable,
    pub team_monthly_costs: RoleTable,
    pub asset_prices:       AssetPrices,
    pub valuation:          ValuationConfig,
    pub burn:               BurnConfig,
    pub growth:             GrowthConfig,
    pub events:             EventConfig,
    pub start:              StartConfig,
    pub external_events:    ExternalEventsConfig,
}

pub const MAX_INFRA_LEVEL: u8 = 3;

impl SimConfig {
    /// Load balance tables and settings from `data_dir`.
    ///
    /// `economy/balance.json` is required. `settings/external_events.json`
    /// is optional; without it the external generator stays off.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/economy/balance.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let balance: BalanceFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        let settings_path = format!("{data_dir}/settings/external_events.json");
        let external_events = match std::fs::read_to_string(&settings_path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("Cannot parse {settings_path}: {e}"))?,
            Err(_) => {
                log::debug!("{settings_path} not found; external events disabled");
                ExternalEventsConfig::default()
            }
        };

        let config = Self {
            hiring_costs:       balance.hiring_costs,
            team_monthly_costs: balance.team_monthly_costs,
            asset_prices:       balance.asset_prices,
            valuation:          balance.valuation,
            burn:               balance.burn,
            growth:             balance.growth,
            events:             balance.events,
            start:              balance.start,
            external_events,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let ev = &self.events;
        if !(0.0..=1.0).contains(&ev.trigger_probability) {
            anyhow::bail!("events.trigger_probability must be in [0, 1]");
        }
        if ev.offer_multiplier_min > ev.offer_multiplier_max {
            anyhow::bail!("events.offer_multiplier_min exceeds offer_multiplier_max");
        }
        if ev.outage_weights.windows(2).any(|w| w[1] > w[0]) {
            anyhow::bail!("events.outage_weights must be non-increasing");
        }
        if self.burn.infra_user_discounts.iter().any(|d| *d < 0.0) {
            anyhow::bail!("burn.infra_user_discounts must be non-negative");
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Mirrors `data/economy/balance.json`; pacing and network are off.
    pub fn default_test() -> Self {
        Self {
            hiring_costs: RoleTable {
                engineer: 10_000.0,
                designer: 8_000.0,
                marketer: 7_000.0,
            },
            team_monthly_costs: RoleTable {
                engineer: 8_000.0,
                designer: 6_500.0,
                marketer: 5_500.0,
            },
            asset_prices: AssetPrices {
                patent:         25_000.0,
                infra_upgrades: [10_000.0, 25_000.0, 50_000.0],
            },
            valuation: ValuationConfig {
                saas_multiple: 8.0,
                patent_bonus:  25_000.0,
                infra_bonus:   5_000.0,
            },
            burn: BurnConfig {
                founder_monthly_cost:   1_500.0,
                infra_upkeep_per_level: 500.0,
                cost_per_user:          0.05,
                infra_user_discounts:   [1.0, 0.8, 0.6, 0.4],
            },
            growth: GrowthConfig {
                baseline_rate:   0.05,
                per_engineer:    0.01,
                per_marketer:    0.02,
                per_infra_level: 0.01,
                minimum_growth:  5,
            },
            events: EventConfig {
                trigger_probability:  0.2,
                outage_weights:       [4, 3, 1, 0],
                offer_multiplier_min: 2.0,
                offer_multiplier_max: 3.0,
            },
            start: StartConfig {
                cash:           50_000.0,
                users:          100,
                mrr_per_user:   5.0,
                founder_points: 15,
            },
            external_events: ExternalEventsConfig::default(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::default_test()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_balance_file_matches_test_defaults() {
        let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
        let loaded = SimConfig::load(data_dir).expect("load shipped data");
        let defaults = SimConfig::default_test();
        assert_eq!(loaded.hiring_costs, defaults.hiring_costs);
        assert_eq!(loaded.team_monthly_costs, defaults.team_monthly_costs);
        assert_eq!(loaded.events.outage_weights, defaults.events.outage_weights);
        assert_eq!(loaded.burn.infra_user_discounts, defaults.burn.infra_user_discounts);
        assert_eq!(loaded.start.founder_points, defaults.start.founder_points);
    }

    #[test]
    fn infra_price_missing_at_max_level() {
        let prices = SimConfig::default_test().asset_prices;
        assert_eq!(prices.infra_upgrade(0), Some(10_000.0));
        assert_eq!(prices.infra_upgrade(MAX_INFRA_LEVEL), None);
    }
}

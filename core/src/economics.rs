//! Economic model: valuation and burn rate.
//!
//! Both functions are pure: same input, same output, no mutation.
//! Callers deriving a value to STORE must pass the post-mutation
//! candidate state, never the live one.

use crate::{
    config::{BurnConfig, RoleTable, SimConfig, ValuationConfig, MAX_INFRA_LEVEL},
    state::GameState,
    types::Money,
};

/// SaaS-style valuation: ARR × multiple, plus flat asset bonuses.
pub fn calculate_valuation(state: &GameState, config: &ValuationConfig) -> Money {
    let arr = state.monthly_revenue() * 12.0;
    let mut valuation = arr * config.saas_multiple;
    valuation += f64::from(state.assets.patents) * config.patent_bonus;
    valuation += f64::from(state.assets.infra_level) * config.infra_bonus;
    valuation.round().max(0.0)
}

/// Total monthly outflow: founder, team, infra upkeep, per-user cost
/// discounted by infra level, and active recurring actions.
pub fn calculate_burn_rate(
    state:         &GameState,
    monthly_costs: &RoleTable,
    config:        &BurnConfig,
) -> Money {
    debug_assert!(
        state.assets.infra_level <= MAX_INFRA_LEVEL,
        "infra level {} out of range",
        state.assets.infra_level
    );
    let team = &state.team;

    let founder_burn = if team.founder.is_some() { config.founder_monthly_cost } else { 0.0 };
    let team_burn = team.engineers.len() as f64 * monthly_costs.engineer
        + team.designers.len() as f64 * monthly_costs.designer
        + team.marketers.len() as f64 * monthly_costs.marketer;
    let asset_burn = f64::from(state.assets.infra_level) * config.infra_upkeep_per_level;

    let level = state.assets.infra_level.min(MAX_INFRA_LEVEL) as usize;
    let user_burn = state.users as f64 * config.cost_per_user * config.infra_user_discounts[level];

    let total = founder_burn
        + team_burn
        + asset_burn
        + user_burn
        + state.recurring_action_monthly_cost;
    total.max(0.0)
}

/// Burn rate using the config's own tables.
pub fn burn_rate(state: &GameState, config: &SimConfig) -> Money {
    calculate_burn_rate(state, &config.team_monthly_costs, &config.burn)
}

/// Store the valuation derived from `state` itself.
pub fn refresh_valuation(state: &mut GameState, config: &SimConfig) {
    state.valuation = calculate_valuation(state, &config.valuation);
}

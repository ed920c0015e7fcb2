//! Growth subsystem: organic and recurring-action user growth.
//!
//! Runs once per tick after settlement. Reads the pre-tick snapshot
//! only; the tick controller merges the results.

use crate::{
    catalog,
    config::GrowthConfig,
    effects::recurring_user_increase,
    error::{SimError, SimResult},
    event::{thousands, LogEntry, LogKind},
    rng::SubsystemRng,
    state::GameState,
    types::Month,
};

/// Organic users gained this month: baseline rate plus role and infra
/// bonuses, never below the configured floor.
pub fn organic_growth(state: &GameState, config: &GrowthConfig) -> u64 {
    let rate = config.baseline_rate
        + config.per_engineer * state.team.engineers.len() as f64
        + config.per_marketer * state.team.marketers.len() as f64
        + config.per_infra_level * f64::from(state.assets.infra_level);
    let grown = (state.users as f64 * rate).floor().max(0.0) as u64;
    grown.max(config.minimum_growth)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurringYield {
    pub users:   u64,
    /// One entry per active action, in activation order.
    pub entries: Vec<LogEntry>,
}

/// Evaluate every active recurring action.
///
/// An active id missing from the catalog means the snapshot is corrupt;
/// that surfaces as an error for the tick controller to contain.
pub fn recurring_growth(
    state:     &GameState,
    log_month: Month,
    rng:       &mut SubsystemRng,
) -> SimResult<RecurringYield> {
    let mut out = RecurringYield::default();
    for id in &state.active_recurring_actions {
        let action = catalog::recurring_action(id)
            .ok_or_else(|| SimError::UnknownAction { id: id.clone() })?;
        let added = recurring_user_increase(action, state, rng);
        out.users = out.users.saturating_add(added);
        out.entries.push(LogEntry {
            month:   log_month,
            kind:    LogKind::Info,
            message: format!("{} added {} users.", action.name, thousands(added)),
        });
    }
    log::debug!(
        "month={log_month} recurring: {} actions, +{} users",
        out.entries.len(),
        out.users
    );
    Ok(out)
}

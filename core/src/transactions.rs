//! Transaction handlers: hiring, assets, growth and recurring actions.
//!
//! Each handler:
//!   - rejects with a log entry and NO other change when the game is over,
//!     funds are short, or the request is invalid;
//!   - otherwise changes exactly its slice of state, deducts the cost,
//!     logs, and re-derives valuation from the NEW state.
//! Rejections are never returned as errors.

use crate::{
    catalog::{self, recurring_monthly_cost},
    config::{SimConfig, MAX_INFRA_LEVEL},
    economics::refresh_valuation,
    effects::{apply_growth_action, started_message, stopped_message},
    event::{money, LogKind},
    rng::SubsystemRng,
    state::{GameState, MemberRole, TeamMember},
    team::generate_candidate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Patent,
    Infra,
}

fn reject_if_over(state: &GameState, what: &str) -> Option<GameState> {
    state
        .game_over
        .then(|| state.with_log(LogKind::Info, format!("The game is over; {what} ignored.")))
}

/// Add `member` to their role's roster and pay the hiring fee.
pub fn hire_team_member(state: &GameState, member: TeamMember, config: &SimConfig) -> GameState {
    if let Some(rejected) = reject_if_over(state, "hiring") {
        return rejected;
    }
    let label = member.role.label();
    let Some(cost) = config.hiring_costs.for_role(member.role) else {
        log::error!("hire_team_member called with a founder (id {})", member.id);
        return reject_founder_hire(state);
    };
    if state.cash < cost {
        return state.with_log(LogKind::Negative, format!("Not enough cash to hire {label}!"));
    }

    let mut next = state.clone();
    let role = member.role;
    if let Some(staff) = next.team.staff_mut(role) {
        staff.push(member);
    }
    next.cash -= cost;
    next.log(LogKind::Info, format!("Hired {label} for {}", money(cost)));
    refresh_valuation(&mut next, config);
    log::debug!("month={} hired {label}; staff now {}", next.month, next.team.staff_count());
    next
}

/// Buy a patent or upgrade infrastructure by one level.
pub fn buy_asset(state: &GameState, asset: AssetKind, config: &SimConfig) -> GameState {
    if let Some(rejected) = reject_if_over(state, "asset purchase") {
        return rejected;
    }
    match asset {
        AssetKind::Patent => {
            let price = config.asset_prices.patent;
            if state.cash < price {
                return state.with_log(LogKind::Negative, "Not enough cash to acquire Patent!");
            }
            let mut next = state.clone();
            next.cash -= price;
            next.assets.patents += 1;
            next.log(LogKind::Info, format!("Acquired Patent for {}", money(price)));
            refresh_valuation(&mut next, config);
            next
        }
        AssetKind::Infra => {
            let level = state.assets.infra_level;
            let Some(price) = config.asset_prices.infra_upgrade(level).filter(|_| level < MAX_INFRA_LEVEL)
            else {
                return state.with_log(
                    LogKind::Info,
                    "Infrastructure is already at maximum level.",
                );
            };
            if state.cash < price {
                return state.with_log(
                    LogKind::Negative,
                    "Not enough cash to upgrade Infrastructure!",
                );
            }
            let mut next = state.clone();
            next.cash -= price;
            next.assets.infra_level = level + 1;
            next.log(
                LogKind::Info,
                format!("Upgraded Infrastructure to level {} for {}", level + 1, money(price)),
            );
            refresh_valuation(&mut next, config);
            next
        }
    }
}

/// Pay for a one-off growth action, then apply its effect.
/// The cost entry always precedes the effect's own entries.
pub fn execute_growth_action(
    state:     &GameState,
    action_id: &str,
    config:    &SimConfig,
    rng:       &mut SubsystemRng,
) -> GameState {
    if let Some(rejected) = reject_if_over(state, "growth action") {
        return rejected;
    }
    let Some(action) = catalog::growth_action(action_id) else {
        return state.with_log(LogKind::Negative, format!("Unknown growth action '{action_id}'."));
    };
    if state.cash < action.cost {
        return state.with_log(
            LogKind::Negative,
            format!("Not enough cash for {} ({} required)", action.name, money(action.cost)),
        );
    }

    let mut paid = state.clone();
    paid.cash -= action.cost;
    paid.log(LogKind::Info, format!("Spent {} on {}.", money(action.cost), action.name));

    let mut next = apply_growth_action(action, &paid, rng);
    refresh_valuation(&mut next, config);
    next
}

/// Start or stop a recurring action. Starting pays the setup cost once;
/// stopping never refunds.
pub fn toggle_recurring_action(state: &GameState, action_id: &str, config: &SimConfig) -> GameState {
    if let Some(rejected) = reject_if_over(state, "recurring action toggle") {
        return rejected;
    }
    let Some(action) = catalog::recurring_action(action_id) else {
        return state.with_log(
            LogKind::Negative,
            format!("Unknown recurring action '{action_id}'."),
        );
    };

    let mut next = state.clone();
    if state.is_recurring_active(action_id) {
        next.active_recurring_actions.retain(|id| id != action_id);
        next.log(LogKind::Info, stopped_message(action.name));
    } else {
        let setup = action.setup_cost.unwrap_or(0.0);
        if state.cash < setup {
            return state.with_log(
                LogKind::Negative,
                format!("Not enough cash for {} setup ({} required)", action.name, money(setup)),
            );
        }
        if setup > 0.0 {
            next.cash -= setup;
            next.log(
                LogKind::Info,
                format!("Paid {} setup cost for {}.", money(setup), action.name),
            );
        }
        next.active_recurring_actions.push(action_id.to_string());
        next.log(LogKind::Info, started_message(action.name));
    }

    next.recurring_action_monthly_cost = recurring_monthly_cost(&next.active_recurring_actions);
    refresh_valuation(&mut next, config);
    next
}

/// Generate a candidate for `role` and hire them.
pub fn hire_role(
    state:  &GameState,
    role:   MemberRole,
    config: &SimConfig,
    rng:    &mut SubsystemRng,
) -> GameState {
    match generate_candidate(role, rng) {
        Some(candidate) => hire_team_member(state, candidate, config),
        None => {
            if let Some(rejected) = reject_if_over(state, "hiring") {
                return rejected;
            }
            log::error!("hire_role called for {role:?}");
            reject_founder_hire(state)
        }
    }
}

fn reject_founder_hire(state: &GameState) -> GameState {
    state.with_log(LogKind::Negative, "Founders cannot be hired.")
}

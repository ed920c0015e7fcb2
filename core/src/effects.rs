//! Effect interpreter: catalog variant → state transform.
//!
//! Every transform takes the prior snapshot by reference and returns a
//! new one carrying its own log entry. None of them touch valuation;
//! the caller re-derives it once its mutation is complete.

use crate::{
    catalog::{EventEffect, GrowthAction, GrowthEffect, RandomEvent, RecurringAction, RecurringEffect},
    event::{money, thousands, LogKind},
    rng::SubsystemRng,
    state::{GameState, MemberRole},
};

/// Apply a growth action's stochastic effect. Cost is NOT deducted here.
pub fn apply_growth_action(
    action: &GrowthAction,
    state:  &GameState,
    rng:    &mut SubsystemRng,
) -> GameState {
    let mut next = state.clone();
    match action.effect {
        GrowthEffect::ProportionalBoost { min_multiplier, max_multiplier } => {
            let multiplier = rng.range_f64(min_multiplier, max_multiplier);
            let gained = (state.users as f64 * multiplier).floor() as u64;
            next.users = next.users.saturating_add(gained);
            next.log(
                LogKind::Positive,
                format!(
                    "{}! Users +{} (+{}%)",
                    action.name,
                    thousands(gained),
                    (multiplier * 100.0).round()
                ),
            );
        }
        GrowthEffect::Gamble { success_chance, min_multiplier, max_multiplier } => {
            if rng.chance(success_chance) {
                let multiplier = rng.range_f64(min_multiplier, max_multiplier);
                let gained = (state.users as f64 * multiplier).floor() as u64;
                next.users = next.users.saturating_add(gained);
                next.log(
                    LogKind::Positive,
                    format!(
                        "{} success! Users +{} (+{}%)",
                        action.name,
                        thousands(gained),
                        (multiplier * 100.0).round()
                    ),
                );
            } else {
                next.log(
                    LogKind::Negative,
                    format!("{} flopped! No significant user growth.", action.name),
                );
            }
        }
    }
    next
}

/// Users a recurring action brings in this month.
pub fn recurring_user_increase(
    action: &RecurringAction,
    state:  &GameState,
    rng:    &mut SubsystemRng,
) -> u64 {
    let raw = match action.effect {
        RecurringEffect::SteadyAcquisition { base_users, per_marketer, variance } => {
            let base = base_users + per_marketer * state.team.marketers.len() as f64;
            base * rng.range_f64(1.0 - variance, 1.0 + variance)
        }
        RecurringEffect::CompoundingOrganic { scale, per_engineer, variance } => {
            let months = months_active(action, state);
            let base = (f64::from(months) + 1.0).ln() * scale
                + per_engineer * state.team.engineers.len() as f64;
            base * rng.range_f64(1.0 - variance, 1.0 + variance)
        }
    };
    raw.max(0.0).floor() as u64
}

/// Months since the most recent activation, at least 1.
fn months_active(action: &RecurringAction, state: &GameState) -> u32 {
    let started = started_message(action.name);
    state
        .events
        .iter()
        .rev()
        .find(|e| e.message == started)
        .map(|e| state.month.saturating_sub(e.month).max(1))
        .unwrap_or(1)
}

pub(crate) fn started_message(action_name: &str) -> String {
    format!("Started {action_name}.")
}

pub(crate) fn stopped_message(action_name: &str) -> String {
    format!("Stopped {action_name}.")
}

/// Apply a standard random event. Acquisition offers only log receipt;
/// the resolver routes them through the offer flow instead.
pub fn apply_event_effect(
    event: &RandomEvent,
    state: &GameState,
    rng:   &mut SubsystemRng,
) -> GameState {
    let mut next = state.clone();
    match event.effect {
        EventEffect::MultiplyUsers { factor } => {
            next.users = state.users.saturating_mul(factor);
            let gained = next.users.saturating_sub(state.users);
            next.log(
                LogKind::Positive,
                format!(
                    "App went viral! Users +{} (+{}%)",
                    thousands(gained),
                    (factor.saturating_sub(1)) * 100
                ),
            );
        }
        EventEffect::GainUsers { fraction } => {
            let gained = (state.users as f64 * fraction).floor() as u64;
            next.users = next.users.saturating_add(gained);
            next.log(
                LogKind::Positive,
                format!("Press coverage! Users +{} (+{}%)", thousands(gained), pct(fraction)),
            );
        }
        EventEffect::LoseUsers { fraction } => {
            let lost = (state.users as f64 * fraction).floor() as u64;
            next.users = state.users.saturating_sub(lost);
            next.log(
                LogKind::Negative,
                format!("Server outage! Lost {} users (-{}%)", thousands(lost), pct(fraction)),
            );
        }
        EventEffect::LegalFees { amount } => {
            next.cash = (state.cash - amount).max(0.0);
            next.log(LogKind::Negative, format!("Legal fees! -{}", money(amount)));
        }
        EventEffect::AcquisitionOffer => {
            next.log(LogKind::Special, "Received acquisition offer!");
        }
        EventEffect::MemberQuits => {
            let roles: Vec<MemberRole> = MemberRole::HIRABLE
                .into_iter()
                .filter(|role| !state.team.staff(*role).is_empty())
                .collect();
            if roles.is_empty() {
                next.log(
                    LogKind::Info,
                    "Heard resignation rumors, but everyone stayed... this time.",
                );
                return next;
            }
            let role = roles[rng.pick_index(roles.len())];
            if let Some(staff) = next.team.staff_mut(role) {
                let idx = rng.pick_index(staff.len());
                let leaver = staff.remove(idx);
                next.log(
                    LogKind::Negative,
                    format!(
                        "{} (ID: {}) quit! Team size decreased.",
                        role.label(),
                        leaver.short_id()
                    ),
                );
            }
        }
    }
    next
}

fn pct(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{growth_action, random_event, recurring_action};
    use crate::state::{Assets, Attributes, Team, TeamMember};

    fn state_with_users(users: u64) -> GameState {
        GameState {
            month: 4,
            cash: 40_000.0,
            valuation: 0.0,
            users,
            mrr_per_user: 5.0,
            team: Team::default(),
            assets: Assets::default(),
            active_recurring_actions: vec![],
            recurring_action_monthly_cost: 0.0,
            events: vec![],
            game_over: false,
            is_advancing_month: false,
        }
    }

    fn engineer(id: &str) -> TeamMember {
        TeamMember {
            id: id.into(),
            role: MemberRole::Engineer,
            attributes: Attributes { coding: 7, design: 2, marketing: 2 },
        }
    }

    #[test]
    fn outage_floors_loss_and_logs() {
        let mut rng = SubsystemRng::new(1, 0);
        let before = state_with_users(1_000);
        let after = apply_event_effect(random_event("outage").unwrap(), &before, &mut rng);
        assert_eq!(after.users, 700);
        let last = after.events.last().unwrap();
        assert_eq!(last.kind, LogKind::Negative);
        assert_eq!(last.message, "Server outage! Lost 300 users (-30%)");
    }

    #[test]
    fn legal_fees_clamp_cash_at_zero() {
        let mut rng = SubsystemRng::new(1, 0);
        let mut before = state_with_users(10);
        before.cash = 10_000.0;
        let after = apply_event_effect(random_event("lawsuit").unwrap(), &before, &mut rng);
        assert_eq!(after.cash, 0.0);
    }

    #[test]
    fn member_quits_removes_exactly_one() {
        let mut rng = SubsystemRng::new(9, 0);
        let mut before = state_with_users(10);
        before.team.engineers = vec![engineer("aaaaaaaa-1"), engineer("bbbbbbbb-2")];
        let after = apply_event_effect(random_event("member_quits").unwrap(), &before, &mut rng);
        assert_eq!(after.team.engineers.len(), 1);
        assert!(after.events.last().unwrap().message.starts_with("Engineer (ID: "));
    }

    #[test]
    fn product_hunt_grows_within_multiplier_range() {
        let mut rng = SubsystemRng::new(5, 0);
        let before = state_with_users(1_000);
        for _ in 0..50 {
            let after = apply_growth_action(growth_action("product_hunt").unwrap(), &before, &mut rng);
            assert!((1_500..=3_500).contains(&after.users), "users {}", after.users);
            assert_eq!(after.events.len(), 1);
        }
    }

    #[test]
    fn paid_ads_increase_within_variance() {
        let mut rng = SubsystemRng::new(5, 1);
        let state = state_with_users(0);
        let action = recurring_action("paid_ads").unwrap();
        for _ in 0..100 {
            let n = recurring_user_increase(action, &state, &mut rng);
            assert!((40..60).contains(&n), "increase {n}");
        }
    }

    #[test]
    fn seo_compounds_with_months_active() {
        let action = recurring_action("seo_campaign").unwrap();
        let mut early = state_with_users(0);
        early.log(LogKind::Info, started_message(action.name));
        early.month = 5;
        let mut late = early.clone();
        late.month = 40;
        assert_eq!(months_active(action, &early), 1);
        assert_eq!(months_active(action, &late), 36);
    }
}

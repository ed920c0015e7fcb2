//! Event subsystem: weighted selection and resolution of random events.
//!
//! Selection:
//!   1. Build a pool: unit-weight events once each, condition-sensitive
//!      events repeated by their looked-up weight (0 = excluded).
//!   2. Draw one entry uniformly.
//!   3. Re-check applicability. A failed check means no event this month;
//!      the draw is never retried within the same tick.
//!
//! Resolution:
//!   - Standard events apply their effect; deltas are measured against
//!     freshly derived valuations on both sides.
//!   - Acquisition offers never touch the economy. They surface an amount
//!     for the player to accept or decline.

use crate::{
    catalog::{EventEffect, EventRequirement, EventWeighting, RandomEvent, RANDOM_EVENTS},
    config::{EventConfig, SimConfig, MAX_INFRA_LEVEL},
    economics::{calculate_valuation, refresh_valuation},
    effects::apply_event_effect,
    event::{money, EventCard, EventImpact, LogKind},
    rng::SubsystemRng,
    state::GameState,
    types::Money,
};
use serde::{Deserialize, Serialize};

/// What the event pipeline produced for one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Resolved {
        card:   EventCard,
        impact: EventImpact,
        state:  GameState,
    },
    AcquisitionOffer {
        card:   EventCard,
        amount: Money,
    },
}

/// A pending offer, held by the engine until the player answers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AcquisitionOffer {
    pub amount:    Money,
    /// Valuation at the moment the offer was made.
    pub valuation: Money,
}

impl RandomEvent {
    pub fn card(&self) -> EventCard {
        EventCard {
            id:          self.id.to_string(),
            title:       self.title.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Pool weight of the outage event at `infra_level`.
pub fn outage_weight(infra_level: u8, config: &EventConfig) -> u32 {
    config.outage_weights[infra_level.min(MAX_INFRA_LEVEL) as usize]
}

fn pool_weight(event: &RandomEvent, state: &GameState, config: &EventConfig) -> u32 {
    match event.weighting {
        EventWeighting::Unit => 1,
        EventWeighting::ByInfraLevel => outage_weight(state.assets.infra_level, config),
    }
}

/// The expanded selection pool for `state`.
pub fn build_pool(state: &GameState, config: &EventConfig) -> Vec<&'static RandomEvent> {
    RANDOM_EVENTS
        .iter()
        .flat_map(|event| {
            let copies = pool_weight(event, state, config) as usize;
            std::iter::repeat(event).take(copies)
        })
        .collect()
}

/// Probability that a single draw lands on `event_id`.
pub fn draw_probability(event_id: &str, state: &GameState, config: &EventConfig) -> f64 {
    let pool = build_pool(state, config);
    if pool.is_empty() {
        return 0.0;
    }
    let hits = pool.iter().filter(|e| e.id == event_id).count();
    hits as f64 / pool.len() as f64
}

pub fn is_applicable(event: &RandomEvent, state: &GameState) -> bool {
    match event.requirement {
        EventRequirement::None => true,
        EventRequirement::HasStaff => state.team.staff_count() > 0,
    }
}

/// Draw one event. `None` when the pool is empty or the draw is
/// inapplicable to `state`.
pub fn select_event(
    state:  &GameState,
    config: &EventConfig,
    rng:    &mut SubsystemRng,
) -> Option<&'static RandomEvent> {
    let pool = build_pool(state, config);
    if pool.is_empty() {
        return None;
    }
    let drawn = pool[rng.pick_index(pool.len())];
    if !is_applicable(drawn, state) {
        log::debug!("month={} drew '{}' but it does not apply", state.month, drawn.id);
        return None;
    }
    Some(drawn)
}

/// Offer = valuation × U[min, max), floored to whole dollars.
pub fn acquisition_offer_amount(
    state:  &GameState,
    config: &SimConfig,
    rng:    &mut SubsystemRng,
) -> Money {
    let valuation = calculate_valuation(state, &config.valuation);
    let multiplier = rng.range_f64(
        config.events.offer_multiplier_min,
        config.events.offer_multiplier_max,
    );
    (valuation * multiplier).floor()
}

/// Resolve a drawn event against `state`.
pub fn resolve_event(
    event:  &RandomEvent,
    state:  &GameState,
    config: &SimConfig,
    rng:    &mut SubsystemRng,
) -> EventOutcome {
    if event.effect == EventEffect::AcquisitionOffer {
        let amount = acquisition_offer_amount(state, config, rng);
        let valuation = calculate_valuation(state, &config.valuation);
        let mut card = event.card();
        card.description = format!(
            "A major company wants to buy you out! They are offering {}. \
             Your current valuation is {}.",
            money(amount),
            money(valuation)
        );
        log::info!("month={} acquisition offer of {}", state.month, money(amount));
        return EventOutcome::AcquisitionOffer { card, amount };
    }

    let mut before = state.clone();
    refresh_valuation(&mut before, config);

    let mut after = apply_event_effect(event, &before, rng);
    refresh_valuation(&mut after, config);

    let impact = EventImpact::between(&before, &after);
    log::debug!("month={} event '{}': {}", state.month, event.id, impact.message);
    EventOutcome::Resolved { card: event.card(), impact, state: after }
}

/// Apply the player's answer to an acquisition offer.
pub fn respond_to_acquisition(state: &GameState, offer: &AcquisitionOffer, accept: bool) -> GameState {
    if state.game_over {
        return state.with_log(LogKind::Info, "The game is over; offer response ignored.");
    }
    let mut next = state.clone();
    if accept {
        next.cash += offer.amount;
        next.game_over = true;
        next.log(
            LogKind::Positive,
            format!(
                "ACQUIRED! Sold for {} (Valuation: {})",
                money(offer.amount),
                money(offer.valuation)
            ),
        );
        log::info!("month={} company acquired for {}", next.month, money(offer.amount));
    } else {
        next.log(LogKind::Info, "Declined acquisition offer");
    }
    next
}

//! The simulation engine: monthly tick controller and command facade.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Enter Advancing (busy flag set)
//!   2. Settlement: burn and revenue → tentative cash
//!   3. Bankruptcy check: terminal, skips everything below
//!   4. Organic growth
//!   5. Recurring actions (one log entry each)
//!   6. Valuation refresh, month += 1
//!   7. Event pipeline, gated by the trigger roll
//!   8. Exit Advancing → Idle, or Terminal on acquisition
//!
//! RULES:
//!   - Snapshots are replaced wholesale, never patched in place.
//!   - An error inside the tick restores the pre-tick snapshot plus one
//!     negative log entry. Nothing partial is ever committed.
//!   - All randomness flows through the RngBank.

use crate::{
    command::PlayerCommand,
    config::SimConfig,
    economics::{burn_rate, refresh_valuation},
    error::{SimError, SimResult},
    event::{EventCard, EventImpact, LogKind},
    event_source::{source_from_config, EventSource},
    event_subsystem::{respond_to_acquisition, AcquisitionOffer, EventOutcome},
    growth_subsystem::{organic_growth, recurring_growth},
    rng::{RngBank, SubsystemSlot},
    snapshot::{FinalSnapshot, GameOutcome},
    state::{Assets, GameState, MemberRole, Team, TeamMember},
    store::SessionStore,
    team::{create_founder, FounderProfile},
    transactions::{self, AssetKind},
    types::Money,
};
use serde::Serialize;
use std::time::{Duration, Instant};

pub const BANKRUPTCY_MESSAGE: &str = "OUT OF CASH! GAME OVER";
pub const TICK_ERROR_MESSAGE: &str = "Error advancing month";

/// Something the player must see or answer after a tick.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingInteraction {
    Event {
        card:   EventCard,
        impact: EventImpact,
    },
    AcquisitionOffer {
        card:  EventCard,
        offer: AcquisitionOffer,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub state:   GameState,
    pub pending: Option<PendingInteraction>,
}

impl TickOutcome {
    fn quiet(state: GameState) -> Self {
        Self { state, pending: None }
    }
}

/// Build the opening snapshot for a new game.
pub fn new_game(
    config:  &SimConfig,
    founder: &FounderProfile,
    bank:    &mut RngBank,
) -> SimResult<GameState> {
    let founder = create_founder(
        founder,
        config.start.founder_points,
        bank.for_subsystem(SubsystemSlot::Recruiting),
    )?;
    let mut state = GameState {
        month:                         1,
        cash:                          config.start.cash,
        valuation:                     0.0,
        users:                         config.start.users,
        mrr_per_user:                  config.start.mrr_per_user,
        team:                          Team { founder: Some(founder), ..Team::default() },
        assets:                        Assets::default(),
        active_recurring_actions:      Vec::new(),
        recurring_action_monthly_cost: 0.0,
        events:                        Vec::new(),
        game_over:                     false,
        is_advancing_month:            false,
    };
    refresh_valuation(&mut state, config);
    Ok(state)
}

/// One full month transition from `state`.
///
/// Pure with respect to `state`: the input is never modified. Returns an
/// error only for internal inconsistencies; the caller contains them.
pub fn run_month(
    state:  &GameState,
    config: &SimConfig,
    source: &dyn EventSource,
    bank:   &mut RngBank,
) -> SimResult<TickOutcome> {
    if state.game_over {
        return Ok(TickOutcome::quiet(state.clone()));
    }

    // 2. Settlement
    let burn = burn_rate(state, config);
    let revenue = state.monthly_revenue();
    let new_cash = state.cash - burn + revenue;
    log::debug!(
        "month={} settle: burn={burn:.2} revenue={revenue:.2} cash {:.2} -> {new_cash:.2}",
        state.month,
        state.cash
    );

    // 3. Bankruptcy
    if new_cash <= 0.0 {
        let mut next = state.clone();
        next.cash = 0.0;
        next.game_over = true;
        next.log(LogKind::Negative, BANKRUPTCY_MESSAGE);
        log::info!("month={} bankrupt", state.month);
        return Ok(TickOutcome::quiet(next));
    }

    // 4–5. Growth
    let next_month = state.month + 1;
    let organic = organic_growth(state, &config.growth);
    let recurring = recurring_growth(
        state,
        next_month,
        bank.for_subsystem(SubsystemSlot::Recurring),
    )?;

    // 6. Commit growth, refresh valuation, advance month
    let mut next = state.clone();
    next.cash = new_cash;
    next.users = state.users.saturating_add(organic).saturating_add(recurring.users);
    next.events.extend(recurring.entries);
    next.month = next_month;
    refresh_valuation(&mut next, config);

    // 7. Event pipeline
    let rng = bank.for_subsystem(SubsystemSlot::Events);
    if !rng.chance(config.events.trigger_probability) {
        return Ok(TickOutcome::quiet(next));
    }
    let pending = match source.next_event(&next, config, rng)? {
        None => None,
        Some(EventOutcome::Resolved { card, impact, state: resolved }) => {
            next = resolved;
            Some(PendingInteraction::Event { card, impact })
        }
        Some(EventOutcome::AcquisitionOffer { card, amount }) => {
            let offer = AcquisitionOffer { amount, valuation: next.valuation };
            Some(PendingInteraction::AcquisitionOffer { card, offer })
        }
    };
    Ok(TickOutcome { state: next, pending })
}

/// Owns the live snapshot and everything needed to advance it.
pub struct SimEngine {
    pub config:    SimConfig,
    rng_bank:      RngBank,
    source:        Box<dyn EventSource>,
    store:         Option<SessionStore>,
    founder:       FounderProfile,
    state:         GameState,
    pending_offer: Option<AcquisitionOffer>,
}

impl SimEngine {
    /// Start a game. The event source follows `config.external_events`.
    pub fn new(config: SimConfig, founder: FounderProfile, mut rng_bank: RngBank) -> SimResult<Self> {
        let state = new_game(&config, &founder, &mut rng_bank)?;
        let source = source_from_config(&config);
        log::info!(
            "new game: seed={} events={}",
            rng_bank.master_seed(),
            source.name()
        );
        Ok(Self {
            config,
            rng_bank,
            source,
            store: None,
            founder,
            state,
            pending_offer: None,
        })
    }

    /// Engine with test config, seeded RNG and a balanced founder.
    pub fn build_test(seed: u64) -> SimResult<Self> {
        let config = SimConfig::default_test();
        let founder = FounderProfile::balanced(config.start.founder_points);
        Self::new(config, founder, RngBank::new(seed))
    }

    pub fn with_event_source(mut self, source: Box<dyn EventSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> Option<&SessionStore> {
        self.store.as_ref()
    }

    pub fn pending_offer(&self) -> Option<AcquisitionOffer> {
        self.pending_offer
    }

    pub fn burn_rate(&self) -> Money {
        burn_rate(&self.state, &self.config)
    }

    /// Replace the live snapshot, e.g. when resuming from a saved state.
    /// The busy flag is transient and never survives a load.
    pub fn load_state(&mut self, mut state: GameState) {
        state.is_advancing_month = false;
        self.state = state;
        self.pending_offer = None;
    }

    /// Enter Advancing. Fails if a month is already in flight.
    pub fn begin_advance(&mut self) -> SimResult<()> {
        if self.state.is_advancing_month {
            return Err(SimError::TickInProgress);
        }
        self.state.is_advancing_month = true;
        Ok(())
    }

    /// Advance one month. Blocks out at least `min_busy_ms` of wall time.
    pub fn advance_month(&mut self) -> SimResult<TickOutcome> {
        self.begin_advance()?;
        if self.state.game_over {
            self.state.is_advancing_month = false;
            return Ok(TickOutcome::quiet(self.state.clone()));
        }
        if let Some(offer) = self.pending_offer.take() {
            log::debug!("advancing with an unanswered offer; treating it as declined");
            let declined = respond_to_acquisition(&self.state, &offer, false);
            self.state = declined;
        }

        let started = Instant::now();
        let before = self.state.clone();

        let result = run_month(&self.state, &self.config, self.source.as_ref(), &mut self.rng_bank);

        let min_busy = Duration::from_millis(self.config.external_events.min_busy_ms);
        let elapsed = started.elapsed();
        if elapsed < min_busy {
            std::thread::sleep(min_busy - elapsed);
        }

        let mut outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("month {} failed to advance: {e}", before.month);
                TickOutcome::quiet(before.with_log(LogKind::Negative, TICK_ERROR_MESSAGE))
            }
        };
        outcome.state.is_advancing_month = false;

        if let Some(PendingInteraction::AcquisitionOffer { offer, .. }) = &outcome.pending {
            self.pending_offer = Some(*offer);
        }
        self.commit(outcome.state.clone(), GameOutcome::Bankrupt);
        Ok(outcome)
    }

    /// Accept or decline the pending offer. Without one this only logs.
    pub fn respond_to_offer(&mut self, accept: bool) -> &GameState {
        let Some(offer) = self.pending_offer.take() else {
            let next = self.state.with_log(LogKind::Info, "There is no acquisition offer to answer.");
            self.state = next;
            return &self.state;
        };
        let next = respond_to_acquisition(&self.state, &offer, accept);
        self.commit(next, GameOutcome::Acquired { amount: offer.amount });
        &self.state
    }

    pub fn hire(&mut self, role: MemberRole) -> &GameState {
        let rng = self.rng_bank.for_subsystem(SubsystemSlot::Recruiting);
        let next = transactions::hire_role(&self.state, role, &self.config, rng);
        self.state = next;
        &self.state
    }

    /// Hire a specific, already generated candidate.
    pub fn hire_member(&mut self, member: TeamMember) -> &GameState {
        let next = transactions::hire_team_member(&self.state, member, &self.config);
        self.state = next;
        &self.state
    }

    pub fn buy_asset(&mut self, asset: AssetKind) -> &GameState {
        let next = transactions::buy_asset(&self.state, asset, &self.config);
        self.state = next;
        &self.state
    }

    pub fn execute_growth_action(&mut self, action_id: &str) -> &GameState {
        let rng = self.rng_bank.for_subsystem(SubsystemSlot::Growth);
        let next = transactions::execute_growth_action(&self.state, action_id, &self.config, rng);
        self.state = next;
        &self.state
    }

    pub fn toggle_recurring_action(&mut self, action_id: &str) -> &GameState {
        let next = transactions::toggle_recurring_action(&self.state, action_id, &self.config);
        self.state = next;
        &self.state
    }

    /// Discard the current game and start over with the same founder
    /// allocation. Clears any stored final snapshot.
    pub fn restart(&mut self) -> SimResult<&GameState> {
        if let Some(store) = &self.store {
            store.clear()?;
        }
        self.state = new_game(&self.config, &self.founder, &mut self.rng_bank)?;
        self.pending_offer = None;
        log::info!("game restarted");
        Ok(&self.state)
    }

    /// Dispatch a player command. Returns anything the player must see.
    pub fn apply(&mut self, command: PlayerCommand) -> SimResult<Option<PendingInteraction>> {
        match command {
            PlayerCommand::Hire { role } => { self.hire(role); }
            PlayerCommand::BuyAsset { asset } => { self.buy_asset(asset); }
            PlayerCommand::ExecuteGrowthAction { action_id } => {
                self.execute_growth_action(&action_id);
            }
            PlayerCommand::ToggleRecurringAction { action_id } => {
                self.toggle_recurring_action(&action_id);
            }
            PlayerCommand::AdvanceMonth => return Ok(self.advance_month()?.pending),
            PlayerCommand::RespondToOffer { accept } => { self.respond_to_offer(accept); }
            PlayerCommand::Restart => { self.restart()?; }
        }
        Ok(None)
    }

    /// Swap in `next`; persist it if this is the transition into game over.
    fn commit(&mut self, next: GameState, outcome: GameOutcome) {
        let became_terminal = next.game_over && !self.state.game_over;
        self.state = next;
        if !became_terminal {
            return;
        }
        if let Some(store) = &self.store {
            let snapshot = FinalSnapshot::new(outcome, self.state.clone());
            if let Err(e) = store.save_final_state(&snapshot) {
                log::error!("failed to persist final state: {e}");
            }
        }
    }
}

//! Event sources: where a tick's random event comes from.
//!
//! `LocalEventSource` runs the weighted selector and resolver.
//! `RemoteEventSource` asks an external generator for an event+impact
//! payload and falls back to its wrapped local source on ANY failure.
//! Failures go to the diagnostic log only, never to the game's event log.

use crate::{
    config::SimConfig,
    economics::refresh_valuation,
    error::{SimError, SimResult},
    event::{EventCard, EventImpact, ImpactTone, LogKind},
    event_subsystem::{resolve_event, select_event, EventOutcome},
    rng::SubsystemRng,
    state::GameState,
};
use serde::Deserialize;

pub trait EventSource {
    /// Stable name for diagnostics.
    fn name(&self) -> &'static str;

    /// Produce this tick's event, if any. Called only after the
    /// trigger roll has passed.
    fn next_event(
        &self,
        state:  &GameState,
        config: &SimConfig,
        rng:    &mut SubsystemRng,
    ) -> SimResult<Option<EventOutcome>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEventSource;

impl EventSource for LocalEventSource {
    fn name(&self) -> &'static str { "local" }

    fn next_event(
        &self,
        state:  &GameState,
        config: &SimConfig,
        rng:    &mut SubsystemRng,
    ) -> SimResult<Option<EventOutcome>> {
        Ok(select_event(state, &config.events, rng)
            .map(|event| resolve_event(event, state, config, rng)))
    }
}

// ── External generator payload ─────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireImpact {
    cash_change:         Option<f64>,
    user_change:         Option<f64>,
    /// Accepted for shape compatibility; valuation is always re-derived.
    #[allow(dead_code)]
    valuation_change:    Option<f64>,
    mrr_per_user_change: Option<f64>,
    message:             String,
}

#[derive(Debug, Clone, Deserialize)]
struct WireResponse {
    event:  EventCard,
    impact: WireImpact,
}

/// A validated event+impact payload from the external generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedEvent {
    pub card:                EventCard,
    pub cash_change:         f64,
    pub user_change:         i64,
    pub mrr_per_user_change: f64,
    pub message:             String,
}

impl GeneratedEvent {
    /// Parse and validate a response body. Error bodies
    /// (`{ error, details? }`) and malformed shapes are rejected.
    pub fn parse(body: &str) -> SimResult<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if let Some(err) = value.get("error") {
            let details = value
                .get("details")
                .and_then(|d| d.as_str())
                .unwrap_or_default();
            return Err(SimError::InvalidPayload {
                reason: format!("generator reported {err} {details}").trim_end().to_string(),
            });
        }
        let wire: WireResponse = serde_json::from_value(value)?;

        if wire.event.id.trim().is_empty() || wire.event.title.trim().is_empty() {
            return Err(invalid("event id and title must be non-empty"));
        }
        if wire.impact.message.trim().is_empty() {
            return Err(invalid("impact message must be non-empty"));
        }
        let finite = |field: &str, v: Option<f64>| -> SimResult<f64> {
            match v {
                Some(x) if !x.is_finite() => Err(invalid(&format!("{field} is not finite"))),
                Some(x) => Ok(x),
                None => Ok(0.0),
            }
        };
        let cash_change = finite("cashChange", wire.impact.cash_change)?;
        let user_change = finite("userChange", wire.impact.user_change)?.round() as i64;
        let mrr_per_user_change = finite("mrrPerUserChange", wire.impact.mrr_per_user_change)?;

        Ok(Self {
            card: wire.event,
            cash_change,
            user_change,
            mrr_per_user_change,
            message: wire.impact.message,
        })
    }

    /// Apply the documented deltas directly, then re-derive valuation.
    pub fn apply(&self, state: &GameState, config: &SimConfig) -> EventOutcome {
        let mut before = state.clone();
        refresh_valuation(&mut before, config);

        let mut after = before.clone();
        after.cash = (after.cash + self.cash_change).max(0.0);
        after.users = if self.user_change >= 0 {
            after.users.saturating_add(self.user_change as u64)
        } else {
            after.users.saturating_sub(self.user_change.unsigned_abs())
        };
        after.mrr_per_user = (after.mrr_per_user + self.mrr_per_user_change).max(0.0);
        refresh_valuation(&mut after, config);

        let mut impact = EventImpact::between(&before, &after);
        let kind = match impact.tone() {
            ImpactTone::Positive => LogKind::Positive,
            ImpactTone::Negative => LogKind::Negative,
            ImpactTone::Mixed | ImpactTone::Info => LogKind::Info,
        };
        after.log(kind, format!("{}: {}", self.card.title, self.message));
        impact.message = self.message.clone();

        EventOutcome::Resolved { card: self.card.clone(), impact, state: after }
    }
}

fn invalid(reason: &str) -> SimError {
    SimError::InvalidPayload { reason: reason.to_string() }
}

// ── Remote source ──────────────────────────────────────────────────

/// Event source backed by the external generator, wrapping a local
/// fallback. No request timeout is set.
pub struct RemoteEventSource {
    endpoint: String,
    client:   reqwest::blocking::Client,
    fallback: LocalEventSource,
}

impl RemoteEventSource {
    pub fn new(endpoint: impl Into<String>) -> SimResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
            fallback: LocalEventSource,
        })
    }

    fn fetch(&self, state: &GameState) -> SimResult<GeneratedEvent> {
        let body = serde_json::json!({ "gameState": state });
        let resp = self.client.post(&self.endpoint).json(&body).send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(invalid(&format!("HTTP {status}: {text}")));
        }
        GeneratedEvent::parse(&text)
    }
}

impl EventSource for RemoteEventSource {
    fn name(&self) -> &'static str { "remote" }

    fn next_event(
        &self,
        state:  &GameState,
        config: &SimConfig,
        rng:    &mut SubsystemRng,
    ) -> SimResult<Option<EventOutcome>> {
        match self.fetch(state) {
            Ok(generated) => {
                log::debug!("month={} generated event '{}'", state.month, generated.card.id);
                Ok(Some(generated.apply(state, config)))
            }
            Err(e) => {
                log::warn!("event generator unavailable, using local events: {e}");
                self.fallback.next_event(state, config, rng)
            }
        }
    }
}

/// Pick the event source the settings ask for.
pub fn source_from_config(config: &SimConfig) -> Box<dyn EventSource> {
    let ext = &config.external_events;
    if !ext.enabled {
        return Box::new(LocalEventSource);
    }
    match RemoteEventSource::new(ext.endpoint.clone()) {
        Ok(remote) => Box::new(remote),
        Err(e) => {
            log::warn!("cannot build event generator client ({e}); using local events");
            Box::new(LocalEventSource)
        }
    }
}

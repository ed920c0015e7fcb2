//! Static catalogs: growth actions, recurring actions, random events.
//!
//! Entries are plain data. Each carries a tagged effect variant; the
//! interpreter in `effects.rs` maps the variant to a state transform.
//! Ids are stable and referenced from saved states: never rename.

use crate::types::Money;
use serde::Serialize;

// ── Growth actions (one-off) ───────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthEffect {
    /// Users grow by a uniform multiple of the current base.
    ProportionalBoost { min_multiplier: f64, max_multiplier: f64 },
    /// Like ProportionalBoost, but only with `success_chance`.
    Gamble { success_chance: f64, min_multiplier: f64, max_multiplier: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct GrowthAction {
    pub id:          &'static str,
    pub name:        &'static str,
    pub description: &'static str,
    pub cost:        Money,
    pub effect:      GrowthEffect,
}

pub static GROWTH_ACTIONS: &[GrowthAction] = &[
    GrowthAction {
        id:          "product_hunt",
        name:        "Product Hunt Launch",
        description: "Launch on Product Hunt for a potential user boost.",
        cost:        5_000.0,
        effect:      GrowthEffect::ProportionalBoost { min_multiplier: 0.5, max_multiplier: 2.5 },
    },
    GrowthAction {
        id:          "influencer_shoutout",
        name:        "Influencer Shoutout",
        description: "Pay an influencer for a mention. Risky, but could pay off.",
        cost:        15_000.0,
        effect:      GrowthEffect::Gamble {
            success_chance: 0.6,
            min_multiplier: 1.0,
            max_multiplier: 4.0,
        },
    },
];

// ── Recurring actions (toggleable) ─────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurringEffect {
    /// (base + per_marketer × marketers) × U[1 - variance, 1 + variance)
    SteadyAcquisition { base_users: f64, per_marketer: f64, variance: f64 },
    /// (ln(months_active + 1) × scale + per_engineer × engineers) × U[1 - variance, 1 + variance)
    CompoundingOrganic { scale: f64, per_engineer: f64, variance: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringAction {
    pub id:           &'static str,
    pub name:         &'static str,
    pub description:  &'static str,
    pub monthly_cost: Money,
    pub setup_cost:   Option<Money>,
    pub effect:       RecurringEffect,
}

pub static RECURRING_ACTIONS: &[RecurringAction] = &[
    RecurringAction {
        id:           "paid_ads",
        name:         "Run Paid Ads",
        description:  "Run targeted ads for steady user growth.",
        monthly_cost: 250.0,
        setup_cost:   Some(1_000.0),
        effect:       RecurringEffect::SteadyAcquisition {
            base_users:   50.0,
            per_marketer: 10.0,
            variance:     0.2,
        },
    },
    RecurringAction {
        id:           "seo_campaign",
        name:         "SEO Campaign",
        description:  "Invest in SEO for organic growth. Slower, but compounds.",
        monthly_cost: 200.0,
        setup_cost:   Some(3_000.0),
        effect:       RecurringEffect::CompoundingOrganic {
            scale:        10.0,
            per_engineer: 2.0,
            variance:     0.1,
        },
    },
];

// ── Random events ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventEffect {
    MultiplyUsers { factor: u64 },
    GainUsers { fraction: f64 },
    LoseUsers { fraction: f64 },
    LegalFees { amount: Money },
    AcquisitionOffer,
    MemberQuits,
}

/// How many copies of an event go into the selection pool.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventWeighting {
    Unit,
    /// Looked up in `EventConfig::outage_weights` by infra level.
    ByInfraLevel,
}

/// Checked after the draw; a failed check means no event this month.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventRequirement {
    None,
    HasStaff,
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomEvent {
    pub id:          &'static str,
    pub title:       &'static str,
    pub description: &'static str,
    pub effect:      EventEffect,
    pub weighting:   EventWeighting,
    pub requirement: EventRequirement,
}

pub const ACQUISITION_EVENT_ID: &str = "acquisition";

pub static RANDOM_EVENTS: &[RandomEvent] = &[
    RandomEvent {
        id:          "viral",
        title:       "Viral Success!",
        description: "Your app goes viral on TikTok! Users surge fivefold.",
        effect:      EventEffect::MultiplyUsers { factor: 5 },
        weighting:   EventWeighting::Unit,
        requirement: EventRequirement::None,
    },
    RandomEvent {
        id:          "press",
        title:       "Press Coverage",
        description: "Major tech blog writes about your startup.",
        effect:      EventEffect::GainUsers { fraction: 0.2 },
        weighting:   EventWeighting::Unit,
        requirement: EventRequirement::None,
    },
    RandomEvent {
        id:          "outage",
        title:       "Server Outage!",
        description: "Your servers crashed during peak usage.",
        effect:      EventEffect::LoseUsers { fraction: 0.3 },
        weighting:   EventWeighting::ByInfraLevel,
        requirement: EventRequirement::None,
    },
    RandomEvent {
        id:          "lawsuit",
        title:       "Legal Trouble",
        description: "Ex-employee sues for IP theft.",
        effect:      EventEffect::LegalFees { amount: 25_000.0 },
        weighting:   EventWeighting::Unit,
        requirement: EventRequirement::None,
    },
    RandomEvent {
        id:          ACQUISITION_EVENT_ID,
        title:       "Acquisition Offer",
        description: "A larger company wants to buy you out.",
        effect:      EventEffect::AcquisitionOffer,
        weighting:   EventWeighting::Unit,
        requirement: EventRequirement::None,
    },
    RandomEvent {
        id:          "member_quits",
        title:       "Team Member Quits!",
        description: "One of your team members has decided to leave the company.",
        effect:      EventEffect::MemberQuits,
        weighting:   EventWeighting::Unit,
        requirement: EventRequirement::HasStaff,
    },
];

pub fn growth_action(id: &str) -> Option<&'static GrowthAction> {
    GROWTH_ACTIONS.iter().find(|a| a.id == id)
}

pub fn recurring_action(id: &str) -> Option<&'static RecurringAction> {
    RECURRING_ACTIONS.iter().find(|a| a.id == id)
}

pub fn random_event(id: &str) -> Option<&'static RandomEvent> {
    RANDOM_EVENTS.iter().find(|e| e.id == id)
}

/// Sum of monthly costs over catalog entries whose id is active.
/// Always recomputed from the full set; ids missing from the catalog add 0.
pub fn recurring_monthly_cost<S: AsRef<str>>(active: &[S]) -> Money {
    RECURRING_ACTIONS
        .iter()
        .filter(|action| active.iter().any(|id| id.as_ref() == action.id))
        .map(|action| action.monthly_cost)
        .sum()
}

//! The canonical game snapshot and its component records.
//!
//! RULE: a GameState is never patched in place by callers. Handlers and
//! the tick controller take `&GameState` and return a new snapshot that
//! the owner swaps in wholesale.

use crate::{
    event::{LogEntry, LogKind},
    types::{ActionId, EntityId, Money, Month},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Founder,
    Engineer,
    Designer,
    Marketer,
}

impl MemberRole {
    pub const HIRABLE: [MemberRole; 3] = [Self::Engineer, Self::Designer, Self::Marketer];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Founder  => "Founder",
            Self::Engineer => "Engineer",
            Self::Designer => "Designer",
            Self::Marketer => "Marketer",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    pub coding:    u8,
    pub design:    u8,
    pub marketing: u8,
}

impl Attributes {
    pub fn total(&self) -> u32 {
        u32::from(self.coding) + u32::from(self.design) + u32::from(self.marketing)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id:         EntityId,
    #[serde(rename = "type")]
    pub role:       MemberRole,
    pub attributes: Attributes,
}

impl TeamMember {
    /// First six characters of the id, used in log messages.
    pub fn short_id(&self) -> &str {
        let end = self.id.char_indices().nth(6).map(|(i, _)| i).unwrap_or(self.id.len());
        &self.id[..end]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub founder:   Option<TeamMember>,
    pub engineers: Vec<TeamMember>,
    pub designers: Vec<TeamMember>,
    pub marketers: Vec<TeamMember>,
}

impl Team {
    /// Hired staff for a non-founder role.
    pub fn staff(&self, role: MemberRole) -> &[TeamMember] {
        match role {
            MemberRole::Founder  => &[],
            MemberRole::Engineer => &self.engineers,
            MemberRole::Designer => &self.designers,
            MemberRole::Marketer => &self.marketers,
        }
    }

    pub(crate) fn staff_mut(&mut self, role: MemberRole) -> Option<&mut Vec<TeamMember>> {
        match role {
            MemberRole::Founder  => None,
            MemberRole::Engineer => Some(&mut self.engineers),
            MemberRole::Designer => Some(&mut self.designers),
            MemberRole::Marketer => Some(&mut self.marketers),
        }
    }

    /// Number of hired (non-founder) members.
    pub fn staff_count(&self) -> usize {
        self.engineers.len() + self.designers.len() + self.marketers.len()
    }

    pub fn headcount(&self) -> usize {
        self.staff_count() + usize::from(self.founder.is_some())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    /// Infrastructure tier, 0..=3.
    pub infra_level: u8,
    pub patents:     u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub month:                         Month,
    pub cash:                          Money,
    /// Derived from the other fields; never an authoritative input.
    pub valuation:                     Money,
    pub users:                         u64,
    pub mrr_per_user:                  Money,
    pub team:                          Team,
    pub assets:                        Assets,
    pub active_recurring_actions:      Vec<ActionId>,
    /// Derived: sum of monthly costs over `active_recurring_actions`.
    pub recurring_action_monthly_cost: Money,
    pub events:                        Vec<LogEntry>,
    pub game_over:                     bool,
    #[serde(default)]
    pub is_advancing_month:            bool,
}

impl GameState {
    /// Append a log entry stamped with the current month.
    pub fn log(&mut self, kind: LogKind, message: impl Into<String>) {
        self.events.push(LogEntry {
            month: self.month,
            kind,
            message: message.into(),
        });
    }

    /// Clone of `self` with one extra log entry. Used for rejections,
    /// where nothing but the log may change.
    pub fn with_log(&self, kind: LogKind, message: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.log(kind, message);
        next
    }

    pub fn is_recurring_active(&self, action_id: &str) -> bool {
        self.active_recurring_actions.iter().any(|id| id == action_id)
    }

    pub fn monthly_revenue(&self) -> Money {
        self.users as f64 * self.mrr_per_user
    }
}

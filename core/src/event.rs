//! The player-facing event log and the derived impact of a random event.
//!
//! RULE: the log is append-only. Entries are never edited or removed.
//! EventImpact is a UI value; it is never stored inside GameState.

use crate::{
    state::GameState,
    types::{Money, Month},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Positive,
    Negative,
    Info,
    Special,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub month:   Month,
    #[serde(rename = "type")]
    pub kind:    LogKind,
    pub message: String,
}

/// The display half of a random event: what the dialog shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventCard {
    pub id:          String,
    pub title:       String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTone {
    Positive,
    Negative,
    Mixed,
    Info,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventImpact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_change:         Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_change:         Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_change:    Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrr_per_user_change: Option<Money>,
    pub message:             String,
}

impl EventImpact {
    /// Deltas between two snapshots. Zero deltas are left as `None`.
    /// `message` lists the non-zero deltas in a fixed order.
    pub fn between(before: &GameState, after: &GameState) -> Self {
        let cash = after.cash - before.cash;
        let users = (i128::from(after.users) - i128::from(before.users))
            .clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        let valuation = after.valuation - before.valuation;
        let mrr = after.mrr_per_user - before.mrr_per_user;

        let mut impact = Self {
            cash_change:         non_zero(cash),
            user_change:         (users != 0).then_some(users),
            valuation_change:    non_zero(valuation),
            mrr_per_user_change: non_zero(mrr),
            message:             String::new(),
        };
        impact.message = impact.summary();
        impact
    }

    /// Human-readable summary of the non-zero deltas.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = self.cash_change {
            parts.push(format!("Cash {}", signed_money(c)));
        }
        if let Some(u) = self.user_change {
            let sign = if u >= 0 { "+" } else { "-" };
            parts.push(format!("Users {sign}{}", thousands(u.unsigned_abs())));
        }
        if let Some(v) = self.valuation_change {
            parts.push(format!("Valuation {}", signed_money(v)));
        }
        if let Some(m) = self.mrr_per_user_change {
            let sign = if m >= 0.0 { "+" } else { "-" };
            parts.push(format!("MRR/user {sign}${:.2}", m.abs()));
        }
        if parts.is_empty() {
            "No measurable impact.".to_string()
        } else {
            parts.join(", ")
        }
    }

    pub fn tone(&self) -> ImpactTone {
        let signs = [
            self.cash_change.map(f64::signum),
            self.user_change.map(|u| u.signum() as f64),
            self.valuation_change.map(f64::signum),
            self.mrr_per_user_change.map(f64::signum),
        ];
        let up = signs.iter().flatten().any(|s| *s > 0.0);
        let down = signs.iter().flatten().any(|s| *s < 0.0);
        match (up, down) {
            (true, false) => ImpactTone::Positive,
            (false, true) => ImpactTone::Negative,
            (true, true)  => ImpactTone::Mixed,
            (false, false) => ImpactTone::Info,
        }
    }
}

fn non_zero(delta: f64) -> Option<f64> {
    (delta.abs() > f64::EPSILON).then_some(delta)
}

/// `1234567` → `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar amount with separators: `$25,000`. Negative amounts keep a
/// leading minus: `-$300`.
pub fn money(amount: Money) -> String {
    let whole = amount.abs().round() as u64;
    if amount < 0.0 && whole > 0 {
        format!("-${}", thousands(whole))
    } else {
        format!("${}", thousands(whole))
    }
}

fn signed_money(amount: Money) -> String {
    if amount >= 0.0 {
        format!("+{}", money(amount))
    } else {
        money(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn money_formats_sign() {
        assert_eq!(money(25_000.0), "$25,000");
        assert_eq!(money(-300.4), "-$300");
        assert_eq!(signed_money(50.0), "+$50");
    }

    #[test]
    fn tone_classification() {
        let mut impact = EventImpact { cash_change: Some(100.0), ..Default::default() };
        assert_eq!(impact.tone(), ImpactTone::Positive);
        impact.user_change = Some(-5);
        assert_eq!(impact.tone(), ImpactTone::Mixed);
        impact.cash_change = None;
        assert_eq!(impact.tone(), ImpactTone::Negative);
        assert_eq!(EventImpact::default().tone(), ImpactTone::Info);
    }

    #[test]
    fn summary_lists_only_non_zero_deltas() {
        let impact = EventImpact {
            cash_change: Some(-25_000.0),
            user_change: Some(1_200),
            ..Default::default()
        };
        assert_eq!(impact.summary(), "Cash -$25,000, Users +1,200");
    }
}

//! Terminal snapshot: the final GameState handed to the results view.

use crate::{state::GameState, types::Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOutcome {
    Bankrupt,
    Acquired { amount: Money },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalSnapshot {
    pub outcome:  GameOutcome,
    pub state:    GameState,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}

impl FinalSnapshot {
    pub fn new(outcome: GameOutcome, state: GameState) -> Self {
        Self { outcome, state, saved_at: chrono::Utc::now() }
    }
}

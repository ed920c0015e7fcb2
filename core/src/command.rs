use crate::{state::MemberRole, transactions::AssetKind};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Team and assets ───────────────────────────
    Hire { role: MemberRole },
    BuyAsset { asset: AssetKind },

    // ── Growth ────────────────────────────────────
    ExecuteGrowthAction { action_id: String },
    ToggleRecurringAction { action_id: String },

    // ── Time and decisions ────────────────────────
    AdvanceMonth,
    RespondToOffer { accept: bool },
    Restart,
}

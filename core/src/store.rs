//! SQLite session store.
//!
//! RULE: Only store.rs talks to the database.
//! Holds the terminal snapshot between the end of a game and the
//! results view. The snapshot is read exactly once; a restart clears it.

use crate::{error::SimResult, snapshot::FinalSnapshot};
use rusqlite::{params, Connection, OptionalExtension};

pub const FINAL_STATE_KEY: &str = "final_state";

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (or create) the session database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_session.sql"))?;
        Ok(())
    }

    // ── Final state ────────────────────────────────────────────

    pub fn save_final_state(&self, snapshot: &FinalSnapshot) -> SimResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO session_entry (key, value, saved_at)
             VALUES (?1, ?2, ?3)",
            params![FINAL_STATE_KEY, json, snapshot.saved_at.to_rfc3339()],
        )?;
        log::debug!("final state saved at month {}", snapshot.state.month);
        Ok(())
    }

    /// Read the final snapshot and remove it. A second call returns None.
    pub fn take_final_state(&self) -> SimResult<Option<FinalSnapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM session_entry WHERE key = ?1",
                params![FINAL_STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        let Some(json) = json else {
            return Ok(None);
        };
        self.conn.execute(
            "DELETE FROM session_entry WHERE key = ?1",
            params![FINAL_STATE_KEY],
        )?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    pub fn clear(&self) -> SimResult<()> {
        self.conn.execute("DELETE FROM session_entry", [])?;
        Ok(())
    }

    pub fn entry_count(&self) -> SimResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM session_entry",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

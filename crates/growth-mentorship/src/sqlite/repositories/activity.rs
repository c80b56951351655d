//! Activity repository: upserts on the `mentee_activity` table.
//!
//! Both writes are single statements, so two edits by the same mentee racing
//! on different connections serialize inside `SQLite` and neither is lost.
//! `last_active_at` only moves forward.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::sqlite::row_types::ActivityRow;

/// Activity repository.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Set the flag and advance `last_active_at` to `at` unless a later edit
    /// is already recorded.
    pub fn mark_active(conn: &Connection, mentee_id: &str, at: &str, now: &str) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO mentee_activity (mentee_id, last_active_at, is_active, updated_at)
             VALUES (?1, ?2, 1, ?3)
             ON CONFLICT (mentee_id) DO UPDATE SET
               last_active_at = CASE
                 WHEN mentee_activity.last_active_at IS NULL
                   OR excluded.last_active_at > mentee_activity.last_active_at
                 THEN excluded.last_active_at
                 ELSE mentee_activity.last_active_at
               END,
               is_active  = 1,
               updated_at = excluded.updated_at",
            params![mentee_id, at, now],
        )?;
        Ok(())
    }

    /// Clear the flag, keeping `last_active_at`. Creates the row if missing.
    pub fn mark_inactive(conn: &Connection, mentee_id: &str, now: &str) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO mentee_activity (mentee_id, last_active_at, is_active, updated_at)
             VALUES (?1, NULL, 0, ?2)
             ON CONFLICT (mentee_id) DO UPDATE SET
               is_active  = 0,
               updated_at = excluded.updated_at",
            params![mentee_id, now],
        )?;
        Ok(())
    }

    /// Fetch the record for `mentee_id`.
    pub fn get(conn: &Connection, mentee_id: &str) -> Result<Option<ActivityRow>> {
        let row = conn
            .query_row(
                "SELECT mentee_id, last_active_at, is_active, updated_at
                 FROM mentee_activity WHERE mentee_id = ?1",
                params![mentee_id],
                |row| {
                    Ok(ActivityRow {
                        mentee_id: row.get(0)?,
                        last_active_at: row.get(1)?,
                        is_active: row.get::<_, i32>(2)? == 1,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

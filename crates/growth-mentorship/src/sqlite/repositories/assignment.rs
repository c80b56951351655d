//! Assignment repository: CRUD for the `mentor_assignments` table.
//!
//! Rows are keyed by `(mentee_id, role)`. Upserts keep the row's `id` and
//! `assigned_at`, so listings stay in first-assignment order.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::sqlite::row_types::AssignmentRow;

const COLUMNS: &str = "id, mentee_id, mentee_name, mentor_id, mentor_name, role, assigned_at, updated_at";

/// Values for an assignment upsert.
#[derive(Debug)]
pub struct NewAssignment<'a> {
    /// Mentee id.
    pub mentee_id: &'a str,
    /// Mentee display name.
    pub mentee_name: &'a str,
    /// Mentor id.
    pub mentor_id: &'a str,
    /// Mentor display name.
    pub mentor_name: &'a str,
    /// `primary` or `backup`.
    pub role: &'a str,
    /// Write time (stored format).
    pub now: &'a str,
}

/// Assignment repository.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert or replace the mentor for `(mentee_id, role)` in one statement.
    pub fn upsert(conn: &Connection, new: &NewAssignment<'_>) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO mentor_assignments
               (mentee_id, mentee_name, mentor_id, mentor_name, role, assigned_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT (mentee_id, role) DO UPDATE SET
               mentee_name = excluded.mentee_name,
               mentor_id   = excluded.mentor_id,
               mentor_name = excluded.mentor_name,
               updated_at  = excluded.updated_at",
            params![
                new.mentee_id,
                new.mentee_name,
                new.mentor_id,
                new.mentor_name,
                new.role,
                new.now
            ],
        )?;
        Ok(())
    }

    /// Get the assignment for `(mentee_id, role)`.
    pub fn get(conn: &Connection, mentee_id: &str, role: &str) -> Result<Option<AssignmentRow>> {
        let row = conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM mentor_assignments WHERE mentee_id = ?1 AND role = ?2"
                ),
                params![mentee_id, role],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Whether any assignment names `mentee_id` as mentee.
    pub fn exists_for_mentee(conn: &Connection, mentee_id: &str) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM mentor_assignments WHERE mentee_id = ?1)",
            params![mentee_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Delete the assignment for `(mentee_id, role)`. Returns whether a row
    /// was removed.
    pub fn delete(conn: &Connection, mentee_id: &str, role: &str) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM mentor_assignments WHERE mentee_id = ?1 AND role = ?2",
            params![mentee_id, role],
        )?;
        Ok(changed > 0)
    }

    /// All assignments held by `mentor_id`, optionally limited to one role,
    /// in insertion order.
    pub fn list_for_mentor(
        conn: &Connection,
        mentor_id: &str,
        role: Option<&str>,
    ) -> Result<Vec<AssignmentRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM mentor_assignments
             WHERE mentor_id = ?1 AND (?2 IS NULL OR role = ?2)
             ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![mentor_id, role], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// All assignments for `mentee_id`, primary before backup.
    pub fn list_for_mentee(conn: &Connection, mentee_id: &str) -> Result<Vec<AssignmentRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM mentor_assignments
             WHERE mentee_id = ?1
             ORDER BY CASE role WHEN 'primary' THEN 0 ELSE 1 END"
        ))?;
        let rows = stmt
            .query_map(params![mentee_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssignmentRow> {
        Ok(AssignmentRow {
            id: row.get(0)?,
            mentee_id: row.get(1)?,
            mentee_name: row.get(2)?,
            mentor_id: row.get(3)?,
            mentor_name: row.get(4)?,
            role: row.get(5)?,
            assigned_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Mentor assignment store.

use chrono::Utc;
use growth_core::{UserId, UserIdentity};
use rusqlite::TransactionBehavior;
use tracing::{debug, info};

use crate::errors::{MentorshipError, Result};
use crate::sqlite::connection::{ConnectionPool, PooledConnection};
use crate::sqlite::repositories::{AssignmentRepo, NewAssignment};
use crate::sqlite::row_types::AssignmentRow;
use crate::types::{MentorAssignment, MentorRole, format_ts, parse_ts};

/// Maps each `(mentee, role)` to at most one mentor.
///
/// All operations are synchronous. Writes are single upserts and take effect
/// before the call returns.
#[derive(Clone)]
pub struct MentorStore {
    pool: ConnectionPool,
}

impl MentorStore {
    /// Create a store over an already-migrated pool.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Assign `mentor` to `mentee` in `role`, replacing any previous mentor
    /// in that role.
    pub fn set_mentor(
        &self,
        mentee: &UserIdentity,
        mentor: &UserIdentity,
        role: MentorRole,
    ) -> Result<()> {
        validate(mentee, mentor)?;

        // Write lock at BEGIN; a deferred read lock cannot wait on busy_timeout
        // when it upgrades.
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let previous = AssignmentRepo::get(&tx, mentee.id.as_str(), role.as_str())?;
        AssignmentRepo::upsert(
            &tx,
            &NewAssignment {
                mentee_id: mentee.id.as_str(),
                mentee_name: &mentee.name,
                mentor_id: mentor.id.as_str(),
                mentor_name: &mentor.name,
                role: role.as_str(),
                now: &format_ts(Utc::now()),
            },
        )?;
        tx.commit()?;

        match previous {
            Some(prev) if prev.mentor_id != mentor.id.as_str() => info!(
                mentee = %mentee.id,
                role = %role,
                from = %prev.mentor_id,
                to = %mentor.id,
                "mentor reassigned"
            ),
            Some(_) => debug!(mentee = %mentee.id, role = %role, "mentor assignment refreshed"),
            None => info!(mentee = %mentee.id, role = %role, mentor = %mentor.id, "mentor assigned"),
        }
        Ok(())
    }

    /// The mentor of `mentee` in `role`, if any.
    pub fn get_mentor(&self, mentee: &UserId, role: MentorRole) -> Result<Option<UserIdentity>> {
        let conn = self.conn()?;
        let row = AssignmentRepo::get(&conn, mentee.as_str(), role.as_str())?;
        Ok(row.map(|r| UserIdentity::new(r.mentor_id, r.mentor_name)))
    }

    /// Whether `user` is the mentee of any assignment.
    pub fn is_mentee(&self, user: &UserId) -> Result<bool> {
        let conn = self.conn()?;
        AssignmentRepo::exists_for_mentee(&conn, user.as_str())
    }

    /// Remove the assignment for `(mentee, role)`. Returns whether one
    /// existed; absence is not an error.
    pub fn remove_assignment(&self, mentee: &UserId, role: MentorRole) -> Result<bool> {
        let conn = self.conn()?;
        let removed = AssignmentRepo::delete(&conn, mentee.as_str(), role.as_str())?;
        if removed {
            info!(mentee = %mentee, role = %role, "mentor assignment removed");
        } else {
            debug!(mentee = %mentee, role = %role, "no assignment to remove");
        }
        Ok(removed)
    }

    /// Assignments held by `mentor`, in first-assignment order.
    pub fn assignments_for_mentor(
        &self,
        mentor: &UserId,
        role: Option<MentorRole>,
    ) -> Result<Vec<MentorAssignment>> {
        let conn = self.conn()?;
        AssignmentRepo::list_for_mentor(&conn, mentor.as_str(), role.map(MentorRole::as_str))?
            .into_iter()
            .map(into_assignment)
            .collect()
    }

    /// Every assignment of `mentee`, primary first.
    pub fn assignments_for_mentee(&self, mentee: &UserId) -> Result<Vec<MentorAssignment>> {
        let conn = self.conn()?;
        AssignmentRepo::list_for_mentee(&conn, mentee.as_str())?
            .into_iter()
            .map(into_assignment)
            .collect()
    }
}

impl std::fmt::Debug for MentorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentorStore")
            .field("pool_size", &self.pool.max_size())
            .finish()
    }
}

fn validate(mentee: &UserIdentity, mentor: &UserIdentity) -> Result<()> {
    if mentee.is_malformed() || mentor.is_malformed() {
        return Err(MentorshipError::InvalidAssignment(
            "mentee and mentor must have a non-blank id".into(),
        ));
    }
    if mentee.same_user(mentor) {
        return Err(MentorshipError::InvalidAssignment(format!(
            "user {} cannot mentor themselves",
            mentee.id
        )));
    }
    Ok(())
}

fn into_assignment(row: AssignmentRow) -> Result<MentorAssignment> {
    Ok(MentorAssignment {
        role: row.role.parse()?,
        assigned_at: parse_ts(&row.assigned_at)?,
        mentee: UserIdentity::new(row.mentee_id, row.mentee_name),
        mentor: UserIdentity::new(row.mentor_id, row.mentor_name),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

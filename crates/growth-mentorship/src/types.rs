//! Domain types for mentor assignments and mentee activity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use growth_core::UserIdentity;
use growth_settings::{ActivityPolicyKind, ActivitySettings};
use serde::{Deserialize, Serialize};

use crate::errors::MentorshipError;

/// Which slot a mentor occupies for a mentee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorRole {
    /// The mentor the mentee normally talks to.
    Primary,
    /// Stand-in while the primary mentor is away.
    Backup,
}

impl MentorRole {
    /// All roles, primary first.
    pub const ALL: [Self; 2] = [Self::Primary, Self::Backup];

    /// Persisted name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Backup => "backup",
        }
    }
}

impl fmt::Display for MentorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MentorRole {
    type Err = MentorshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "backup" => Ok(Self::Backup),
            other => Err(MentorshipError::CorruptRow(format!(
                "unknown mentor role '{other}'"
            ))),
        }
    }
}

/// A mentee's mentor in one role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorAssignment {
    /// The mentee.
    pub mentee: UserIdentity,
    /// The mentor.
    pub mentor: UserIdentity,
    /// Slot this assignment occupies.
    pub role: MentorRole,
    /// When the `(mentee, role)` slot was first filled.
    pub assigned_at: DateTime<Utc>,
}

/// Last known activity of a mentee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Mentee id.
    pub mentee_id: growth_core::UserId,
    /// Time of the most recent edit, if any was ever seen.
    pub last_active_at: Option<DateTime<Utc>>,
    /// Stored activity flag.
    pub is_active: bool,
    /// Time of the last write to this record.
    pub updated_at: DateTime<Utc>,
}

/// Rule for turning an [`ActivityRecord`] into an active/inactive answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivityPolicy {
    /// Trust the stored flag.
    #[default]
    StoredFlag,
    /// Stored flag, and `last_active_at` no older than `window`.
    Window {
        /// Maximum age of the last edit.
        window: Duration,
    },
}

impl ActivityPolicy {
    /// Build the policy described by the settings.
    pub fn from_settings(settings: &ActivitySettings) -> Self {
        match settings.policy {
            ActivityPolicyKind::StoredFlag => Self::StoredFlag,
            ActivityPolicyKind::Window => Self::Window {
                window: Duration::days(i64::from(settings.inactivity_window_days)),
            },
        }
    }

    /// Evaluate a record at `now`. A missing record is inactive.
    pub fn evaluate(&self, record: Option<&ActivityRecord>, now: DateTime<Utc>) -> bool {
        let Some(record) = record else {
            return false;
        };
        match self {
            Self::StoredFlag => record.is_active,
            Self::Window { window } => {
                record.is_active
                    && record
                        .last_active_at
                        .is_some_and(|at| now.signed_duration_since(at) <= *window)
            }
        }
    }
}

/// Format a timestamp for storage: fixed-width RFC 3339, UTC, nanoseconds,
/// so lexical order matches chronological order and nothing is truncated.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored timestamp.
pub(crate) fn parse_ts(raw: &str) -> crate::errors::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| MentorshipError::CorruptRow(format!("bad timestamp '{raw}': {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

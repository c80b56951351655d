//! Raw row shapes for the mentorship tables.
//!
//! Timestamps and roles stay as stored strings here; decoding into domain
//! types happens in the store layer.

/// Row from `mentor_assignments`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentRow {
    /// Insertion slot; stable across upserts.
    pub id: i64,
    /// Mentee id.
    pub mentee_id: String,
    /// Mentee display name.
    pub mentee_name: String,
    /// Mentor id.
    pub mentor_id: String,
    /// Mentor display name.
    pub mentor_name: String,
    /// `primary` or `backup`.
    pub role: String,
    /// First assignment of this slot.
    pub assigned_at: String,
    /// Last upsert of this slot.
    pub updated_at: String,
}

/// Row from `mentee_activity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityRow {
    /// Mentee id.
    pub mentee_id: String,
    /// Most recent edit time.
    pub last_active_at: Option<String>,
    /// Stored flag.
    pub is_active: bool,
    /// Last write time.
    pub updated_at: String,
}

//! Mentee eligibility settings.

use serde::{Deserialize, Serialize};

/// Which newcomers may be given a mentor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorshipSettings {
    /// Master switch for mentor assignment.
    pub enabled: bool,
    /// Minimum number of edits before a user can be assigned a mentor.
    pub min_editcount: u32,
    /// Minimum account age, in days.
    pub min_tenure_in_days: u32,
}

impl Default for MentorshipSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_editcount: 0,
            min_tenure_in_days: 0,
        }
    }
}

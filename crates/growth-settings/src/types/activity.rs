//! Mentee activity settings.

use serde::{Deserialize, Serialize};

/// How `is_active` answers are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityPolicyKind {
    /// Return the stored flag as written by the last mark call.
    #[default]
    StoredFlag,
    /// Stored flag, and the last edit must fall inside the inactivity window.
    Window,
}

/// Activity evaluation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivitySettings {
    /// Evaluation policy.
    pub policy: ActivityPolicyKind,
    /// Window length for [`ActivityPolicyKind::Window`], in days.
    pub inactivity_window_days: u32,
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            policy: ActivityPolicyKind::StoredFlag,
            inactivity_window_days: 14,
        }
    }
}

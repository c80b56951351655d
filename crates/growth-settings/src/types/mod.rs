//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a settings file may name only the keys it wants to change.

mod activity;
mod mentorship;
mod runtime;

pub use activity::*;
pub use mentorship::*;
pub use runtime::*;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "mentorship": { "minEditcount": 3 },
///   "activity": { "policy": "window", "inactivityWindowDays": 30 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrowthSettings {
    /// Mentee eligibility rules.
    pub mentorship: MentorshipSettings,
    /// How mentee activity is evaluated.
    pub activity: ActivitySettings,
    /// `SQLite` storage settings.
    pub database: DatabaseSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl GrowthSettings {
    /// Reject combinations the services cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "database.poolSize must be at least 1".into(),
            ));
        }
        if self.activity.policy == ActivityPolicyKind::Window
            && self.activity.inactivity_window_days == 0
        {
            return Err(SettingsError::InvalidValue(
                "activity.inactivityWindowDays must be at least 1 with the window policy".into(),
            ));
        }
        Ok(())
    }
}

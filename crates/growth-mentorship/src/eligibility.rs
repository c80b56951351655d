//! Mentee eligibility and onboarding.
//!
//! A newcomer gets a primary mentor only when mentorship is enabled and the
//! account has enough edits and tenure.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use growth_core::UserIdentity;
use growth_settings::MentorshipSettings;
use tracing::info;

use crate::errors::Result;
use crate::store::MentorStore;
use crate::types::MentorRole;

/// What the host knows about a newcomer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    /// The user.
    pub user: UserIdentity,
    /// Edits made so far.
    pub edit_count: u32,
    /// Account creation time.
    pub registered_at: DateTime<Utc>,
}

/// Why a user cannot be given a mentor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IneligibleReason {
    /// Mentorship is switched off.
    Disabled,
    /// Fewer edits than required.
    TooFewEdits {
        /// Required minimum.
        required: u32,
    },
    /// Account younger than required.
    TooNew {
        /// Required minimum, in days.
        required_days: u32,
    },
}

/// Eligibility verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    /// May be given a mentor.
    Eligible,
    /// May not, for the given reason.
    Ineligible(IneligibleReason),
}

/// Eligibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EligibilityPolicy {
    enabled: bool,
    min_editcount: u32,
    min_tenure_in_days: u32,
}

impl EligibilityPolicy {
    /// Build the policy from settings.
    pub fn from_settings(settings: &MentorshipSettings) -> Self {
        Self {
            enabled: settings.enabled,
            min_editcount: settings.min_editcount,
            min_tenure_in_days: settings.min_tenure_in_days,
        }
    }

    /// Evaluate `profile` at `now`. Checks run in order: enabled, edits,
    /// tenure.
    pub fn check(&self, profile: &UserProfile, now: DateTime<Utc>) -> Eligibility {
        if !self.enabled {
            return Eligibility::Ineligible(IneligibleReason::Disabled);
        }
        if profile.edit_count < self.min_editcount {
            return Eligibility::Ineligible(IneligibleReason::TooFewEdits {
                required: self.min_editcount,
            });
        }
        let tenure = now.signed_duration_since(profile.registered_at);
        if tenure < Duration::days(i64::from(self.min_tenure_in_days)) {
            return Eligibility::Ineligible(IneligibleReason::TooNew {
                required_days: self.min_tenure_in_days,
            });
        }
        Eligibility::Eligible
    }
}

/// Result of [`Onboarding::onboard`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OnboardOutcome {
    /// The mentor was assigned as primary.
    Assigned,
    /// A primary mentor was already assigned; nothing changed.
    AlreadyAssigned {
        /// The existing primary mentor.
        mentor: UserIdentity,
    },
    /// The user did not qualify.
    Ineligible(IneligibleReason),
}

/// Assigns primary mentors to eligible newcomers.
#[derive(Clone, Debug)]
pub struct Onboarding {
    store: Arc<MentorStore>,
    policy: EligibilityPolicy,
}

impl Onboarding {
    /// Build over a shared store.
    pub fn new(store: Arc<MentorStore>, policy: EligibilityPolicy) -> Self {
        Self { store, policy }
    }

    /// Give `profile.user` the primary mentor `mentor` if they qualify and
    /// have none yet.
    pub fn onboard(
        &self,
        profile: &UserProfile,
        mentor: &UserIdentity,
        now: DateTime<Utc>,
    ) -> Result<OnboardOutcome> {
        if let Eligibility::Ineligible(reason) = self.policy.check(profile, now) {
            info!(user = %profile.user.id, ?reason, "user not eligible for mentorship");
            return Ok(OnboardOutcome::Ineligible(reason));
        }
        if let Some(existing) = self.store.get_mentor(&profile.user.id, MentorRole::Primary)? {
            return Ok(OnboardOutcome::AlreadyAssigned { mentor: existing });
        }
        self.store
            .set_mentor(&profile.user, mentor, MentorRole::Primary)?;
        Ok(OnboardOutcome::Assigned)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

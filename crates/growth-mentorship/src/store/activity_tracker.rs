//! Mentee activity tracker.

use chrono::{DateTime, Utc};
use growth_core::UserId;
use tracing::debug;

use crate::errors::Result;
use crate::sqlite::connection::{ConnectionPool, PooledConnection};
use crate::sqlite::repositories::ActivityRepo;
use crate::sqlite::row_types::ActivityRow;
use crate::types::{ActivityPolicy, ActivityRecord, format_ts, parse_ts};

/// Records when each mentee was last active.
///
/// Writes go straight to storage. `is_active` answers according to the
/// configured [`ActivityPolicy`].
#[derive(Clone)]
pub struct ActivityTracker {
    pool: ConnectionPool,
    policy: ActivityPolicy,
}

impl ActivityTracker {
    /// Create a tracker using [`ActivityPolicy::StoredFlag`].
    pub fn new(pool: ConnectionPool) -> Self {
        Self::with_policy(pool, ActivityPolicy::default())
    }

    /// Create a tracker with an explicit policy.
    pub fn with_policy(pool: ConnectionPool, policy: ActivityPolicy) -> Self {
        Self { pool, policy }
    }

    /// The policy used by [`is_active`](Self::is_active).
    pub fn policy(&self) -> ActivityPolicy {
        self.policy
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Mark `mentee` active as of now.
    ///
    /// Same rule as [`mark_active_at`](Self::mark_active_at): if an edit with
    /// a later timestamp than the wall clock was already recorded, that later
    /// `last_active_at` is kept.
    pub fn mark_active(&self, mentee: &UserId) -> Result<()> {
        self.mark_active_at(mentee, Utc::now())
    }

    /// Mark `mentee` active as of `at`. An older `at` than the one already
    /// stored sets the flag but leaves the timestamp alone.
    pub fn mark_active_at(&self, mentee: &UserId, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        ActivityRepo::mark_active(
            &conn,
            mentee.as_str(),
            &format_ts(at),
            &format_ts(Utc::now()),
        )?;
        debug!(mentee = %mentee, at = %at, "mentee marked active");
        Ok(())
    }

    /// Clear the active flag. `last_active_at` is kept.
    pub fn mark_inactive(&self, mentee: &UserId) -> Result<()> {
        let conn = self.conn()?;
        ActivityRepo::mark_inactive(&conn, mentee.as_str(), &format_ts(Utc::now()))?;
        debug!(mentee = %mentee, "mentee marked inactive");
        Ok(())
    }

    /// Whether `mentee` counts as active now. Unknown mentees are inactive.
    pub fn is_active(&self, mentee: &UserId) -> Result<bool> {
        self.is_active_at(mentee, Utc::now())
    }

    /// Whether `mentee` counts as active at `now`.
    pub fn is_active_at(&self, mentee: &UserId, now: DateTime<Utc>) -> Result<bool> {
        let record = self.record(mentee)?;
        Ok(self.policy.evaluate(record.as_ref(), now))
    }

    /// The stored record for `mentee`, if any.
    pub fn record(&self, mentee: &UserId) -> Result<Option<ActivityRecord>> {
        let conn = self.conn()?;
        ActivityRepo::get(&conn, mentee.as_str())?
            .map(into_record)
            .transpose()
    }
}

impl std::fmt::Debug for ActivityTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityTracker")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn into_record(row: ActivityRow) -> Result<ActivityRecord> {
    Ok(ActivityRecord {
        last_active_at: row.last_active_at.as_deref().map(parse_ts).transpose()?,
        updated_at: parse_ts(&row.updated_at)?,
        is_active: row.is_active,
        mentee_id: row.mentee_id.into(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::test_support::migrated_pool;

    fn setup() -> ActivityTracker {
        ActivityTracker::new(migrated_pool())
    }

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn unknown_mentee_is_inactive() {
        let tracker = setup();
        let carol = UserId::from("3");
        assert!(!tracker.is_active(&carol).unwrap());
        assert!(tracker.record(&carol).unwrap().is_none());
    }

    #[test]
    fn mark_active_sets_flag_and_time() {
        let tracker = setup();
        let alice = UserId::from("1");
        let before = Utc::now() - Duration::milliseconds(1);
        tracker.mark_active(&alice).unwrap();
        let after = Utc::now() + Duration::milliseconds(1);

        let record = tracker.record(&alice).unwrap().unwrap();
        assert!(record.is_active);
        let at = record.last_active_at.unwrap();
        assert!(at >= before && at <= after, "{at} not in [{before}, {after}]");
        assert!(tracker.is_active(&alice).unwrap());
    }

    #[test]
    fn mark_active_repeated_keeps_last_timestamp() {
        let tracker = setup();
        let alice = UserId::from("1");
        for day in 1..=5 {
            tracker.mark_active_at(&alice, ts(day)).unwrap();
        }
        let record = tracker.record(&alice).unwrap().unwrap();
        assert!(record.is_active);
        assert_eq!(record.last_active_at, Some(ts(5)));
    }

    #[test]
    fn duplicate_mark_is_idempotent() {
        let tracker = setup();
        let alice = UserId::from("1");
        tracker.mark_active_at(&alice, ts(2)).unwrap();
        let first = tracker.record(&alice).unwrap().unwrap();
        tracker.mark_active_at(&alice, ts(2)).unwrap();
        let second = tracker.record(&alice).unwrap().unwrap();
        assert_eq!(first.last_active_at, second.last_active_at);
        assert_eq!(first.is_active, second.is_active);
    }

    #[test]
    fn late_event_does_not_rewind() {
        let tracker = setup();
        let alice = UserId::from("1");
        tracker.mark_active_at(&alice, ts(9)).unwrap();
        tracker.mark_active_at(&alice, ts(3)).unwrap();
        assert_eq!(
            tracker.record(&alice).unwrap().unwrap().last_active_at,
            Some(ts(9))
        );
    }

    #[test]
    fn sub_millisecond_timestamp_is_stored_exactly() {
        let tracker = setup();
        let alice = UserId::from("1");
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::microseconds(1_500);
        tracker.mark_active_at(&alice, at).unwrap();
        assert_eq!(
            tracker.record(&alice).unwrap().unwrap().last_active_at,
            Some(at)
        );

        // A later edit within the same millisecond still advances the value
        let later = at + Duration::nanoseconds(250);
        tracker.mark_active_at(&alice, later).unwrap();
        assert_eq!(
            tracker.record(&alice).unwrap().unwrap().last_active_at,
            Some(later)
        );
    }

    #[test]
    fn mark_active_keeps_future_dated_edit() {
        let tracker = setup();
        let alice = UserId::from("1");
        let future = Utc::now() + Duration::days(1);
        tracker.mark_active_at(&alice, future).unwrap();
        tracker.mark_active(&alice).unwrap();
        assert_eq!(
            tracker.record(&alice).unwrap().unwrap().last_active_at,
            Some(future)
        );
    }

    #[test]
    fn mark_inactive_keeps_timestamp() {
        let tracker = setup();
        let alice = UserId::from("1");
        tracker.mark_active_at(&alice, ts(4)).unwrap();
        tracker.mark_inactive(&alice).unwrap();

        let record = tracker.record(&alice).unwrap().unwrap();
        assert!(!record.is_active);
        assert_eq!(record.last_active_at, Some(ts(4)));
        assert!(!tracker.is_active(&alice).unwrap());
    }

    #[test]
    fn window_policy_expires_old_activity() {
        let policy = ActivityPolicy::Window {
            window: Duration::days(7),
        };
        let tracker = ActivityTracker::with_policy(migrated_pool(), policy);
        assert_eq!(tracker.policy(), policy);
        let alice = UserId::from("1");
        tracker.mark_active_at(&alice, ts(1)).unwrap();

        assert!(tracker.is_active_at(&alice, ts(5)).unwrap());
        assert!(!tracker.is_active_at(&alice, ts(20)).unwrap());
        // Flag alone still reads true
        assert!(tracker.record(&alice).unwrap().unwrap().is_active);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn last_active_is_maximum_seen(days in proptest::collection::vec(1u32..28, 1..20)) {
                let tracker = setup();
                let alice = UserId::from("1");
                for day in &days {
                    tracker.mark_active_at(&alice, ts(*day)).unwrap();
                }
                let max = days.iter().copied().max().map(ts);
                let record = tracker.record(&alice).unwrap().unwrap();
                prop_assert!(record.is_active);
                prop_assert_eq!(record.last_active_at, max);
            }
        }
    }
}

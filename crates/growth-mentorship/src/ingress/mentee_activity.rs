//! Edit-driven mentee activity updates.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::Result;
use crate::ingress::event::{EditEvent, HostEvent, HostEventKind};
use crate::ingress::handler::{EventHandler, HandlerOutcome};
use crate::store::{ActivityTracker, MentorStore};

/// What [`MenteeActivityHandler`] did with an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngressOutcome {
    /// The author is a mentee and was marked active.
    MarkedActive,
    /// The author has no mentor; nothing changed.
    NotMentee,
    /// The event carried no author; nothing changed.
    NoAuthor,
}

impl From<IngressOutcome> for HandlerOutcome {
    fn from(outcome: IngressOutcome) -> Self {
        match outcome {
            IngressOutcome::MarkedActive => Self::Applied,
            IngressOutcome::NotMentee => Self::Skipped {
                reason: "not_mentee",
            },
            IngressOutcome::NoAuthor => Self::Skipped {
                reason: "no_author",
            },
        }
    }
}

/// Marks mentees active when they edit.
///
/// Stateless per event: one membership lookup, then at most one upsert.
/// Redelivered events produce the same state.
#[derive(Clone, Debug)]
pub struct MenteeActivityHandler {
    store: Arc<MentorStore>,
    tracker: Arc<ActivityTracker>,
}

impl MenteeActivityHandler {
    /// Registration name.
    pub const NAME: &'static str = "mentee-activity";

    /// Build the handler over shared services.
    pub fn new(store: Arc<MentorStore>, tracker: Arc<ActivityTracker>) -> Self {
        Self { store, tracker }
    }

    /// Handle one committed revision.
    #[instrument(skip_all, fields(page = event.page_id, revision = event.revision_id))]
    pub fn on_page_revision_updated(&self, event: &EditEvent) -> Result<IngressOutcome> {
        let Some(author) = &event.author else {
            debug!("edit without author, ignoring");
            return Ok(IngressOutcome::NoAuthor);
        };

        if !self.store.is_mentee(&author.id)? {
            debug!(author = %author.id, "author is not a mentee");
            return Ok(IngressOutcome::NotMentee);
        }

        self.tracker.mark_active_at(&author.id, event.timestamp)?;
        Ok(IngressOutcome::MarkedActive)
    }
}

impl EventHandler for MenteeActivityHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn event_kind(&self) -> HostEventKind {
        HostEventKind::PageRevisionUpdated
    }

    fn handle(&self, event: &HostEvent) -> Result<HandlerOutcome> {
        match event {
            HostEvent::PageRevisionUpdated(edit) => {
                self.on_page_revision_updated(edit).map(Into::into)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{DateTime, TimeZone, Utc};
    use growth_core::UserIdentity;

    use super::*;
    use crate::sqlite::{ConnectionConfig, ConnectionPool, new_in_memory, run_migrations};
    use crate::test_support::migrated_pool;
    use crate::types::MentorRole;

    struct Fixture {
        pool: ConnectionPool,
        store: Arc<MentorStore>,
        tracker: Arc<ActivityTracker>,
        handler: MenteeActivityHandler,
    }

    fn setup() -> Fixture {
        fixture(migrated_pool())
    }

    fn setup_with_timeout(acquire_timeout: std::time::Duration) -> Fixture {
        let pool = new_in_memory(&ConnectionConfig {
            pool_size: 1,
            acquire_timeout,
            ..ConnectionConfig::default()
        })
        .unwrap();
        run_migrations(&pool.get().unwrap()).unwrap();
        fixture(pool)
    }

    fn fixture(pool: ConnectionPool) -> Fixture {
        let store = Arc::new(MentorStore::new(pool.clone()));
        let tracker = Arc::new(ActivityTracker::new(pool.clone()));
        let handler = MenteeActivityHandler::new(Arc::clone(&store), Arc::clone(&tracker));
        Fixture {
            pool,
            store,
            tracker,
            handler,
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap()
    }

    fn edit_by(author: Option<&UserIdentity>, hour: u32) -> EditEvent {
        EditEvent {
            author: author.cloned(),
            page_id: 100,
            revision_id: 1000 + u64::from(hour),
            timestamp: at(hour),
        }
    }

    #[test]
    fn mentee_edit_marks_active() {
        let f = setup();
        let (alice, bob) = (UserIdentity::new("1", "Alice"), UserIdentity::new("2", "Bob"));
        f.store.set_mentor(&alice, &bob, MentorRole::Primary).unwrap();
        f.tracker.mark_inactive(&alice.id).unwrap();

        let outcome = f
            .handler
            .on_page_revision_updated(&edit_by(Some(&alice), 3))
            .unwrap();
        assert_eq!(outcome, IngressOutcome::MarkedActive);
        assert!(f.tracker.is_active(&alice.id).unwrap());
        assert_eq!(
            f.tracker.record(&alice.id).unwrap().unwrap().last_active_at,
            Some(at(3))
        );
    }

    #[test]
    fn non_mentee_edit_leaves_tracker_untouched() {
        let f = setup();
        let carol = UserIdentity::new("3", "Carol");
        let outcome = f
            .handler
            .on_page_revision_updated(&edit_by(Some(&carol), 3))
            .unwrap();
        assert_eq!(outcome, IngressOutcome::NotMentee);
        assert!(f.tracker.record(&carol.id).unwrap().is_none());
        assert!(!f.tracker.is_active(&carol.id).unwrap());
    }

    #[test]
    fn missing_author_is_noop() {
        let f = setup();
        let outcome = f.handler.on_page_revision_updated(&edit_by(None, 3)).unwrap();
        assert_eq!(outcome, IngressOutcome::NoAuthor);
    }

    #[test]
    fn duplicate_delivery_is_idempotent() {
        let f = setup();
        let (alice, bob) = (UserIdentity::new("1", "Alice"), UserIdentity::new("2", "Bob"));
        f.store.set_mentor(&alice, &bob, MentorRole::Backup).unwrap();

        let event = edit_by(Some(&alice), 5);
        f.handler.on_page_revision_updated(&event).unwrap();
        let first = f.tracker.record(&alice.id).unwrap().unwrap();
        f.handler.on_page_revision_updated(&event).unwrap();
        let second = f.tracker.record(&alice.id).unwrap().unwrap();

        assert_eq!(first.last_active_at, second.last_active_at);
        assert!(second.is_active);
    }

    #[test]
    fn handle_maps_outcomes() {
        let f = setup();
        let carol = UserIdentity::new("3", "Carol");
        let outcome = f
            .handler
            .handle(&HostEvent::PageRevisionUpdated(edit_by(Some(&carol), 1)))
            .unwrap();
        assert_matches!(outcome, HandlerOutcome::Skipped { reason: "not_mentee" });
    }

    #[test]
    fn storage_failure_surfaces() {
        let f = setup();
        let (alice, bob) = (UserIdentity::new("1", "Alice"), UserIdentity::new("2", "Bob"));
        f.store.set_mentor(&alice, &bob, MentorRole::Primary).unwrap();
        {
            let conn = f.pool.get().unwrap();
            conn.execute_batch("DROP TABLE mentee_activity").unwrap();
        }
        let err = f
            .handler
            .on_page_revision_updated(&edit_by(Some(&alice), 2))
            .unwrap_err();
        assert_matches!(err, crate::errors::MentorshipError::Sqlite(_));
        assert!(err.is_storage_failure());
    }

    #[test]
    fn busy_pool_surfaces_as_storage_unavailable() {
        let f = setup_with_timeout(std::time::Duration::from_millis(50));
        let alice = UserIdentity::new("1", "Alice");
        let _held = f.pool.get().unwrap();

        let err = f
            .handler
            .on_page_revision_updated(&edit_by(Some(&alice), 2))
            .unwrap_err();
        assert_matches!(err, crate::errors::MentorshipError::StorageUnavailable(_));
        assert!(err.is_storage_failure());
    }
}

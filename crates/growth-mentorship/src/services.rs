//! Service wiring.
//!
//! Builds every mentorship service once, over one pool, and hands out shared
//! references. Hosts keep the [`MentorshipServices`] value for the life of
//! the process instead of reaching for globals.

use std::path::PathBuf;
use std::sync::Arc;

use growth_settings::{GrowthSettings, growth_dir};
use tracing::info;

use crate::eligibility::{EligibilityPolicy, Onboarding};
use crate::errors::Result;
use crate::ingress::{DispatchReport, EventDispatcher, HostEvent, MenteeActivityHandler};
use crate::query::QueryFacade;
use crate::sqlite::connection::{self, ConnectionConfig, ConnectionPool};
use crate::sqlite::migrations::run_migrations;
use crate::store::{ActivityTracker, MentorStore};
use crate::types::ActivityPolicy;

/// All mentorship services, sharing one connection pool.
#[derive(Debug)]
pub struct MentorshipServices {
    /// Mentor assignment store.
    pub store: Arc<MentorStore>,
    /// Activity tracker.
    pub tracker: Arc<ActivityTracker>,
    /// Read APIs.
    pub queries: QueryFacade,
    /// Eligibility-gated mentor assignment.
    pub onboarding: Onboarding,
    dispatcher: EventDispatcher,
}

impl MentorshipServices {
    /// Open the database named by `settings` (creating its directory),
    /// migrate it and build the services.
    pub fn open(settings: &GrowthSettings) -> Result<Self> {
        let path = database_path(settings);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pool = connection::new_file(
            &path.to_string_lossy(),
            &ConnectionConfig::from(&settings.database),
        )?;
        info!(path = %path.display(), "opened mentorship database");
        Self::from_pool(pool, settings)
    }

    /// Build services over a single-connection in-memory database.
    pub fn in_memory(settings: &GrowthSettings) -> Result<Self> {
        let pool = connection::new_in_memory(&ConnectionConfig {
            pool_size: 1,
            ..ConnectionConfig::from(&settings.database)
        })?;
        Self::from_pool(pool, settings)
    }

    /// Migrate `pool` and build the services over it.
    pub fn from_pool(pool: ConnectionPool, settings: &GrowthSettings) -> Result<Self> {
        {
            let conn = pool.get()?;
            let _ = run_migrations(&conn)?;
        }

        let store = Arc::new(MentorStore::new(pool.clone()));
        let tracker = Arc::new(ActivityTracker::with_policy(
            pool,
            ActivityPolicy::from_settings(&settings.activity),
        ));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::new(MenteeActivityHandler::new(
            Arc::clone(&store),
            Arc::clone(&tracker),
        )));

        Ok(Self {
            queries: QueryFacade::new(Arc::clone(&store), Arc::clone(&tracker)),
            onboarding: Onboarding::new(
                Arc::clone(&store),
                EligibilityPolicy::from_settings(&settings.mentorship),
            ),
            store,
            tracker,
            dispatcher,
        })
    }

    /// The event dispatcher, for registering extra handlers.
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// Deliver a host event to every registered handler.
    pub fn dispatch(&self, event: &HostEvent) -> DispatchReport {
        self.dispatcher.dispatch(event)
    }
}

/// Resolve the database path from settings (`~/.growth/growth.db` by default).
pub fn database_path(settings: &GrowthSettings) -> PathBuf {
    settings
        .database
        .path
        .as_ref()
        .map_or_else(|| growth_dir().join("growth.db"), PathBuf::from)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use growth_core::UserIdentity;
    use growth_settings::ActivityPolicyKind;

    use super::*;
    use crate::ingress::{EditEvent, FnHandler, HandlerOutcome, HostEventKind};
    use crate::types::MentorRole;

    #[test]
    fn in_memory_services_dispatch_edits() {
        let services = MentorshipServices::in_memory(&GrowthSettings::default()).unwrap();
        let (alice, bob) = (UserIdentity::new("1", "Alice"), UserIdentity::new("2", "Bob"));
        services
            .store
            .set_mentor(&alice, &bob, MentorRole::Primary)
            .unwrap();

        let report = services.dispatch(&HostEvent::PageRevisionUpdated(EditEvent {
            author: Some(alice.clone()),
            page_id: 1,
            revision_id: 2,
            timestamp: Utc::now(),
        }));
        assert!(report.is_clean());
        assert_eq!(
            report.outcome_of(MenteeActivityHandler::NAME),
            Some(HandlerOutcome::Applied)
        );
        assert!(services.queries.is_active(&alice.id).unwrap());
    }

    #[test]
    fn extra_handlers_run_alongside_builtin() {
        let mut settings = GrowthSettings::default();
        settings.activity.policy = ActivityPolicyKind::Window;
        let mut services = MentorshipServices::in_memory(&settings).unwrap();
        assert_matches!(
            services.tracker.policy(),
            ActivityPolicy::Window { .. }
        );

        services.dispatcher_mut().register(Arc::new(FnHandler::new(
            "audit",
            HostEventKind::PageRevisionUpdated,
            |_: &HostEvent| Ok(HandlerOutcome::Skipped { reason: "audit" }),
        )));

        let report = services.dispatch(&HostEvent::PageRevisionUpdated(EditEvent {
            author: None,
            page_id: 1,
            revision_id: 1,
            timestamp: Utc::now(),
        }));
        assert_eq!(report.handler_count(), 2);
        assert_eq!(
            report.outcome_of("audit"),
            Some(HandlerOutcome::Skipped { reason: "audit" })
        );
        assert_eq!(
            report.outcome_of(MenteeActivityHandler::NAME),
            Some(HandlerOutcome::Skipped { reason: "no_author" })
        );
    }

    #[test]
    fn open_creates_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("growth.db");
        let mut settings = GrowthSettings::default();
        settings.database.path = Some(path.to_string_lossy().into_owned());

        let services = MentorshipServices::open(&settings).unwrap();
        let (dave, eve) = (UserIdentity::new("4", "Dave"), UserIdentity::new("5", "Eve"));
        services
            .store
            .set_mentor(&dave, &eve, MentorRole::Primary)
            .unwrap();
        drop(services);

        assert!(path.exists());
        let reopened = MentorshipServices::open(&settings).unwrap();
        assert!(reopened.store.is_mentee(&dave.id).unwrap());
    }

    #[test]
    fn default_database_path_under_growth_dir() {
        let path = database_path(&GrowthSettings::default());
        assert!(path.ends_with(".growth/growth.db"));
    }
}

//! Read-only queries for dashboards.
//!
//! The facade reads both stores without coordinating with writers. An answer
//! can reflect an assignment made after the activity read, or the reverse;
//! the next read catches up.

use std::collections::HashSet;
use std::sync::Arc;

use growth_core::{UserId, UserIdentity};

use crate::errors::Result;
use crate::store::{ActivityTracker, MentorStore};
use crate::types::MentorRole;

/// Read APIs over the mentor store and activity tracker.
#[derive(Clone, Debug)]
pub struct QueryFacade {
    store: Arc<MentorStore>,
    tracker: Arc<ActivityTracker>,
}

impl QueryFacade {
    /// Build a facade over shared services.
    pub fn new(store: Arc<MentorStore>, tracker: Arc<ActivityTracker>) -> Self {
        Self { store, tracker }
    }

    /// Active mentees of `mentor`, across both roles.
    ///
    /// Takes a snapshot of the mentor's assignments now. Activity is checked
    /// lazily as the returned sequence is iterated, and again on every new
    /// iteration.
    pub fn list_active_mentees(&self, mentor: &UserId) -> Result<ActiveMentees> {
        let mut seen = HashSet::new();
        let mentees = self
            .store
            .assignments_for_mentor(mentor, None)?
            .into_iter()
            .map(|a| a.mentee)
            .filter(|mentee| seen.insert(mentee.id.clone()))
            .collect();
        Ok(ActiveMentees {
            mentees,
            tracker: Arc::clone(&self.tracker),
        })
    }

    /// See [`MentorStore::get_mentor`].
    pub fn get_mentor(&self, mentee: &UserId, role: MentorRole) -> Result<Option<UserIdentity>> {
        self.store.get_mentor(mentee, role)
    }

    /// See [`ActivityTracker::is_active`].
    pub fn is_active(&self, mentee: &UserId) -> Result<bool> {
        self.tracker.is_active(mentee)
    }
}

/// Finite, restartable sequence of a mentor's active mentees.
///
/// Order follows first assignment to the mentor. Each item is the outcome of
/// one activity lookup.
#[derive(Clone, Debug)]
pub struct ActiveMentees {
    mentees: Vec<UserIdentity>,
    tracker: Arc<ActivityTracker>,
}

impl ActiveMentees {
    /// Start a fresh pass over the mentees.
    pub fn iter(&self) -> ActiveMenteesIter<'_> {
        ActiveMenteesIter {
            inner: self.mentees.iter(),
            tracker: &self.tracker,
        }
    }

    /// Number of mentees considered (active or not).
    pub fn candidate_count(&self) -> usize {
        self.mentees.len()
    }

    /// Run one pass and collect the active mentees.
    pub fn collect_all(&self) -> Result<Vec<UserIdentity>> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &'a ActiveMentees {
    type Item = Result<UserIdentity>;
    type IntoIter = ActiveMenteesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over [`ActiveMentees`].
#[derive(Debug)]
pub struct ActiveMenteesIter<'a> {
    inner: std::slice::Iter<'a, UserIdentity>,
    tracker: &'a ActivityTracker,
}

impl Iterator for ActiveMenteesIter<'_> {
    type Item = Result<UserIdentity>;

    fn next(&mut self) -> Option<Self::Item> {
        for mentee in self.inner.by_ref() {
            match self.tracker.is_active(&mentee.id) {
                Ok(true) => return Some(Ok(mentee.clone())),
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

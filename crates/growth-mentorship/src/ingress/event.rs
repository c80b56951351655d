//! Events delivered by the host.

use std::fmt;

use chrono::{DateTime, Utc};
use growth_core::UserIdentity;
use serde::{Deserialize, Serialize};

/// A committed page revision.
///
/// Delivered at least once; handlers must tolerate duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEvent {
    /// Author of the revision. The host may send `None` for suppressed or
    /// imported revisions.
    pub author: Option<UserIdentity>,
    /// Host page id.
    pub page_id: u64,
    /// Host revision id.
    pub revision_id: u64,
    /// Commit time of the revision.
    pub timestamp: DateTime<Utc>,
}

/// Notification from the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum HostEvent {
    /// A page revision was committed.
    PageRevisionUpdated(EditEvent),
}

impl HostEvent {
    /// The registration key for this event.
    pub fn kind(&self) -> HostEventKind {
        match self {
            Self::PageRevisionUpdated(_) => HostEventKind::PageRevisionUpdated,
        }
    }
}

/// Event name handlers register against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum HostEventKind {
    /// See [`HostEvent::PageRevisionUpdated`].
    PageRevisionUpdated,
}

impl HostEventKind {
    /// Wire name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageRevisionUpdated => "pageRevisionUpdated",
        }
    }
}

impl fmt::Display for HostEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

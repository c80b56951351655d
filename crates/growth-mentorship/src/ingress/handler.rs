//! Event handler trait.
//!
//! Handlers are registered with the
//! [`EventDispatcher`](crate::ingress::EventDispatcher) and run synchronously
//! for each matching event.

use std::fmt;

use crate::errors::Result;
use crate::ingress::event::{HostEvent, HostEventKind};

/// What a handler did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler changed state.
    Applied,
    /// The event was not relevant to the handler.
    Skipped {
        /// Short machine-readable reason.
        reason: &'static str,
    },
}

/// A host event handler.
///
/// Handlers must be reentrant and idempotent: the host may deliver the same
/// event more than once, and different events may be handled concurrently.
pub trait EventHandler: Send + Sync {
    /// Unique name for this handler.
    fn name(&self) -> &str;

    /// Which event this handler responds to.
    fn event_kind(&self) -> HostEventKind;

    /// Execution priority. Higher runs first. Default: 0.
    fn priority(&self) -> i32 {
        0
    }

    /// Handle one event.
    fn handle(&self, event: &HostEvent) -> Result<HandlerOutcome>;
}

/// Adapts a plain function into an [`EventHandler`].
pub struct FnHandler<F> {
    name: String,
    kind: HostEventKind,
    priority: i32,
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&HostEvent) -> Result<HandlerOutcome> + Send + Sync,
{
    /// Wrap `func` as a handler for `kind`.
    pub fn new(name: impl Into<String>, kind: HostEventKind, func: F) -> Self {
        Self {
            name: name.into(),
            kind,
            priority: 0,
            func,
        }
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&HostEvent) -> Result<HandlerOutcome> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn event_kind(&self) -> HostEventKind {
        self.kind
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn handle(&self, event: &HostEvent) -> Result<HandlerOutcome> {
        (self.func)(event)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

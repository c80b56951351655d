//! Event dispatcher.
//!
//! Holds a priority-sorted list of [`EventHandler`]s per [`HostEventKind`].
//! Dispatch runs every handler for the event's kind, in priority order, and
//! reports each failure back to the caller. A failing handler does not stop
//! the ones after it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{MentorshipError, Result};
use crate::ingress::event::{HostEvent, HostEventKind};
use crate::ingress::handler::{EventHandler, HandlerOutcome};

/// A handler that returned an error.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Handler name.
    pub handler: String,
    /// The error it returned.
    pub error: MentorshipError,
}

/// Result of dispatching one event.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Handlers that completed, with their outcome, in run order.
    pub completed: Vec<(String, HandlerOutcome)>,
    /// Handlers that failed, in run order.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// No handler failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of handlers that ran.
    pub fn handler_count(&self) -> usize {
        self.completed.len() + self.failures.len()
    }

    /// Outcome reported by the named handler, if it completed.
    pub fn outcome_of(&self, handler: &str) -> Option<HandlerOutcome> {
        self.completed
            .iter()
            .find(|(name, _)| name == handler)
            .map(|(_, outcome)| *outcome)
    }

    /// Convert into the completed outcomes, or the first failure.
    pub fn into_result(self) -> Result<Vec<(String, HandlerOutcome)>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(self.completed),
        }
    }
}

/// Registry and router of host event handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<HostEventKind, Vec<Arc<dyn EventHandler>>>,
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A handler with the same name for the same event
    /// kind is replaced.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        let kind = handler.event_kind();
        let name = handler.name().to_string();

        let handlers = self.handlers.entry(kind).or_default();
        handlers.retain(|h| h.name() != name);

        debug!(name = %name, event = %kind, priority = handler.priority(), "registering event handler");
        handlers.push(handler);
        handlers.sort_by_key(|h| std::cmp::Reverse(h.priority()));
    }

    /// Remove a handler by name from every event kind. Returns whether one
    /// was found.
    pub fn unregister(&mut self, name: &str) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|h| h.name() != name);
            found |= handlers.len() < before;
        }
        if found {
            debug!(name = %name, "unregistered event handler");
        }
        found
    }

    /// Handlers for `kind`, highest priority first.
    #[must_use]
    pub fn handlers_for(&self, kind: HostEventKind) -> Vec<Arc<dyn EventHandler>> {
        self.handlers.get(&kind).cloned().unwrap_or_default()
    }

    /// Total registered handlers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Run every handler registered for the event's kind.
    pub fn dispatch(&self, event: &HostEvent) -> DispatchReport {
        let kind = event.kind();
        let mut report = DispatchReport::default();

        let Some(handlers) = self.handlers.get(&kind) else {
            debug!(event = %kind, "no handlers registered");
            return report;
        };

        for handler in handlers {
            match handler.handle(event) {
                Ok(outcome) => {
                    debug!(handler = handler.name(), event = %kind, ?outcome, "handler completed");
                    report.completed.push((handler.name().to_string(), outcome));
                }
                Err(error) => {
                    warn!(handler = handler.name(), event = %kind, error = %error, "handler failed");
                    report.failures.push(HandlerFailure {
                        handler: handler.name().to_string(),
                        error,
                    });
                }
            }
        }

        report
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handler_count", &self.count())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

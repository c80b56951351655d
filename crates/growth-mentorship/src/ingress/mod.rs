//! Host event ingress.
//!
//! The host wiki pushes [`HostEvent`]s after it commits changes. An
//! [`EventDispatcher`] routes each event to the [`EventHandler`]s registered
//! for its [`HostEventKind`]. [`MenteeActivityHandler`] is the handler that
//! turns edits by mentees into activity updates.

mod dispatcher;
mod event;
mod handler;
mod mentee_activity;

pub use dispatcher::{DispatchReport, EventDispatcher, HandlerFailure};
pub use event::{EditEvent, HostEvent, HostEventKind};
pub use handler::{EventHandler, FnHandler, HandlerOutcome};
pub use mentee_activity::{IngressOutcome, MenteeActivityHandler};

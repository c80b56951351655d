//! Mentorship state services.
//!
//! [`MentorStore`] owns the `(mentee, role) → mentor` relation and
//! [`ActivityTracker`] owns the `mentee → activity` relation. They share a
//! connection pool but never each other's tables.

mod activity_tracker;
mod mentor_store;

pub use activity_tracker::ActivityTracker;
pub use mentor_store::MentorStore;

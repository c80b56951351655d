//! # growth-mentorship
//!
//! Mentee activity tracking with a `SQLite` backend.
//!
//! - **Mentor assignment store** ([`MentorStore`]): `(mentee, role) → mentor`
//! - **Activity tracker** ([`ActivityTracker`]): `mentee → last active / flag`
//! - **Event ingress** ([`ingress`]): routes host edit notifications to
//!   handlers; [`MenteeActivityHandler`] marks editing mentees active
//! - **Query facade** ([`QueryFacade`]): read APIs for dashboards
//! - **Eligibility** ([`eligibility`]): who may be given a mentor
//! - **Wiring** ([`MentorshipServices`]): builds all of the above over one pool

#![deny(unsafe_code)]

pub mod eligibility;
pub mod errors;
pub mod ingress;
pub mod query;
pub mod services;
pub mod sqlite;
pub mod store;
pub mod types;

pub use eligibility::{Eligibility, EligibilityPolicy, OnboardOutcome, Onboarding, UserProfile};
pub use errors::{MentorshipError, Result};
pub use ingress::{
    DispatchReport, EditEvent, EventDispatcher, EventHandler, HostEvent, HostEventKind,
    IngressOutcome, MenteeActivityHandler,
};
pub use query::{ActiveMentees, QueryFacade};
pub use services::MentorshipServices;
pub use store::{ActivityTracker, MentorStore};
pub use types::{ActivityPolicy, ActivityRecord, MentorAssignment, MentorRole};

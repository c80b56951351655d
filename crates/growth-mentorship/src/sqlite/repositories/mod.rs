//! Stateless repositories. Every method takes `&Connection`.

pub mod activity;
pub mod assignment;

pub use activity::ActivityRepo;
pub use assignment::{AssignmentRepo, NewAssignment};

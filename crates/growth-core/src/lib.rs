//! # growth-core
//!
//! Foundation types shared by every growth crate:
//!
//! - **Identity**: [`UserId`] and [`UserIdentity`], opaque handles supplied
//!   by the host wiki
//! - **Logging**: [`logging::init_subscriber`] for binaries and tests

#![deny(unsafe_code)]

pub mod ids;
pub mod logging;

pub use ids::{UserId, UserIdentity};

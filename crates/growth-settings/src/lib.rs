//! # growth-settings
//!
//! Typed configuration for the growth services.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`GrowthSettings::default()`]
//! 2. **User file**: `~/.growth/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `GROWTH_*` overrides (highest priority)
//!
//! Nothing here is global. Callers load a [`GrowthSettings`] value and pass
//! it (or the relevant section) to the services they construct.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, growth_dir, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

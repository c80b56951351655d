//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`GrowthSettings::default()`]
//! 2. If `~/.growth/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. [`GrowthSettings::validate`]
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::GrowthSettings;

/// Resolve the growth data directory (`~/.growth`).
pub fn growth_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".growth")
}

/// Resolve the path to the settings file (`~/.growth/settings.json`).
pub fn settings_path() -> PathBuf {
    growth_dir().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<GrowthSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<GrowthSettings> {
    let mut settings = read_layered(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn read_layered(path: &Path) -> Result<GrowthSettings> {
    let defaults = serde_json::to_value(GrowthSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `GROWTH_*` environment variable overrides.
///
/// Invalid values are ignored with a warning.
pub fn apply_env_overrides(settings: &mut GrowthSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`, so tests need not touch the
/// process environment.
pub fn apply_overrides_from(
    settings: &mut GrowthSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let string = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = string("GROWTH_DB_PATH") {
        settings.database.path = Some(v);
    }
    if let Some(v) = string("GROWTH_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = string("GROWTH_MENTORSHIP_ENABLED") {
        match parse_bool(&v) {
            Some(b) => settings.mentorship.enabled = b,
            None => warn!(key = "GROWTH_MENTORSHIP_ENABLED", value = %v, "invalid boolean env var, ignoring"),
        }
    }
    if let Some(v) = string("GROWTH_MIN_EDITCOUNT") {
        match parse_u32_range(&v, 0, 1_000_000) {
            Some(n) => settings.mentorship.min_editcount = n,
            None => warn!(key = "GROWTH_MIN_EDITCOUNT", value = %v, "invalid u32 env var, ignoring"),
        }
    }
    if let Some(v) = string("GROWTH_MIN_TENURE_DAYS") {
        match parse_u32_range(&v, 0, 36_500) {
            Some(n) => settings.mentorship.min_tenure_in_days = n,
            None => warn!(key = "GROWTH_MIN_TENURE_DAYS", value = %v, "invalid u32 env var, ignoring"),
        }
    }
    if let Some(v) = string("GROWTH_INACTIVITY_WINDOW_DAYS") {
        match parse_u32_range(&v, 1, 36_500) {
            Some(n) => settings.activity.inactivity_window_days = n,
            None => warn!(key = "GROWTH_INACTIVITY_WINDOW_DAYS", value = %v, "invalid u32 env var, ignoring"),
        }
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u32` within an inclusive range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;
    use crate::types::ActivityPolicyKind;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn deep_merge_nested_objects() {
        let target = serde_json::json!({"a": {"x": 1, "y": 2}, "b": 3});
        let source = serde_json::json!({"a": {"y": 20}, "c": 4});
        let merged = deep_merge(target, source);
        assert_eq!(merged, serde_json::json!({"a": {"x": 1, "y": 20}, "b": 3, "c": 4}));
    }

    #[test]
    fn deep_merge_skips_null() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"a": null}));
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn deep_merge_replaces_arrays() {
        let merged = deep_merge(
            serde_json::json!({"a": [1, 2, 3]}),
            serde_json::json!({"a": [9]}),
        );
        assert_eq!(merged["a"], serde_json::json!([9]));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_layered(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, GrowthSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"mentorship": {"minEditcount": 3}, "activity": {"policy": "window"}}"#,
        )
        .unwrap();

        let settings = read_layered(&path).unwrap();
        assert_eq!(settings.mentorship.min_editcount, 3);
        assert!(settings.mentorship.enabled);
        assert_eq!(settings.activity.policy, ActivityPolicyKind::Window);
        assert_eq!(settings.activity.inactivity_window_days, 14);
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_layered(&path), Err(SettingsError::Json(_))));
    }

    #[test]
    fn invalid_combination_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"database": {"poolSize": 0}}"#).unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut settings = GrowthSettings::default();
        apply_overrides_from(
            &mut settings,
            env(&[
                ("GROWTH_DB_PATH", "/tmp/g.db"),
                ("GROWTH_LOG_LEVEL", "debug"),
                ("GROWTH_MENTORSHIP_ENABLED", "off"),
                ("GROWTH_MIN_EDITCOUNT", "10"),
                ("GROWTH_MIN_TENURE_DAYS", "2"),
                ("GROWTH_INACTIVITY_WINDOW_DAYS", "30"),
            ]),
        );
        assert_eq!(settings.database.path.as_deref(), Some("/tmp/g.db"));
        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.mentorship.enabled);
        assert_eq!(settings.mentorship.min_editcount, 10);
        assert_eq!(settings.mentorship.min_tenure_in_days, 2);
        assert_eq!(settings.activity.inactivity_window_days, 30);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut settings = GrowthSettings::default();
        apply_overrides_from(
            &mut settings,
            env(&[
                ("GROWTH_MENTORSHIP_ENABLED", "maybe"),
                ("GROWTH_MIN_EDITCOUNT", "-1"),
                ("GROWTH_INACTIVITY_WINDOW_DAYS", "0"),
                ("GROWTH_DB_PATH", ""),
            ]),
        );
        assert_eq!(settings, GrowthSettings::default());
    }

    #[test]
    fn parse_bool_variants() {
        for v in ["true", "1", "YES", "On"] {
            assert_eq!(parse_bool(v), Some(true));
        }
        for v in ["false", "0", "no", "OFF"] {
            assert_eq!(parse_bool(v), Some(false));
        }
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn parse_u32_bounds() {
        assert_eq!(parse_u32_range("5", 1, 10), Some(5));
        assert_eq!(parse_u32_range("0", 1, 10), None);
        assert_eq!(parse_u32_range("11", 1, 10), None);
        assert_eq!(parse_u32_range("abc", 1, 10), None);
    }
}

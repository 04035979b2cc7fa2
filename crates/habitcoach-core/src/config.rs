//! TOML-based engine configuration.
//!
//! Groups the tunable thresholds of every engine plus logging and the
//! caller's time zone:
//! - Pattern mining thresholds
//! - Suggestion rule thresholds
//! - Sleep defaults for the circadian profile
//! - Reminder floor size, hydration fallback and settle delay
//!
//! Configuration is stored at `~/.config/habitcoach/config.toml`.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::patterns::PatternConfig;
use crate::reminders::ReminderConfig;
use crate::scheduler::ScheduleConfig;
use crate::suggestions::SuggestionConfig;

/// Returns `~/.config/habitcoach[-dev]/` based on HABITCOACH_ENV.
///
/// Set HABITCOACH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITCOACH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitcoach-dev")
    } else {
        base_dir.join("habitcoach")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/habitcoach/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Caller's local offset from UTC in minutes. All day boundaries use it.
    #[serde(default)]
    pub timezone_offset_minutes: i32,
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// The configured local zone; out-of-range offsets fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// `reminders.floor_size` as a JSON pointer, `/reminders/floor_size`.
    fn pointer(key: &str) -> Option<String> {
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return None;
        }
        Some(format!("/{}", key.replace('.', "/")))
    }

    /// Parse `raw` into the JSON type already stored at the key.
    fn coerce(existing: &serde_json::Value, raw: &str) -> Result<serde_json::Value, String> {
        use serde_json::Value;
        match existing {
            Value::Bool(_) => raw.parse::<bool>().map(Value::Bool).map_err(|e| e.to_string()),
            Value::Number(_) => raw
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| {
                    raw.parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .ok_or_else(|| format!("cannot parse '{raw}' as number"))
                }),
            Value::Array(_) => serde_json::from_str(raw).map_err(|e| e.to_string()),
            _ => Ok(Value::String(raw.to_string())),
        }
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: EngineConfig = toml::from_str(&content)?;
        Ok(cfg)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = json.pointer(&Self::pointer(key)?)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let slot = Self::pointer(key)
            .and_then(|p| json.pointer_mut(&p))
            .filter(|v| !v.is_object())
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let parsed = Self::coerce(slot, value).map_err(|message| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        })?;
        *slot = parsed;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.reminders.floor_size, 7);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            timezone_offset_minutes = 120

            [reminders]
            floor_size = 5
            "#,
        )
        .unwrap();

        assert_eq!(parsed.reminders.floor_size, 5);
        assert_eq!(parsed.reminders.ml_per_glass, 240.0);
        assert_eq!(parsed.patterns, PatternConfig::default());
        assert_eq!(parsed.timezone().local_minus_utc(), 7200);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.get("reminders.floor_size").as_deref(), Some("7"));
        assert_eq!(cfg.get("logging.level").as_deref(), Some("info"));
        assert!(cfg.get("reminders.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = EngineConfig::default();
        cfg.set("reminders.floor_size", "9").unwrap();
        cfg.set("patterns.timing_min_strength", "0.75").unwrap();
        cfg.set("logging.level", "debug").unwrap();

        assert_eq!(cfg.reminders.floor_size, 9);
        assert_eq!(cfg.patterns.timing_min_strength, 0.75);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = EngineConfig::default();
        assert!(matches!(
            cfg.set("reminders.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("reminders.floor_size", "many"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(cfg.set("reminders", "{}"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("reminders..floor_size", "1"), Err(ConfigError::UnknownKey(_))));
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = EngineConfig::default();
        cfg.timezone_offset_minutes = -300;
        cfg.save_to(&path).unwrap();

        let loaded = EngineConfig::load_from(&path).unwrap();
        assert_eq!(loaded.timezone_offset_minutes, -300);
    }

    #[test]
    fn load_from_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reminders = 3").unwrap();

        assert!(matches!(
            EngineConfig::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}

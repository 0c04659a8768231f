//! TOML-based application configuration.
//!
//! Stores the defaults applied to newly created alarms plus notification
//! preferences. Lives at `~/.config/wakequest/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::alarm::{Alarm, Difficulty, TimeOfDay};
use crate::error::{ConfigError, CoreError, Result};

/// Defaults for newly created alarms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmDefaultsConfig {
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_true")]
    pub snooze_enabled: bool,
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: u32,
    #[serde(default = "default_snooze_max")]
    pub snooze_max: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

/// Notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_50")]
    pub volume: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/wakequest/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: AlarmDefaultsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_time() -> String {
    "07:00".into()
}
fn default_label() -> String {
    "Morning mission".into()
}
fn default_snooze_minutes() -> u32 {
    5
}
fn default_snooze_max() -> u32 {
    3
}
fn default_difficulty() -> String {
    "easy".into()
}
fn default_sound() -> String {
    "default".into()
}
fn default_volume() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}

impl Default for AlarmDefaultsConfig {
    fn default() -> Self {
        Self {
            time: default_time(),
            label: default_label(),
            snooze_enabled: true,
            snooze_minutes: default_snooze_minutes(),
            snooze_max: default_snooze_max(),
            difficulty: default_difficulty(),
            sound: default_sound(),
            volume: default_volume(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 50,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: AlarmDefaultsConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| {
                    CoreError::Config(ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    })
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| {
            CoreError::Config(ConfigError::SaveFailed {
                path: path.clone(),
                message: e.to_string(),
            })
        })?;
        std::fs::write(&path, content).map_err(|e| {
            CoreError::Config(ConfigError::SaveFailed {
                path,
                message: e.to_string(),
            })
        })?;
        Ok(())
    }

    /// A fresh alarm seeded from the configured defaults.
    pub fn default_alarm(&self) -> Alarm {
        let time = self.defaults.time.parse::<TimeOfDay>().unwrap_or_default();
        let mut alarm = Alarm::new(time);
        alarm.label = self.defaults.label.clone();
        alarm.snooze_enabled = self.defaults.snooze_enabled;
        alarm.snooze_minutes = self.defaults.snooze_minutes.max(1);
        alarm.snooze_max = self.defaults.snooze_max;
        alarm.sound_id = self.defaults.sound.clone();
        alarm.volume = self.defaults.volume.clamp(0.0, 1.0);
        alarm.difficulty = self
            .defaults
            .difficulty
            .parse()
            .unwrap_or(Difficulty::Easy);
        alarm
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    ///
    /// The new value must parse as the same JSON type the key already holds.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;

        let mut current = &mut json;
        let mut parts = key.split('.').peekable();
        loop {
            let part = parts
                .next()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let new_value = parse_as_same_type(existing, value)
                    .map_err(ConfigError::ParseFailed)?;
                obj.insert(part.to_string(), new_value);
                break;
            }
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        *self = serde_json::from_value(json)?;
        self.save()
    }
}

fn parse_as_same_type(
    existing: &serde_json::Value,
    value: &str,
) -> std::result::Result<serde_json::Value, String> {
    match existing {
        serde_json::Value::Bool(_) => value
            .parse::<bool>()
            .map(serde_json::Value::Bool)
            .map_err(|_| format!("cannot parse '{value}' as bool")),
        serde_json::Value::Number(_) => {
            if let Ok(n) = value.parse::<u64>() {
                Ok(serde_json::Value::Number(n.into()))
            } else if let Ok(n) = value.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| format!("cannot parse '{value}' as number"))
            } else {
                Err(format!("cannot parse '{value}' as number"))
            }
        }
        _ => Ok(serde_json::Value::String(value.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.defaults.time, "07:00");
        assert_eq!(parsed.defaults.snooze_minutes, 5);
        assert_eq!(parsed.notifications.volume, 50);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.time").as_deref(), Some("07:00"));
        assert_eq!(cfg.get("defaults.snooze_max").as_deref(), Some("3"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert!(cfg.get("defaults.missing_key").is_none());
    }

    #[test]
    fn default_alarm_reflects_configured_defaults() {
        let mut cfg = Config::default();
        cfg.defaults.time = "06:15".into();
        cfg.defaults.difficulty = "hard".into();
        cfg.defaults.snooze_max = 1;

        let alarm = cfg.default_alarm();
        assert_eq!(alarm.time_of_day.to_string(), "06:15");
        assert_eq!(alarm.difficulty, Difficulty::Hard);
        assert_eq!(alarm.snooze_max, 1);
        assert!(alarm.enabled);
        assert!(alarm.validate().is_ok());
    }

    #[test]
    fn default_alarm_tolerates_bad_configured_time() {
        let mut cfg = Config::default();
        cfg.defaults.time = "25:99".into();
        let alarm = cfg.default_alarm();
        assert_eq!(alarm.time_of_day.to_string(), "07:00");
    }

    #[test]
    fn empty_toml_fills_every_default() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.defaults.label, "Morning mission");
        assert_eq!(parsed.defaults.volume, 1.0);
        assert!(parsed.notifications.enabled);
    }
}

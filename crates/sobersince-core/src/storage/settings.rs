//! Flat key-value settings persistence.
//!
//! All user state fits in a handful of scalar values, so settings are a
//! single flat TOML table rather than a nested config struct. The core
//! goes through the [`SettingsStore`] trait so an app shell can substitute
//! the platform's own preference store; [`FileSettings`] is the default
//! file-backed implementation and [`MemorySettings`] backs tests.
//!
//! The default file lives at `~/.config/sobersince/settings.toml`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::{clamp_start, NotificationPreferences, SobrietyRecord};

/// Keys understood by the settings store.
///
/// The names are load-bearing: renaming one orphans the values earlier
/// versions of the app wrote under it.
pub mod keys {
    pub const DISPLAY_NAME: &str = "displayName";
    pub const SOBRIETY_START_TIMESTAMP: &str = "sobrietyStartTimestamp";
    pub const NOTIFICATIONS_ENABLED: &str = "notificationsEnabled";
    pub const NOTIFICATION_TIME_OF_DAY: &str = "notificationTimeOfDay";
}

/// Typed access to a flat settings table.
///
/// Getters return `Ok(None)` for a missing key and
/// [`ConfigError::InvalidValue`] for a present key of the wrong type.
/// Setters persist immediately.
pub trait SettingsStore {
    fn get_str(&self, key: &str) -> Result<Option<String>, ConfigError>;
    fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError>;
    fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError>;
    fn set_str(&mut self, key: &str, value: &str) -> Result<(), ConfigError>;
    fn set_f64(&mut self, key: &str, value: f64) -> Result<(), ConfigError>;
    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ConfigError>;
    fn remove(&mut self, key: &str) -> Result<(), ConfigError>;
}

/// File-backed settings, written through on every change.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    table: toml::Table,
}

impl FileSettings {
    /// Open the default settings file, creating the data directory if
    /// needed. A missing file starts empty and is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// file exists but is not valid TOML.
    pub fn open() -> Result<Self, ConfigError> {
        let dir = super::data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("settings.toml"),
            message: e.to_string(),
        })?;
        Self::at(dir.join("settings.toml"))
    }

    /// Open a settings file at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let table = match std::fs::read_to_string(&path) {
            Ok(content) => {
                content
                    .parse::<toml::Table>()
                    .map_err(|e| ConfigError::LoadFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    })?
            }
            Err(_) => toml::Table::new(),
        };
        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(&self.table).map_err(|e| ConfigError::SaveFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.table.get(key).map(|v| value_to_str(key, v)).transpose()
    }

    fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        self.table.get(key).map(|v| value_to_f64(key, v)).transpose()
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.table.get(key).map(|v| value_to_bool(key, v)).transpose()
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.table
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        self.save()
    }

    fn set_f64(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        self.table.insert(key.to_string(), toml::Value::Float(value));
        self.save()
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ConfigError> {
        self.table
            .insert(key.to_string(), toml::Value::Boolean(value));
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigError> {
        if self.table.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// In-memory settings for tests and previews.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    table: toml::Table,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.table.get(key).map(|v| value_to_str(key, v)).transpose()
    }

    fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        self.table.get(key).map(|v| value_to_f64(key, v)).transpose()
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.table.get(key).map(|v| value_to_bool(key, v)).transpose()
    }

    fn set_str(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.table
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        Ok(())
    }

    fn set_f64(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        self.table.insert(key.to_string(), toml::Value::Float(value));
        Ok(())
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ConfigError> {
        self.table
            .insert(key.to_string(), toml::Value::Boolean(value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ConfigError> {
        self.table.remove(key);
        Ok(())
    }
}

fn value_to_str(key: &str, value: &toml::Value) -> Result<String, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        other => Err(invalid(key, other, "string")),
    }
}

fn value_to_f64(key: &str, value: &toml::Value) -> Result<f64, ConfigError> {
    match value {
        toml::Value::Float(f) => Ok(*f),
        // Hand-edited files tend to drop the decimal point.
        toml::Value::Integer(i) => Ok(*i as f64),
        other => Err(invalid(key, other, "float")),
    }
}

fn value_to_bool(key: &str, value: &toml::Value) -> Result<bool, ConfigError> {
    match value {
        toml::Value::Boolean(b) => Ok(*b),
        other => Err(invalid(key, other, "boolean")),
    }
}

fn invalid(key: &str, found: &toml::Value, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected {expected}, found {}", found.type_str()),
    }
}

// ── Profile ─────────────────────────────────────────────────────────────

/// Everything the app persists, in memory form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub record: SobrietyRecord,
    pub notifications: NotificationPreferences,
}

impl Profile {
    /// Fresh profile for first use: sobriety starts now, notifications
    /// off, reminder time defaulting to the current hour and minute.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            record: SobrietyRecord::new(now),
            notifications: NotificationPreferences {
                enabled: false,
                reminder_time: truncate_to_minute(now.time()),
            },
        }
    }

    /// Load from a store, defaulting every missing key.
    ///
    /// A stored start date in the future is clamped to `now`. Values of
    /// the wrong type or out of range are logged and fall back to their
    /// defaults instead of failing the load.
    pub fn load(store: &dyn SettingsStore, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let mut profile = Self::new(now);

        if let Some(name) = tolerate(store.get_str(keys::DISPLAY_NAME))? {
            profile.record.display_name = name;
        }

        if let Some(raw) = tolerate(store.get_f64(keys::SOBRIETY_START_TIMESTAMP))? {
            match decode_timestamp(raw) {
                Some(stored) => {
                    let (start, rejected) = clamp_start(stored, now);
                    if rejected {
                        warn!("stored start date {stored} is in the future, clamping to now");
                    }
                    profile.record.started_at = start;
                }
                None => warn!("stored start timestamp {raw} is out of range, keeping now"),
            }
        }

        if let Some(enabled) = tolerate(store.get_bool(keys::NOTIFICATIONS_ENABLED))? {
            profile.notifications.enabled = enabled;
        }

        if let Some(raw) = tolerate(store.get_f64(keys::NOTIFICATION_TIME_OF_DAY))? {
            match decode_time_of_day(raw) {
                Some(time) => profile.notifications.reminder_time = time,
                None => warn!("stored reminder time {raw} is out of range, keeping the default"),
            }
        }

        Ok(profile)
    }

    /// Write every field back to the store.
    pub fn commit(&self, store: &mut dyn SettingsStore) -> Result<(), ConfigError> {
        store.set_str(keys::DISPLAY_NAME, &self.record.display_name)?;
        store.set_f64(
            keys::SOBRIETY_START_TIMESTAMP,
            encode_timestamp(self.record.started_at),
        )?;
        store.set_bool(keys::NOTIFICATIONS_ENABLED, self.notifications.enabled)?;
        store.set_f64(
            keys::NOTIFICATION_TIME_OF_DAY,
            encode_time_of_day(self.notifications.reminder_time),
        )?;
        Ok(())
    }

    /// Start over: clear the record but keep notification preferences.
    ///
    /// Removes the name and start date, then reloads, so the result is a
    /// first-use profile with the user's notification settings intact.
    pub fn reset(store: &mut dyn SettingsStore, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        store.remove(keys::DISPLAY_NAME)?;
        store.remove(keys::SOBRIETY_START_TIMESTAMP)?;
        Self::load(store, now)
    }
}

/// Downgrade a type mismatch to a missing value. Load and save failures
/// still propagate.
fn tolerate<T>(result: Result<Option<T>, ConfigError>) -> Result<Option<T>, ConfigError> {
    match result {
        Err(ConfigError::InvalidValue { key, message }) => {
            warn!("ignoring settings key '{key}': {message}");
            Ok(None)
        }
        other => other,
    }
}

fn encode_timestamp(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / 1000.0
}

fn decode_timestamp(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((value * 1000.0) as i64)
}

/// Reminder times are stored as seconds into the epoch day, which makes
/// the value an epoch timestamp whose time-of-day is the reminder time.
/// Decoding therefore accepts any epoch timestamp and keeps only the hour
/// and minute, so values written as full dates by earlier versions still
/// decode.
fn encode_time_of_day(time: NaiveTime) -> f64 {
    f64::from(time.hour() * 3600 + time.minute() * 60)
}

fn decode_time_of_day(value: f64) -> Option<NaiveTime> {
    decode_timestamp(value).map(|instant| truncate_to_minute(instant.time()))
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

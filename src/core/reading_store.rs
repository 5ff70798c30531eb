//! Reading session state, persisted per key.
//!
//! Each part of the session lives under its own storage key and is written
//! as soon as it changes. Restoring reads the keys independently, so one
//! damaged entry only costs that field its value.

use std::collections::BTreeMap;
use std::sync::Arc;

use leptos::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::storage_keys;
use crate::core::error::StorageError;
use crate::core::storage::KeyValueStore;
use crate::models::{ReadingPosition, ReadingSession, ReadingSettings, ReadingSettingsPatch};
use crate::utils::format::format_reading_time;

/// Reading session store.
pub struct ReadingStore<K: ?Sized> {
    storage: Arc<K>,
    session: RwSignal<ReadingSession>,
}

impl<K: ?Sized> Clone for ReadingStore<K> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            session: self.session,
        }
    }
}

impl<K: KeyValueStore + ?Sized> ReadingStore<K> {
    /// Store with a default session; nothing is read from storage.
    pub fn new(storage: Arc<K>) -> Self {
        Self {
            storage,
            session: RwSignal::new(ReadingSession::default()),
        }
    }

    /// Store whose session is restored from `storage`.
    pub fn restored(storage: Arc<K>) -> Self {
        let store = Self::new(storage);
        store.restore();
        store
    }

    pub fn session(&self) -> ReadSignal<ReadingSession> {
        self.session.read_only()
    }

    /// Replace the in-memory session with what storage holds.
    pub fn restore(&self) {
        let session = ReadingSession {
            is_immersive: self.restore_immersive(),
            settings: self.restore_settings(),
            last_position: self.restore_position(),
            reading_time: self.restore_reading_time(),
        };
        debug!(
            immersive = session.is_immersive,
            tracked = session.reading_time.len(),
            "reading session restored"
        );
        self.session.set(session);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_immersive(&self, flag: bool) {
        self.session.update(|s| s.is_immersive = flag);
        self.write_raw(storage_keys::IMMERSIVE, if flag { "true" } else { "false" });
    }

    pub fn toggle_immersive(&self) {
        let flag = !self.session.with_untracked(|s| s.is_immersive);
        self.set_immersive(flag);
    }

    /// Overlay the present fields of `patch` onto the settings.
    pub fn update_settings(&self, patch: ReadingSettingsPatch) {
        self.session.update(|s| s.settings.apply(patch));
        let settings = self.session.with_untracked(|s| s.settings.clone());
        self.write_json(storage_keys::SETTINGS, &settings);
    }

    pub fn save_position(&self, path: &str, scroll: f64) {
        let position = ReadingPosition {
            path: path.to_string(),
            scroll,
        };
        self.write_json(storage_keys::POSITION, &position);
        self.session.update(|s| s.last_position = Some(position));
    }

    /// Add `seconds` to the time spent on `path`.
    pub fn accumulate_reading_time(&self, path: &str, seconds: u64) {
        if seconds == 0 {
            return;
        }
        self.session.update(|s| {
            let total = s.reading_time.entry(path.to_string()).or_insert(0);
            *total = total.saturating_add(seconds);
        });
        let times = self.session.with_untracked(|s| s.reading_time.clone());
        self.write_json(storage_keys::READING_TIME, &times);
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn reading_time(&self, path: &str) -> u64 {
        self.session.with_untracked(|s| s.reading_time(path))
    }

    pub fn total_reading_time(&self) -> u64 {
        self.session.with_untracked(|s| s.total_reading_time())
    }

    /// Time spent on `path` as `45s`, `12m` or `1h 5m`.
    pub fn formatted_reading_time(&self, path: &str) -> String {
        format_reading_time(self.reading_time(path))
    }

    // =========================================================================
    // Restore helpers
    // =========================================================================

    fn restore_immersive(&self) -> bool {
        match self.storage.get(storage_keys::IMMERSIVE).as_deref() {
            Some("true") => true,
            Some("false") | None => false,
            Some(other) => {
                warn!(key = storage_keys::IMMERSIVE, value = other, "ignoring malformed entry");
                false
            }
        }
    }

    fn restore_settings(&self) -> ReadingSettings {
        let defaults = ReadingSettings::default();
        let Some(stored) = self.read_json(storage_keys::SETTINGS) else {
            return defaults;
        };
        let Value::Object(stored) = stored else {
            warn!(key = storage_keys::SETTINGS, "ignoring non-object entry");
            return defaults;
        };

        // Overlay key by key so one bad value does not discard the rest.
        let mut settings = defaults;
        for (key, value) in stored {
            let mut single = Map::new();
            single.insert(key.clone(), value);
            let candidate = match serde_json::to_value(&settings) {
                Ok(Value::Object(mut current)) => {
                    current.extend(single);
                    current
                }
                _ => continue,
            };
            match serde_json::from_value::<ReadingSettings>(Value::Object(candidate)) {
                Ok(merged) => settings = merged,
                Err(err) => {
                    warn!(key = storage_keys::SETTINGS, field = %key, error = %err, "ignoring malformed setting");
                }
            }
        }
        settings
    }

    fn restore_position(&self) -> Option<ReadingPosition> {
        let value = self.read_json(storage_keys::POSITION)?;
        match serde_json::from_value(value) {
            Ok(position) => Some(position),
            Err(err) => {
                warn!(key = storage_keys::POSITION, error = %err, "ignoring malformed entry");
                None
            }
        }
    }

    fn restore_reading_time(&self) -> BTreeMap<String, u64> {
        let Some(Value::Object(entries)) = self.read_json(storage_keys::READING_TIME) else {
            return BTreeMap::new();
        };
        entries
            .into_iter()
            .filter_map(|(path, seconds)| match seconds.as_u64() {
                Some(seconds) => Some((path, seconds)),
                None => {
                    warn!(key = storage_keys::READING_TIME, path = %path, "ignoring malformed duration");
                    None
                }
            })
            .collect()
    }

    fn read_json(&self, key: &str) -> Option<Value> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "ignoring unparsable entry");
                None
            }
        }
    }

    // =========================================================================
    // Persist helpers
    // =========================================================================

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|err| StorageError::SerializationFailed(format!("{}: {}", key, err)))
            .and_then(|raw| self.storage.set(key, &raw));
        if let Err(err) = result {
            warn!(key, error = %err, "failed to persist reading session");
        }
    }

    fn write_raw(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            warn!(key, error = %err, "failed to persist reading session");
        }
    }
}

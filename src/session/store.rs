//! Shared session store
//!
//! A get/set-by-key store modeled on the browser's extension-local storage:
//! the single source of truth for the action log and the session flags that
//! the recorder, the navigation observer, and the UI all share. Consumers
//! must re-read before mutating; the store notifies subscribers on every
//! write so out-of-process views can refresh.

use super::log::ActionLog;
use crate::codegen::ScriptType;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Well-known store keys.
pub mod keys {
    pub const RECORDING: &str = "recording";
    pub const RECORDING_STATE: &str = "recordingState";
    pub const RECORDING_TAB_ID: &str = "recordingTabId";
    pub const RECORDING_FRAME_ID: &str = "recordingFrameId";
    pub const PREFERRED_LIBRARY: &str = "preferredLibrary";
    pub const PREFERRED_BAR_POSITION: &str = "preferredBarPosition";
    pub const SESSION_ID: &str = "sessionId";
    pub const SESSION_STARTED_AT: &str = "sessionStartedAt";
}

/// Lifecycle flag of the recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    Active,
    Finished,
}

/// Docking edge of the in-page control bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    Top,
    Bottom,
}

type Listener = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// In-memory key-value store with change notification.
#[derive(Default)]
pub struct SessionStore {
    values: RwLock<HashMap<String, Value>>,
    listeners: Mutex<Vec<Listener>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("values", &*self.values.read())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a raw value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    /// Write a raw value and notify subscribers. Both locks are released
    /// before notification so listeners may read the store or write back
    /// into it.
    pub fn set(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value.clone());
        let listeners: Vec<Listener> = self.listeners.lock().clone();
        for listener in &listeners {
            listener(key, &value);
        }
    }

    /// Remove a key.
    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }

    /// Subscribe to writes. Listeners receive the key and the new value.
    pub fn subscribe(&self, listener: impl Fn(&str, &Value) + Send + Sync + 'static) {
        self.listeners.lock().push(Arc::new(listener));
    }

    // Typed helpers -------------------------------------------------------

    /// The current action log; an empty log when none has been stored.
    pub fn recording(&self) -> ActionLog {
        self.get(keys::RECORDING)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Replace the stored action log.
    pub fn set_recording(&self, log: &ActionLog) {
        // The log always serializes; a plain JSON array of tagged records.
        let value = serde_json::to_value(log).unwrap_or_else(|_| Value::Array(Vec::new()));
        self.set(keys::RECORDING, value);
    }

    /// Current session lifecycle flag.
    pub fn recording_state(&self) -> Option<RecordingState> {
        self.get(keys::RECORDING_STATE)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Check whether a tab/frame pair owns the active recording.
    pub fn is_recording_target(&self, tab_id: i64, frame_id: i64) -> bool {
        let tab = self
            .get(keys::RECORDING_TAB_ID)
            .and_then(|v| v.as_i64());
        let frame = self
            .get(keys::RECORDING_FRAME_ID)
            .and_then(|v| v.as_i64());
        tab == Some(tab_id) && frame == Some(frame_id)
    }

    /// Begin a recording session: seed the log with the initial Load action,
    /// mark the owning tab/frame, and stamp session identity.
    pub fn set_start_recording(&self, tab_id: i64, frame_id: i64, url: &str) {
        self.set_recording(&ActionLog::seeded(url));
        self.set(
            keys::RECORDING_STATE,
            serde_json::to_value(RecordingState::Active).expect("enum serializes"),
        );
        self.set(keys::RECORDING_TAB_ID, Value::from(tab_id));
        self.set(keys::RECORDING_FRAME_ID, Value::from(frame_id));
        self.set(
            keys::SESSION_ID,
            Value::String(Uuid::new_v4().to_string()),
        );
        self.set(
            keys::SESSION_STARTED_AT,
            Value::String(Utc::now().to_rfc3339()),
        );
    }

    /// End the recording session: flip the state flag and release ownership.
    /// The log itself is kept for compilation.
    pub fn set_end_recording(&self) {
        self.set(
            keys::RECORDING_STATE,
            serde_json::to_value(RecordingState::Finished).expect("enum serializes"),
        );
        self.set(keys::RECORDING_TAB_ID, Value::Null);
        self.set(keys::RECORDING_FRAME_ID, Value::Null);
    }

    /// The user's preferred target framework, when one was chosen.
    pub fn preferred_library(&self) -> Option<ScriptType> {
        self.get(keys::PREFERRED_LIBRARY)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Persist the preferred target framework.
    pub fn set_preferred_library(&self, library: ScriptType) {
        self.set(
            keys::PREFERRED_LIBRARY,
            serde_json::to_value(library).expect("enum serializes"),
        );
    }

    /// Docking edge the user chose for the control bar, when one was chosen.
    pub fn preferred_bar_position(&self) -> Option<BarPosition> {
        self.get(keys::PREFERRED_BAR_POSITION)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Persist the control bar docking edge.
    pub fn set_preferred_bar_position(&self, position: BarPosition) {
        self.set(
            keys::PREFERRED_BAR_POSITION,
            serde_json::to_value(position).expect("enum serializes"),
        );
    }

    /// Session start time, when a session has been started.
    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.get(keys::SESSION_STARTED_AT)
            .and_then(|v| v.as_str().map(str::to_string))
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::Action;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_get_set_round_trip() {
        let store = SessionStore::new();
        assert!(store.get("missing").is_none());
        store.set("k", Value::from(42));
        assert_eq!(store.get("k"), Some(Value::from(42)));
        store.remove("k");
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_start_recording_seeds_log() {
        let store = SessionStore::new();
        store.set_start_recording(7, 0, "https://x.test");

        let log = store.recording();
        assert_eq!(log.len(), 1);
        assert!(matches!(log.last(), Some(Action::Load { url }) if url == "https://x.test"));
        assert_eq!(store.recording_state(), Some(RecordingState::Active));
        assert!(store.is_recording_target(7, 0));
        assert!(!store.is_recording_target(8, 0));
        assert!(store.get(keys::SESSION_ID).is_some());
        assert!(store.session_started_at().is_some());
    }

    #[test]
    fn test_end_recording_releases_ownership() {
        let store = SessionStore::new();
        store.set_start_recording(7, 0, "https://x.test");
        store.set_end_recording();

        assert_eq!(store.recording_state(), Some(RecordingState::Finished));
        assert!(!store.is_recording_target(7, 0));
        // The captured log survives for compilation.
        assert_eq!(store.recording().len(), 1);
    }

    #[test]
    fn test_subscribers_see_writes() {
        let store = SessionStore::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        store.subscribe(move |key, _value| {
            if key == keys::RECORDING {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.set_recording(&ActionLog::seeded("https://x.test"));
        store.set("unrelated", Value::Null);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preferred_library_round_trip() {
        let store = SessionStore::new();
        assert!(store.preferred_library().is_none());
        store.set_preferred_library(ScriptType::Cypress);
        assert_eq!(store.preferred_library(), Some(ScriptType::Cypress));
    }

    #[test]
    fn test_preferred_bar_position_round_trip() {
        let store = SessionStore::new();
        assert!(store.preferred_bar_position().is_none());
        store.set_preferred_bar_position(BarPosition::Top);
        assert_eq!(store.preferred_bar_position(), Some(BarPosition::Top));
        assert_eq!(
            store.get(keys::PREFERRED_BAR_POSITION),
            Some(Value::String("top".into()))
        );
    }

    #[test]
    fn test_listener_may_write_back_into_store() {
        let store = Arc::new(SessionStore::new());
        let inner = store.clone();
        store.subscribe(move |key, _value| {
            if key == keys::PREFERRED_LIBRARY {
                inner.set_preferred_bar_position(BarPosition::Bottom);
            }
        });

        store.set_preferred_library(ScriptType::Playwright);
        assert_eq!(
            store.preferred_bar_position(),
            Some(BarPosition::Bottom)
        );
    }

    #[test]
    fn test_missing_recording_is_empty_log() {
        let store = SessionStore::new();
        assert!(store.recording().is_empty());
    }
}

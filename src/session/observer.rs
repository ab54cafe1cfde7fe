//! Navigation observer
//!
//! The privileged, page-external collaborator that watches committed and
//! SPA (history-state) navigations and appends Navigate markers to the
//! shared log. It runs out of process from the in-page recorder, which is
//! why the recorder always re-reads the log tail instead of caching it.

use super::store::{RecordingState, SessionStore};
use crate::capture::types::Action;
use std::sync::Arc;
use tracing::debug;

/// Navigation source labels stored on Navigate actions.
pub const SOURCE_COMMITTED: &str = "committed";
pub const SOURCE_HISTORY_STATE: &str = "history-state";

/// Appends Navigate records for navigations owned by the recording session.
#[derive(Debug)]
pub struct NavigationObserver {
    store: Arc<SessionStore>,
}

impl NavigationObserver {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// A cross-document navigation committed in some tab/frame.
    pub fn on_committed(&self, tab_id: i64, frame_id: i64, url: &str) {
        self.record(tab_id, frame_id, url, SOURCE_COMMITTED);
    }

    /// An SPA history-state update in some tab/frame.
    pub fn on_history_state_updated(&self, tab_id: i64, frame_id: i64, url: &str) {
        self.record(tab_id, frame_id, url, SOURCE_HISTORY_STATE);
    }

    fn record(&self, tab_id: i64, frame_id: i64, url: &str, source: &str) {
        if self.store.recording_state() != Some(RecordingState::Active) {
            return;
        }
        if !self.store.is_recording_target(tab_id, frame_id) {
            debug!(tab_id, frame_id, "navigation outside recording session ignored");
            return;
        }

        let mut log = self.store.recording();
        log.push(Action::Navigate {
            url: url.to_string(),
            source: source.to_string(),
        });
        self.store.set_recording(&log);
        debug!(url, source, "navigation appended to log");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_for_owning_tab_and_frame() {
        let store = Arc::new(SessionStore::new());
        store.set_start_recording(1, 0, "https://x.test");
        let observer = NavigationObserver::new(store.clone());

        observer.on_committed(1, 0, "https://x.test/next");

        let log = store.recording();
        assert_eq!(log.len(), 2);
        assert!(matches!(
            log.last(),
            Some(Action::Navigate { url, source })
                if url == "https://x.test/next" && source == SOURCE_COMMITTED
        ));
    }

    #[test]
    fn test_ignores_other_tabs_and_frames() {
        let store = Arc::new(SessionStore::new());
        store.set_start_recording(1, 0, "https://x.test");
        let observer = NavigationObserver::new(store.clone());

        observer.on_committed(2, 0, "https://elsewhere.test");
        observer.on_committed(1, 3, "https://subframe.test");

        assert_eq!(store.recording().len(), 1);
    }

    #[test]
    fn test_ignores_when_not_recording() {
        let store = Arc::new(SessionStore::new());
        let observer = NavigationObserver::new(store.clone());
        observer.on_committed(1, 0, "https://x.test");
        assert!(store.recording().is_empty());

        store.set_start_recording(1, 0, "https://x.test");
        store.set_end_recording();
        observer.on_history_state_updated(1, 0, "https://x.test/spa");
        assert_eq!(store.recording().len(), 1);
    }

    #[test]
    fn test_history_state_source_label() {
        let store = Arc::new(SessionStore::new());
        store.set_start_recording(1, 0, "https://x.test");
        let observer = NavigationObserver::new(store.clone());

        observer.on_history_state_updated(1, 0, "https://x.test/#route");
        assert!(matches!(
            store.recording().last(),
            Some(Action::Navigate { source, .. }) if source == SOURCE_HISTORY_STATE
        ));
    }
}

//! Action Log
//!
//! The ordered, append-biased sequence of actions for one recording session.
//! Owned by the recorder during capture (append or update-last only) and
//! read verbatim by the compiler. Serialized as a bare JSON array so logs
//! round-trip through the shared session store unchanged.

use crate::capture::types::Action;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recording session's ordered action sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log seeded with the initial Load action. Every recording
    /// starts this way; compilation relies on it for the `goto` line.
    pub fn seeded(url: &str) -> Self {
        Self {
            actions: vec![Action::Load {
                url: url.to_string(),
            }],
        }
    }

    /// Wrap an existing action sequence.
    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Append an action to the end of the log.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// The most recent action.
    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }

    /// Mutable access to the most recent action, for coalescing updates.
    pub fn last_mut(&mut self) -> Option<&mut Action> {
        self.actions.last_mut()
    }

    /// The most recent action that is not a Navigate marker.
    pub fn last_non_navigate(&self) -> Option<&Action> {
        self.actions.iter().rev().find(|a| !a.is_navigate())
    }

    /// The most recent Resize dimensions, scanning the log backward.
    pub fn last_resize(&self) -> Option<(u32, u32)> {
        self.actions.iter().rev().find_map(|a| match a {
            Action::Resize { width, height } => Some((*width, *height)),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The actions as a slice, in capture order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Consume the log, returning the owned actions.
    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    /// Check the log's structural invariant: a non-empty log starts with a
    /// Load action recording the initial URL.
    pub fn validate(&self) -> Result<()> {
        match self.actions.first() {
            None => Ok(()),
            Some(Action::Load { .. }) => Ok(()),
            Some(other) => Err(Error::Validation(format!(
                "log must start with a load action, found '{}'",
                other.kind()
            ))),
        }
    }

    /// Save the log as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a log from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let log: ActionLog = serde_json::from_str(&content)?;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::ElementTarget;
    use tempfile::NamedTempFile;

    #[test]
    fn test_seeded_log_starts_with_load() {
        let log = ActionLog::seeded("https://x.test");
        assert_eq!(log.len(), 1);
        assert!(matches!(log.last(), Some(Action::Load { url }) if url == "https://x.test"));
        log.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_non_load_head() {
        let log = ActionLog::from_actions(vec![Action::FullScreenshot]);
        assert!(log.validate().is_err());
        assert!(ActionLog::new().validate().is_ok());
    }

    #[test]
    fn test_last_non_navigate_skips_markers() {
        let mut log = ActionLog::seeded("https://x.test");
        log.push(Action::Navigate {
            url: "https://x.test/next".into(),
            source: "committed".into(),
        });
        assert!(matches!(
            log.last_non_navigate(),
            Some(Action::Load { .. })
        ));
        assert!(matches!(log.last(), Some(Action::Navigate { .. })));
    }

    #[test]
    fn test_last_resize_scans_backward() {
        let mut log = ActionLog::seeded("https://x.test");
        log.push(Action::Resize {
            width: 800,
            height: 600,
        });
        log.push(Action::Click {
            target: ElementTarget::default(),
        });
        assert_eq!(log.last_resize(), Some((800, 600)));

        let empty = ActionLog::new();
        assert!(empty.last_resize().is_none());
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let log = ActionLog::seeded("https://x.test");
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["type"], "load");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut log = ActionLog::seeded("https://x.test");
        log.push(Action::Wheel {
            delta_x: 5,
            delta_y: 10,
            page_x_offset: 0.0,
            page_y_offset: 50.0,
        });

        let file = NamedTempFile::new().unwrap();
        log.save(file.path()).unwrap();
        let loaded = ActionLog::load(file.path()).unwrap();
        assert_eq!(loaded, log);
    }

    #[test]
    fn test_load_malformed_json_errors() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(ActionLog::load(file.path()).is_err());
    }

    #[test]
    fn test_update_last_in_place() {
        let mut log = ActionLog::seeded("https://x.test");
        log.push(Action::Wheel {
            delta_x: 5,
            delta_y: 5,
            page_x_offset: 0.0,
            page_y_offset: 0.0,
        });
        if let Some(Action::Wheel { delta_x, .. }) = log.last_mut() {
            *delta_x += 3;
        }
        assert!(matches!(log.last(), Some(Action::Wheel { delta_x: 8, .. })));
        assert_eq!(log.len(), 2);
    }
}

//! Event capture
//!
//! The DOM snapshot model, normalized page events, the canonical action
//! types, and the recorder state machine that turns events into log entries.

pub mod dom;
pub mod events;
pub mod recorder;
pub mod types;

pub use dom::{Dom, NodeId};
pub use events::{should_emit_key_press, EventMeta, KeyPress, PageEvent, Platform};
pub use recorder::{Recorder, RecorderState};
pub use types::{Action, ElementTarget, SelectorBundle};

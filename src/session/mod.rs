//! Recording session state
//!
//! The action log, the shared key-value session store, and the privileged
//! navigation observer that appends to the log from outside the page.

pub mod log;
pub mod observer;
pub mod store;

pub use log::ActionLog;
pub use observer::NavigationObserver;
pub use store::{BarPosition, RecordingState, SessionStore};

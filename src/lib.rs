//! # WebScribe
//!
//! Turns a recorded sequence of web-page interactions into a portable,
//! replayable test script for Playwright, Puppeteer, or Cypress.
//!
//! ## Overview
//!
//! The recorder consumes normalized page events, condenses them into a
//! canonical, coalesced action log, and attaches a bundle of independently
//! computed candidate selectors to every captured element. The compiler
//! walks the log and emits a complete runnable script through a
//! per-framework builder.
//!
//! ## Quick Start
//!
//! ```
//! use webscribe::codegen::{compile, ScriptType};
//! use webscribe::session::ActionLog;
//!
//! let log = ActionLog::seeded("https://example.com");
//! let script = compile(log.actions(), true, ScriptType::Playwright)
//!     .expect("compilation failed");
//! assert!(script.contains("page.goto('https://example.com')"));
//! ```
//!
//! ## Architecture
//!
//! The system is organized into the following modules:
//!
//! - [`capture`]: DOM snapshots, normalized page events, and the recorder
//!   state machine
//! - [`synthesis`]: candidate selector generation and best-selector ranking
//! - [`session`]: the action log, the shared session store, and the
//!   navigation observer
//! - [`codegen`]: per-framework script builders and the log compiler
//! - [`app`]: CLI and configuration management
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐    ┌───────────┐    ┌─────────────┐    ┌────────────┐
//! │ PageEvent │───▶│ Recorder  │───▶│ Action Log  │───▶│  Compiler  │
//! │  (+ DOM)  │    │ (coalesce)│    │  (session)  │    │ (builders) │
//! └───────────┘    └───────────┘    └─────────────┘    └────────────┘
//!                        │                 ▲
//!                        ▼                 │
//!                  ┌───────────┐    ┌─────────────┐
//!                  │ Selector  │    │ Navigation  │
//!                  │ Synthesis │    │  Observer   │
//!                  └───────────┘    └─────────────┘
//! ```
//!
//! Capture and compilation are temporally decoupled: the compiler is a pure
//! function of a log snapshot and can run at any time, including mid
//! recording for live preview.

pub mod app;
pub mod capture;
pub mod codegen;
pub mod session;
pub mod synthesis;

// Re-export commonly used types
pub use capture::recorder::{Recorder, RecorderState};
pub use capture::types::{Action, ElementTarget, SelectorBundle};
pub use codegen::{compile, ScriptType};
pub use session::{ActionLog, NavigationObserver, SessionStore};

/// Result type alias for the recorder pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the recorder pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Event capture error: {0}")]
    Capture(String),

    #[error("Selector synthesis error: {0}")]
    Synthesis(String),

    #[error("Codegen error: {0}")]
    Codegen(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

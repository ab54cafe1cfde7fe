//! Script generation
//!
//! Per-framework builders and the compiler that walks an action log and
//! emits a runnable script.

pub mod builders;
pub mod compiler;

pub use builders::{
    CypressScriptBuilder, PlaywrightScriptBuilder, PuppeteerScriptBuilder, ScriptBuilder,
    ScriptType,
};
pub use compiler::{compile, describe_action, truncate_text};

//! Selector synthesis
//!
//! Candidate selector computation and best-selector ranking.

pub mod finder;
pub mod ranking;
pub mod selector;

pub use finder::{unique_selector, FinderOptions};
pub use ranking::best_selector_for_action;
pub use selector::gen_selectors;

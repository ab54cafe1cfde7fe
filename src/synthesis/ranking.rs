//! Best-selector resolution
//!
//! Given a captured action and a target framework, picks the single best
//! selector from the candidate bundle by a fixed fallback order. Attributes
//! meant for testing are the most stable across UI refactors; structural
//! selectors break on markup reshuffling and come last, just before the
//! maximally permissive any-attribute fallback.

use crate::capture::types::{is_text_container_tag, Action, ElementTarget, ANCHOR_TAG, INPUT_TAG};
use crate::codegen::ScriptType;

/// Text selectors are only worth it for short labels.
const MAX_TEXT_SELECTOR_LENGTH: usize = 25;

fn first_of<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().find_map(|c| *c)
}

/// Best selector for a pointer action (click, hover, drag-and-drop).
fn best_pointer_selector(target: &ElementTarget, library: ScriptType) -> Option<String> {
    let selectors = &target.selectors;

    if target.tag_name == INPUT_TAG {
        return first_of(&[
            selectors.test_id_selector.as_deref(),
            selectors.id.as_deref(),
            selectors.form_selector.as_deref(),
            selectors.accessibility_selector.as_deref(),
            selectors.general_selector.as_deref(),
            selectors.attr_selector.as_deref(),
        ])
        .map(str::to_string);
    }

    if target.tag_name == ANCHOR_TAG {
        return first_of(&[
            selectors.test_id_selector.as_deref(),
            selectors.id.as_deref(),
            selectors.href_selector.as_deref(),
            selectors.accessibility_selector.as_deref(),
            selectors.general_selector.as_deref(),
            selectors.attr_selector.as_deref(),
        ])
        .map(str::to_string);
    }

    // Only Playwright supports text-content selectors, and only short
    // pure-text leaves are safe targets for them.
    let text_selector = match &selectors.text {
        Some(text)
            if library == ScriptType::Playwright
                && is_text_container_tag(&target.tag_name)
                && target.has_only_text
                && !text.is_empty()
                && text.len() < MAX_TEXT_SELECTOR_LENGTH =>
        {
            Some(format!("text={text}"))
        }
        _ => None,
    };

    if is_text_container_tag(&target.tag_name) {
        return first_of(&[
            selectors.test_id_selector.as_deref(),
            selectors.id.as_deref(),
            selectors.accessibility_selector.as_deref(),
            selectors.href_selector.as_deref(),
            text_selector.as_deref(),
            selectors.general_selector.as_deref(),
            selectors.attr_selector.as_deref(),
        ])
        .map(str::to_string);
    }

    first_of(&[
        selectors.test_id_selector.as_deref(),
        selectors.id.as_deref(),
        selectors.accessibility_selector.as_deref(),
        selectors.href_selector.as_deref(),
        selectors.general_selector.as_deref(),
        selectors.attr_selector.as_deref(),
    ])
    .map(str::to_string)
}

/// Best selector for a field the user types into.
fn best_field_selector(target: &ElementTarget) -> Option<String> {
    let selectors = &target.selectors;
    first_of(&[
        selectors.test_id_selector.as_deref(),
        selectors.id.as_deref(),
        selectors.form_selector.as_deref(),
        selectors.accessibility_selector.as_deref(),
        selectors.general_selector.as_deref(),
        selectors.attr_selector.as_deref(),
    ])
    .map(str::to_string)
}

/// Resolve the best selector for an action, or `None` when the action kind
/// carries no selector.
pub fn best_selector_for_action(action: &Action, library: ScriptType) -> Option<String> {
    match action {
        Action::Click { target } | Action::Hover { target } | Action::DragAndDrop { target, .. } => {
            best_pointer_selector(target, library)
        }
        Action::Input { target, .. } | Action::Keydown { target, .. } => {
            best_field_selector(target)
        }
        _ => None,
    }
}

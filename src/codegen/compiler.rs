//! Action-log compilation
//!
//! Walks an action log and emits a complete runnable script through the
//! target framework's builder, optionally interleaved with one-line
//! human-readable descriptions of each step.

use super::builders::{ScriptBuilder, ScriptType};
use crate::capture::types::Action;
use crate::synthesis::ranking::best_selector_for_action;
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// `<input>` types whose value is entered as plain text; these get the
/// fill idiom with its enabled-state check.
pub const FILLABLE_INPUT_TYPES: &[&str] = &[
    "",
    "date",
    "datetime",
    "datetime-local",
    "email",
    "month",
    "number",
    "password",
    "search",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Max length of selector/text fragments inside step descriptions. Emitted
/// code always carries full values.
const DESCRIPTION_TEXT_LIMIT: usize = 25;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid pattern"))
}

/// Shorten text for display, appending an ellipsis when cut.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() > max_length {
        let head: String = text.chars().take(max_length).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn collapse_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").into_owned()
}

/// Kinds the compiler emits code for. Navigation markers only influence
/// waiting behavior; drag-and-drop has no portable emission yet.
fn is_supported(action: &Action) -> bool {
    matches!(
        action,
        Action::Click { .. }
            | Action::Hover { .. }
            | Action::Keydown { .. }
            | Action::Input { .. }
            | Action::Load { .. }
            | Action::Resize { .. }
            | Action::Wheel { .. }
            | Action::FullScreenshot
            | Action::AwaitText { .. }
    )
}

fn display_tag(tag_name: &str) -> String {
    if tag_name == "A" {
        "link".to_string()
    } else {
        tag_name.to_lowercase()
    }
}

/// Short label for a pointer target: its visible text when reasonably
/// short, the best selector otherwise.
fn pointer_target_summary(action: &Action, script_type: ScriptType) -> String {
    let text = action
        .target()
        .and_then(|t| t.selectors.text.as_deref())
        .unwrap_or("");
    let raw = if !text.is_empty() && text.chars().count() < 75 {
        format!("\"{text}\"")
    } else {
        best_selector_for_action(action, script_type).unwrap_or_default()
    };
    truncate_text(&collapse_whitespace(&raw), DESCRIPTION_TEXT_LIMIT)
}

fn selector_summary(action: &Action, script_type: ScriptType) -> String {
    let selector = best_selector_for_action(action, script_type).unwrap_or_default();
    truncate_text(&collapse_whitespace(&selector), DESCRIPTION_TEXT_LIMIT)
}

/// One-line human-readable description of an action, used for generated
/// comments and for listing the log. Password values are masked.
pub fn describe_action(action: &Action, script_type: ScriptType) -> String {
    match action {
        Action::Click { target } => format!(
            "Click on {} {}",
            display_tag(&target.tag_name),
            pointer_target_summary(action, script_type)
        ),
        Action::Hover { target } => format!(
            "Hover over {} {}",
            display_tag(&target.tag_name),
            pointer_target_summary(action, script_type)
        ),
        Action::Input { target, value } => {
            let shown = if target.is_password {
                "*".repeat(value.chars().count())
            } else {
                value.clone()
            };
            format!(
                "Fill \"{}\" on {}",
                collapse_whitespace(&shown),
                selector_summary(action, script_type)
            )
        }
        Action::Keydown { key, .. } => format!(
            "Press \"{key}\" on {}",
            selector_summary(action, script_type)
        ),
        Action::Load { url } => format!("Load \"{url}\""),
        Action::Navigate { url, .. } => format!("Navigate to \"{url}\""),
        Action::Resize { width, height } => format!("Resize window to {width} x {height}"),
        Action::Wheel { delta_x, delta_y, .. } => {
            format!("Scroll wheel by X:{delta_x}, Y:{delta_y}")
        }
        Action::FullScreenshot => "Take full page screenshot".to_string(),
        Action::AwaitText { text, .. } => {
            format!("Wait for text \"{}\"", collapse_whitespace(text))
        }
        Action::DragAndDrop {
            source_x,
            source_y,
            target_x,
            target_y,
            ..
        } => format!(
            "Drag n Drop from ({source_x}, {source_y}) to ({}, {})",
            target_x.unwrap_or_default(),
            target_y.unwrap_or_default()
        ),
    }
}

/// Resolve the selector an emission requires, failing compilation when the
/// bundle yields nothing. Unreachable with a populated any-attribute
/// fallback; hitting it means selector synthesis broke its contract.
fn required_selector(action: &Action, script_type: ScriptType) -> Result<String> {
    best_selector_for_action(action, script_type).ok_or_else(|| {
        Error::Codegen(format!(
            "no selector available for {} action",
            action.kind()
        ))
    })
}

fn emit(
    builder: &mut dyn ScriptBuilder,
    action: &Action,
    causes_navigation: bool,
    script_type: ScriptType,
) -> Result<()> {
    match action {
        Action::Click { .. } => {
            let selector = required_selector(action, script_type)?;
            builder.click(&selector, causes_navigation);
        }
        Action::Hover { .. } => {
            let selector = required_selector(action, script_type)?;
            builder.hover(&selector, causes_navigation);
        }
        Action::Keydown { key, .. } => {
            let selector = required_selector(action, script_type)?;
            builder.keydown(&selector, key, causes_navigation);
        }
        Action::Input { target, value } => {
            let selector = required_selector(action, script_type)?;
            if target.tag_name == "SELECT" {
                builder.select(&selector, value, causes_navigation);
            } else if (target.tag_name == "INPUT"
                && FILLABLE_INPUT_TYPES.contains(&target.input_type.as_deref().unwrap_or("")))
                || target.tag_name == "TEXTAREA"
            {
                builder.fill(&selector, value, causes_navigation);
            } else {
                builder.type_text(&selector, value, causes_navigation);
            }
        }
        Action::Load { url } => builder.load(url),
        Action::Resize { width, height } => builder.resize(*width, *height),
        Action::Wheel {
            delta_x,
            delta_y,
            page_x_offset,
            page_y_offset,
        } => builder.wheel(
            *delta_x as f64,
            *delta_y as f64,
            *page_x_offset,
            *page_y_offset,
        ),
        Action::FullScreenshot => builder.full_screenshot(),
        Action::AwaitText { text, .. } => builder.await_text(text),
        Action::Navigate { .. } | Action::DragAndDrop { .. } => {}
    }
    Ok(())
}

/// Compile an action log into a runnable script for the target framework.
///
/// Pure and re-entrant: safe to call repeatedly on a live log for preview.
/// Whether an action must wait for a page transition is decided by looking
/// at the *next raw entry* of the log (Navigate markers included), not at
/// the action itself.
pub fn compile(actions: &[Action], show_comments: bool, script_type: ScriptType) -> Result<String> {
    let mut builder = script_type.builder();
    for (index, action) in actions.iter().enumerate() {
        if !is_supported(action) {
            continue;
        }
        let causes_navigation = actions.get(index + 1).is_some_and(Action::is_navigate);
        if show_comments {
            builder.push_comments(&format!("// {}", describe_action(action, script_type)));
        }
        emit(builder.as_mut(), action, causes_navigation, script_type)?;
    }
    Ok(builder.build_script())
}

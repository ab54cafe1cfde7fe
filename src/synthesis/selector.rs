//! Candidate selector synthesis
//!
//! Computes every independently-derivable selector for a captured element.
//! Strategies never assume another strategy succeeded: each one is attempted
//! on its own and a failure just leaves that slot empty.

use super::finder::{unique_selector, FinderOptions};
use crate::capture::dom::{Dom, NodeId};
use crate::capture::types::SelectorBundle;
use tracing::debug;

/// Conventional testing attributes, in priority order.
pub const TEST_ID_ATTRIBUTES: &[&str] = &[
    "data-testid",
    "data-test-id",
    "data-testing",
    "data-test",
    "data-qa",
    "data-cy",
];

/// Accessibility attributes, in priority order.
pub const ACCESSIBILITY_ATTRIBUTES: &[&str] = &["aria-label", "alt", "title"];

/// Form-field attributes, in priority order.
pub const FORM_ATTRIBUTES: &[&str] = &["name", "placeholder", "for"];

/// Check whether the element carries any non-empty attribute from the list.
fn has_any_attribute(dom: &Dom, node: NodeId, attributes: &[&str]) -> bool {
    attributes
        .iter()
        .any(|attr| dom.attribute(node, attr).is_some_and(|v| !v.is_empty()))
}

/// Build a structural selector restricted to the given attribute list, or
/// `None` when the element has none of them or generation fails.
fn selector_for_attributes(dom: &Dom, node: NodeId, attributes: &[&str]) -> Option<String> {
    if !has_any_attribute(dom, node, attributes) {
        return None;
    }
    let filter = |name: &str, _value: &str| attributes.contains(&name);
    let options = FinderOptions {
        // Don't use the id to generate a selector
        use_id: false,
        attr_filter: Some(&filter),
    };
    match unique_selector(dom, node, &options) {
        Ok(selector) => Some(selector),
        Err(err) => {
            debug!(attributes = ?attributes, %err, "selector strategy failed");
            None
        }
    }
}

fn starts_with_digit(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Compute the full candidate bundle for one element.
///
/// Returns an empty bundle for a detached or missing element; individual
/// strategy failures degrade to `None` for that strategy only.
pub fn gen_selectors(dom: &Dom, node: NodeId) -> SelectorBundle {
    if !dom.contains(node) {
        return SelectorBundle::default();
    }

    let href = dom.attribute(node, "href").map(str::to_string);

    let general_selector = unique_selector(
        dom,
        node,
        &FinderOptions {
            use_id: true,
            attr_filter: None,
        },
    )
    .ok();

    let any_attr = |_: &str, _: &str| true;
    let attr_selector = unique_selector(
        dom,
        node,
        &FinderOptions {
            use_id: true,
            attr_filter: Some(&any_attr),
        },
    )
    .ok();

    // Ids that start with a digit are usually auto-generated and unstable.
    let id_selector = match dom.attribute(node, "id") {
        Some(id) if !id.is_empty() && !starts_with_digit(id) => {
            let id_only = |name: &str, _: &str| name == "id";
            unique_selector(
                dom,
                node,
                &FinderOptions {
                    use_id: false,
                    attr_filter: Some(&id_only),
                },
            )
            .ok()
        }
        _ => None,
    };

    SelectorBundle {
        id: id_selector,
        general_selector,
        attr_selector,
        test_id_selector: selector_for_attributes(dom, node, TEST_ID_ATTRIBUTES),
        text: Some(dom.inner_text(node)),
        // Only try to pick an href selector if there is an href on the element
        href_selector: href
            .as_ref()
            .and_then(|_| selector_for_attributes(dom, node, &["href"])),
        href,
        accessibility_selector: selector_for_attributes(dom, node, ACCESSIBILITY_ATTRIBUTES),
        form_selector: selector_for_attributes(dom, node, FORM_ATTRIBUTES),
    }
}

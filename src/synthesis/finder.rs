//! Minimal unique structural selectors
//!
//! Produces the shortest selector path that matches exactly one element of a
//! [`Dom`] snapshot. Paths are built as structured steps (tag, `#id`,
//! `[attr="value"]`, `:nth-of-type()`) and verified for uniqueness against
//! the whole document before being rendered, so a returned selector is
//! unique by construction.

use crate::capture::dom::{Dom, NodeId};
use crate::{Error, Result};

/// Attribute filter: `true` when the attribute may appear in the selector.
pub type AttrFilter<'a> = &'a dyn Fn(&str, &str) -> bool;

/// Options controlling selector generation.
#[derive(Default)]
pub struct FinderOptions<'a> {
    /// Allow `#id` steps (only for document-unique, non-empty ids).
    pub use_id: bool,
    /// Attributes eligible for `[attr="value"]` steps.
    pub attr_filter: Option<AttrFilter<'a>>,
}

/// One step of a selector path.
#[derive(Debug, Clone, PartialEq)]
struct Step {
    tag: Option<String>,
    id: Option<String>,
    attr: Option<(String, String)>,
    nth: Option<usize>,
}

impl Step {
    fn tag_only(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_lowercase()),
            id: None,
            attr: None,
            nth: None,
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push('#');
            out.push_str(id);
        } else {
            if let Some(tag) = &self.tag {
                out.push_str(tag);
            }
            if let Some((name, value)) = &self.attr {
                out.push_str(&format!("[{name}=\"{value}\"]"));
            }
        }
        if let Some(nth) = self.nth {
            out.push_str(&format!(":nth-of-type({nth})"));
        }
        out
    }

    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        if let Some(id) = &self.id {
            if dom.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if dom.tag_name(node) != tag.to_uppercase() {
                return false;
            }
        }
        if let Some((name, value)) = &self.attr {
            if dom.attribute(node, name) != Some(value.as_str()) {
                return false;
            }
        }
        if let Some(nth) = self.nth {
            if dom.nth_of_type(node) != nth {
                return false;
            }
        }
        true
    }
}

/// A selector path, leaf step last, joined with the child combinator.
#[derive(Debug, Clone, Default)]
struct Path {
    steps: Vec<Step>,
}

impl Path {
    fn render(&self) -> String {
        self.steps
            .iter()
            .map(Step::render)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Match the path against a candidate leaf node: the leaf must satisfy
    /// the last step and each preceding step must match the next ancestor.
    fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        let mut current = Some(node);
        for step in self.steps.iter().rev() {
            match current {
                Some(n) if step.matches(dom, n) => current = dom.parent(n),
                _ => return false,
            }
        }
        true
    }

    fn count_matches(&self, dom: &Dom) -> usize {
        dom.iter().filter(|&n| self.matches(dom, n)).count()
    }
}

/// Compute the shortest unique selector for `node`.
///
/// Returns an error when the element is not part of the document or no
/// unique path exists (cannot happen for a well-formed tree, since a fully
/// `:nth-of-type`-qualified root path is always unique).
pub fn unique_selector(dom: &Dom, node: NodeId, options: &FinderOptions) -> Result<String> {
    if !dom.contains(node) {
        return Err(Error::Synthesis(
            "cannot build selector for detached element".to_string(),
        ));
    }

    let mut path = Path::default();
    let mut current = Some(node);

    while let Some(n) = current {
        let step = best_local_step(dom, n, options);
        let anchored = step.id.is_some();
        path.steps.insert(0, step);

        if path.count_matches(dom) == 1 {
            return Ok(path.render());
        }
        // A document-unique id anchors the path; nothing above it can help.
        if anchored {
            break;
        }
        current = dom.parent(n);
    }

    // Structural ambiguity left; qualify steps with :nth-of-type from the
    // leaf upward until the path is unique.
    for i in (0..path.steps.len()).rev() {
        let depth = path.steps.len() - 1 - i;
        let mut target = Some(node);
        for _ in 0..depth {
            target = target.and_then(|n| dom.parent(n));
        }
        if let Some(target) = target {
            path.steps[i].nth = Some(dom.nth_of_type(target));
        }
        if path.count_matches(dom) == 1 {
            return Ok(path.render());
        }
    }

    Err(Error::Synthesis(format!(
        "no unique selector for element {:?}",
        node
    )))
}

/// Pick the strongest discriminator available at one level.
fn best_local_step(dom: &Dom, node: NodeId, options: &FinderOptions) -> Step {
    if options.use_id {
        if let Some(id) = dom.attribute(node, "id") {
            if !id.is_empty() && dom.count_with_id(id) == 1 {
                return Step {
                    tag: None,
                    id: Some(id.to_string()),
                    attr: None,
                    nth: None,
                };
            }
        }
    }

    if let Some(filter) = options.attr_filter {
        for name in dom.attribute_names(node) {
            let value = dom.attribute(node, name).unwrap_or_default();
            if !value.is_empty() && filter(name, value) {
                return Step {
                    tag: Some(dom.tag_name(node).to_lowercase()),
                    id: None,
                    attr: Some((name.to_string(), value.to_string())),
                    nth: None,
                };
            }
        }
    }

    Step::tag_only(dom.tag_name(node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_dom() -> (Dom, NodeId, NodeId, NodeId) {
        let (mut dom, root) = Dom::with_root("html");
        let body = dom.add_element(root, "body");
        let form = dom.add_element(body, "form");
        let first = dom.add_element(form, "input");
        dom.set_attribute(first, "name", "q");
        let second = dom.add_element(form, "input");
        dom.set_attribute(second, "id", "email");
        (dom, body, first, second)
    }

    #[test]
    fn test_id_step_wins_when_unique() {
        let (dom, _, _, second) = form_dom();
        let selector = unique_selector(
            &dom,
            second,
            &FinderOptions {
                use_id: true,
                attr_filter: None,
            },
        )
        .unwrap();
        assert_eq!(selector, "#email");
    }

    #[test]
    fn test_attribute_step() {
        let (dom, _, first, _) = form_dom();
        let allow_name = |name: &str, _: &str| name == "name";
        let selector = unique_selector(
            &dom,
            first,
            &FinderOptions {
                use_id: false,
                attr_filter: Some(&allow_name),
            },
        )
        .unwrap();
        assert_eq!(selector, "input[name=\"q\"]");
    }

    #[test]
    fn test_nth_of_type_disambiguation() {
        let (dom, _, first, second) = form_dom();
        // No ids, no attributes allowed: structure only.
        let options = FinderOptions::default();
        let first_selector = unique_selector(&dom, first, &options).unwrap();
        let second_selector = unique_selector(&dom, second, &options).unwrap();
        assert_ne!(first_selector, second_selector);
        assert!(first_selector.contains(":nth-of-type(1)"));
        assert!(second_selector.contains(":nth-of-type(2)"));
    }

    #[test]
    fn test_duplicate_ids_are_not_used() {
        let (mut dom, root) = Dom::with_root("html");
        let a = dom.add_element(root, "div");
        let b = dom.add_element(root, "div");
        dom.set_attribute(a, "id", "dup");
        dom.set_attribute(b, "id", "dup");

        let selector = unique_selector(
            &dom,
            a,
            &FinderOptions {
                use_id: true,
                attr_filter: None,
            },
        )
        .unwrap();
        // Certain apps reuse ids; the selector must fall back to structure.
        assert!(!selector.starts_with('#'));
    }

    #[test]
    fn test_detached_element_errors() {
        let (dom, _) = Dom::with_root("html");
        let result = unique_selector(&dom, NodeId(99), &FinderOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_unique_tag_needs_no_qualifier() {
        let (dom, body, _, _) = form_dom();
        let selector = unique_selector(&dom, body, &FinderOptions::default()).unwrap();
        assert_eq!(selector, "body");
    }

    #[test]
    fn test_selector_is_deterministic() {
        let (dom, _, first, _) = form_dom();
        let options = FinderOptions::default();
        let a = unique_selector(&dom, first, &options).unwrap();
        let b = unique_selector(&dom, first, &options).unwrap();
        assert_eq!(a, b);
    }
}

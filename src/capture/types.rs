//! Core types for event capture
//!
//! Defines the canonical action record produced by the recorder and consumed
//! by the script compiler, plus the selector bundle attached to every
//! element-targeting action.

use serde::{Deserialize, Serialize};

/// Tags whose clicks should prefer form-field selectors.
pub const INPUT_TAG: &str = "INPUT";
/// Anchor tag; clicks retarget to it and prefer href selectors.
pub const ANCHOR_TAG: &str = "A";

/// Independently-computed candidate selectors for one DOM element.
///
/// Every strategy is computed on its own and may fail without affecting the
/// others; any subset of fields may be `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorBundle {
    /// Selector built from the element's `id` attribute (excluded when the
    /// id starts with a digit, those are usually auto-generated).
    pub id: Option<String>,
    /// Minimal unique structural selector, ids allowed.
    pub general_selector: Option<String>,
    /// Broadest structural selector, allowed to use any attribute.
    pub attr_selector: Option<String>,
    /// Selector from conventional testing attributes (data-testid etc.).
    pub test_id_selector: Option<String>,
    /// The element's visible text at capture time.
    pub text: Option<String>,
    /// Raw `href` attribute value.
    pub href: Option<String>,
    /// Selector built from the `href` attribute.
    pub href_selector: Option<String>,
    /// Selector from accessibility attributes (aria-label, alt, title).
    pub accessibility_selector: Option<String>,
    /// Selector from form attributes (name, placeholder, for).
    pub form_selector: Option<String>,
}

/// Fields shared by every element-targeting action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementTarget {
    /// Uppercase tag name, e.g. `INPUT`, `A`, `DIV`.
    pub tag_name: String,
    /// `type` attribute for `<input>` elements.
    pub input_type: Option<String>,
    /// Candidate selectors computed at capture time.
    pub selectors: SelectorBundle,
    /// Event timestamp in milliseconds (host page time base).
    pub timestamp: f64,
    /// The element was a password field; descriptions must mask its value.
    pub is_password: bool,
    /// The element has no child elements and non-empty visible text.
    pub has_only_text: bool,
}

/// One canonical, typed record of a single user interaction or environment
/// event. This is the final superset shape of the log entry; fields added
/// over the format's history are defaulted on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// A trusted click on a page element.
    Click {
        #[serde(flatten)]
        target: ElementTarget,
    },
    /// A hover recorded through the privileged context-menu relay.
    Hover {
        #[serde(flatten)]
        target: ElementTarget,
    },
    /// The coalesced final value of a text-entry gesture on one field.
    Input {
        #[serde(flatten)]
        target: ElementTarget,
        value: String,
    },
    /// An action-worthy key press (Enter, Tab, modified combinations, ...).
    Keydown {
        #[serde(flatten)]
        target: ElementTarget,
        key: String,
    },
    /// Initial page load; always the first entry of a log.
    Load { url: String },
    /// Cross-document or SPA navigation, appended by the external observer.
    Navigate { url: String, source: String },
    /// Viewport resize, debounced and deduplicated.
    Resize { width: u32, height: u32 },
    /// A continuous scroll gesture; deltas accumulate while signs match.
    #[serde(rename_all = "camelCase")]
    Wheel {
        delta_x: i64,
        delta_y: i64,
        page_x_offset: f64,
        page_y_offset: f64,
    },
    /// Full-page screenshot trigger.
    FullScreenshot,
    /// Wait until the given text is present on the page.
    AwaitText {
        #[serde(flatten)]
        target: ElementTarget,
        text: String,
    },
    /// Drag gesture; target coordinates stay unset until the drop arrives.
    #[serde(rename_all = "camelCase")]
    DragAndDrop {
        #[serde(flatten)]
        target: ElementTarget,
        source_x: f64,
        source_y: f64,
        target_x: Option<f64>,
        target_y: Option<f64>,
    },
}

impl Action {
    /// The element target, for selector-bearing variants.
    pub fn target(&self) -> Option<&ElementTarget> {
        match self {
            Action::Click { target }
            | Action::Hover { target }
            | Action::Input { target, .. }
            | Action::Keydown { target, .. }
            | Action::AwaitText { target, .. }
            | Action::DragAndDrop { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Stable lowercase name of the variant, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Click { .. } => "click",
            Action::Hover { .. } => "hover",
            Action::Input { .. } => "input",
            Action::Keydown { .. } => "keydown",
            Action::Load { .. } => "load",
            Action::Navigate { .. } => "navigate",
            Action::Resize { .. } => "resize",
            Action::Wheel { .. } => "wheel",
            Action::FullScreenshot => "fullScreenshot",
            Action::AwaitText { .. } => "awaitText",
            Action::DragAndDrop { .. } => "dragAndDrop",
        }
    }

    /// Check if this is a navigation marker.
    pub fn is_navigate(&self) -> bool {
        matches!(self, Action::Navigate { .. })
    }
}

/// Check if a tag is rendered as plain inline text (span/em/cite/b/strong).
/// Short-text leaf elements of these kinds are eligible for text-content
/// selectors on frameworks that support them.
pub fn is_text_container_tag(tag_name: &str) -> bool {
    matches!(tag_name, "SPAN" | "EM" | "CITE" | "B" | "STRONG")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click_on(tag: &str) -> Action {
        Action::Click {
            target: ElementTarget {
                tag_name: tag.to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_action_kind_names() {
        assert_eq!(click_on("DIV").kind(), "click");
        assert_eq!(Action::FullScreenshot.kind(), "fullScreenshot");
        assert_eq!(
            Action::Navigate {
                url: "https://x.test".into(),
                source: "committed".into()
            }
            .kind(),
            "navigate"
        );
    }

    #[test]
    fn test_target_accessor() {
        assert!(click_on("A").target().is_some());
        assert!(Action::Load { url: "u".into() }.target().is_none());
        assert!(Action::Resize {
            width: 1,
            height: 2
        }
        .target()
        .is_none());
    }

    #[test]
    fn test_text_container_tags() {
        for tag in ["SPAN", "EM", "CITE", "B", "STRONG"] {
            assert!(is_text_container_tag(tag));
        }
        assert!(!is_text_container_tag("DIV"));
        assert!(!is_text_container_tag("A"));
    }

    #[test]
    fn test_action_tagged_serialization() {
        let action = Action::Wheel {
            delta_x: 8,
            delta_y: 7,
            page_x_offset: 0.0,
            page_y_offset: 120.0,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "wheel");
        assert_eq!(json["deltaX"], 8);
        assert_eq!(json["pageYOffset"], 120.0);

        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }

    #[test]
    fn test_element_action_flattens_base_fields() {
        let action = Action::Input {
            target: ElementTarget {
                tag_name: "INPUT".into(),
                input_type: Some("text".into()),
                is_password: false,
                ..Default::default()
            },
            value: "tacos".into(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "input");
        assert_eq!(json["tagName"], "INPUT");
        assert_eq!(json["value"], "tacos");
    }

    #[test]
    fn test_forward_compatible_deserialization() {
        // A click from an older log without hasOnlyText or isPassword
        let json = r##"{
            "type": "click",
            "tagName": "BUTTON",
            "timestamp": 123.0,
            "selectors": { "id": "#go" }
        }"##;
        let action: Action = serde_json::from_str(json).unwrap();
        let target = action.target().unwrap();
        assert_eq!(target.tag_name, "BUTTON");
        assert!(!target.has_only_text);
        assert_eq!(target.selectors.id.as_deref(), Some("#go"));
        assert!(target.selectors.general_selector.is_none());
    }
}

//! DOM snapshot arena
//!
//! The recorder and the selector synthesizer never talk to a live browser;
//! the host-page injection layer hands them a lightweight snapshot of the
//! document. Elements live in a flat arena and are addressed by `NodeId`,
//! so event payloads can reference a target without borrowing the tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of an element in a [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// One element node.
#[derive(Debug, Clone)]
pub struct Element {
    /// Uppercase tag name (`DIV`, `INPUT`, ...).
    tag_name: String,
    /// Attributes in sorted order, so strategy iteration is deterministic.
    attributes: BTreeMap<String, String>,
    /// Direct text content of this node (not including descendants).
    text: String,
    /// Current form value, for input-like elements.
    value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree snapshot.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<Element>,
}

impl Dom {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with a root element, returning the root's id.
    pub fn with_root(tag_name: &str) -> (Self, NodeId) {
        let mut dom = Self::new();
        let root = dom.push_node(tag_name, None);
        (dom, root)
    }

    fn push_node(&mut self, tag_name: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag_name: tag_name.to_uppercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            value: None,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Append a child element under `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        self.push_node(tag_name, Some(parent))
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Set the direct text content of an element.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    /// Set the current form value of an element.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.nodes[node.0].value = Some(value.to_string());
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that an id refers to an element of this document.
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    /// Uppercase tag name of an element.
    pub fn tag_name(&self, node: NodeId) -> &str {
        self.element(node).map(|e| e.tag_name.as_str()).unwrap_or("")
    }

    /// Attribute value, `None` when absent.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attributes.get(name).map(|s| s.as_str())
    }

    /// Attribute names present on an element, in sorted order.
    pub fn attribute_names(&self, node: NodeId) -> impl Iterator<Item = &str> {
        self.element(node)
            .into_iter()
            .flat_map(|e| e.attributes.keys().map(|k| k.as_str()))
    }

    /// Current form value of an element.
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.value.as_deref()
    }

    /// Parent element id.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node)?.parent
    }

    /// Child element ids.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Check if an element has child elements.
    pub fn has_children(&self, node: NodeId) -> bool {
        !self.children(node).is_empty()
    }

    /// Visible text: the element's own text followed by its descendants',
    /// in document order.
    pub fn inner_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(element) = self.element(node) {
            out.push_str(&element.text);
            for &child in &element.children {
                self.collect_text(child, out);
            }
        }
    }

    /// Ancestry test used for overlay self-exclusion: check whether the
    /// element or any of its ancestors carries the given `id` attribute.
    pub fn has_ancestor_with_id(&self, node: NodeId, id: &str) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.attribute(n, "id") == Some(id) {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// 1-based position of an element among same-tag siblings
    /// (CSS `:nth-of-type` semantics).
    pub fn nth_of_type(&self, node: NodeId) -> usize {
        let tag = self.tag_name(node).to_string();
        match self.parent(node) {
            Some(parent) => {
                let mut index = 0;
                for &sibling in self.children(parent) {
                    if self.tag_name(sibling) == tag {
                        index += 1;
                    }
                    if sibling == node {
                        return index;
                    }
                }
                1
            }
            None => 1,
        }
    }

    /// Iterate over all element ids in document order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Count elements whose `id` attribute equals the given value.
    pub fn count_with_id(&self, id: &str) -> usize {
        self.iter()
            .filter(|&n| self.attribute(n, "id") == Some(id))
            .count()
    }
}

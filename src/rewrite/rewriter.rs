//! Recursive translation of UI trees.

use serde_json::{
    Map,
    Value,
};

use super::node::{
    Element,
    Node,
};
use super::skip::SkipPolicy;

/// Attribute names whose string values are shown to users.
pub const TRANSLATABLE_ATTRIBUTES: &[&str] = &[
    "label",
    "title",
    "placeholder",
    "alt",
    "aria-label",
    "ariaLabel",
    "description",
    "helperText",
    "tooltip",
    "caption",
];

/// Walks a tree and returns a translated copy; the input is never modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewriter {
    policy: SkipPolicy,
}

impl Rewriter {
    #[must_use]
    pub const fn new(policy: SkipPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> SkipPolicy {
        self.policy
    }

    /// Rewrites `node`, passing every eligible string through `translate`.
    #[must_use]
    pub fn rewrite<F>(&self, node: &Node, translate: F) -> Node
    where
        F: Fn(&str) -> String,
    {
        self.rewrite_node(node, &translate)
    }

    /// Dispatches on the node kind.
    fn rewrite_node(&self, node: &Node, translate: &dyn Fn(&str) -> String) -> Node {
        match node {
            Node::Text(text) => Node::Text(self.rewrite_text(text, translate)),
            Node::Sequence(items) => {
                Node::Sequence(items.iter().map(|item| self.rewrite_node(item, translate)).collect())
            }
            Node::Element(element) => Node::Element(self.rewrite_element(element, translate)),
            Node::Other(value) => Node::Other(value.clone()),
        }
    }

    /// Translates unless the skip policy applies.
    fn rewrite_text(&self, text: &str, translate: &dyn Fn(&str) -> String) -> String {
        if self.policy.should_skip(text) { text.to_string() } else { translate(text) }
    }

    /// Allow-listed string attributes, then children.
    fn rewrite_element(&self, element: &Element, translate: &dyn Fn(&str) -> String) -> Element {
        let attributes: Map<String, Value> = element
            .attributes
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) if is_translatable_attribute(name) => {
                        Value::String(self.rewrite_text(text, translate))
                    }
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect();

        let children =
            element.children.as_deref().map(|child| Box::new(self.rewrite_node(child, translate)));

        Element { tag: element.tag.clone(), attributes, children, extra: element.extra.clone() }
    }
}

#[must_use]
pub fn is_translatable_attribute(name: &str) -> bool {
    TRANSLATABLE_ATTRIBUTES.contains(&name)
}

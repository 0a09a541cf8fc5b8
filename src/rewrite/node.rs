//! UI subtree representation consumed by the rewriter.

use serde_json::{
    Map,
    Value,
};

/// A node of a rendered UI tree.
///
/// The set of shapes is closed; anything the rewriter does not understand is
/// kept verbatim in [`Node::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Sequence(Vec<Node>),
    Element(Element),
    /// Null, numbers, booleans and unrecognized shapes.
    Other(Value),
}

/// An element with a tag, named attributes and optional children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    /// Attribute name → value, in source order. `children` is never a key.
    pub attributes: Map<String, Value>,
    pub children: Option<Box<Node>>,
    /// Top-level members besides `type` and `props` (React's `key`, `ref`).
    pub extra: Map<String, Value>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attributes: Map::new(), children: None, extra: Map::new() }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Node) -> Self {
        self.children = Some(Box::new(children));
        self
    }

    /// Sets a top-level member next to `type` and `props`.
    #[must_use]
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl Node {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Reads a React-element-shaped JSON value.
    ///
    /// - string → `Text`
    /// - array → `Sequence`
    /// - object with a string `"type"` → `Element`, attributes from `"props"`
    ///   and children from `"props.children"`
    /// - anything else → `Other`
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from_json).collect()),
            Value::Object(map) => match map.get("type") {
                Some(Value::String(_)) => element_from_map(map),
                _ => Self::Other(Value::Object(map)),
            },
            other => Self::Other(other),
        }
    }

    /// Inverse of [`Node::from_json`].
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Element(element) => {
                let mut props = element.attributes.clone();
                if let Some(children) = &element.children {
                    props.insert("children".to_string(), children.to_json());
                }
                let mut map = Map::new();
                map.insert("type".to_string(), Value::String(element.tag.clone()));
                map.extend(element.extra.clone());
                map.insert("props".to_string(), Value::Object(props));
                Value::Object(map)
            }
            Self::Other(value) => value.clone(),
        }
    }
}

/// Builds an element from an object known to carry a string `"type"`.
fn element_from_map(mut map: Map<String, Value>) -> Node {
    let tag = match map.remove("type") {
        Some(Value::String(tag)) => tag,
        _ => String::new(),
    };

    let mut attributes = match map.remove("props") {
        Some(Value::Object(props)) => props,
        _ => Map::new(),
    };
    let children = attributes.remove("children").map(|c| Box::new(Node::from_json(c)));

    Node::Element(Element { tag, attributes, children, extra: map })
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Vec<Self>> for Node {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn from_json_classifies_shapes() {
        expect_that!(Node::from_json(json!("Hi")), eq(&Node::text("Hi")));
        expect_that!(Node::from_json(json!(null)), eq(&Node::Other(Value::Null)));
        expect_that!(Node::from_json(json!(4)), eq(&Node::Other(json!(4))));
        expect_that!(Node::from_json(json!(true)), eq(&Node::Other(json!(true))));
        expect_that!(
            Node::from_json(json!({"key": "no type"})),
            eq(&Node::Other(json!({"key": "no type"})))
        );
        expect_that!(
            Node::from_json(json!({"type": 7, "props": {}})),
            eq(&Node::Other(json!({"type": 7, "props": {}})))
        );
    }

    #[googletest::test]
    fn from_json_reads_react_element() {
        let node = Node::from_json(json!({
            "type": "button",
            "props": {
                "title": "Buy artwork",
                "disabled": false,
                "children": ["Buy", {"type": "span", "props": {"children": "now"}}]
            }
        }));

        let expected = Element::new("button")
            .with_attribute("title", "Buy artwork")
            .with_attribute("disabled", false)
            .with_children(Node::Sequence(vec![
                Node::text("Buy"),
                Element::new("span").with_children(Node::text("now")).into(),
            ]));
        expect_that!(node, eq(&Node::Element(expected)));
    }

    #[googletest::test]
    fn top_level_members_survive_round_trip() {
        let source = json!({
            "type": "ul",
            "props": {
                "children": [
                    {"type": "li", "key": "artwork-1", "props": {"children": "Sunset"}},
                    {"type": "li", "key": "artwork-2", "ref": null, "props": {"children": "Harbour"}}
                ]
            }
        });

        let node = Node::from_json(source.clone());

        let Node::Element(list) = &node else {
            panic!("expected an element, got {node:?}");
        };
        let Some(Node::Sequence(items)) = list.children.as_deref() else {
            panic!("expected a sequence of items");
        };
        expect_that!(
            items.first(),
            some(eq(&Node::Element(
                Element::new("li")
                    .with_extra("key", "artwork-1")
                    .with_children(Node::text("Sunset"))
            )))
        );
        expect_that!(node.to_json(), eq(&source));
    }

    #[googletest::test]
    fn element_without_props_has_no_children() {
        let node = Node::from_json(json!({"type": "hr"}));

        expect_that!(node, eq(&Node::Element(Element::new("hr"))));
        expect_that!(node.to_json(), eq(&json!({"type": "hr", "props": {}})));
    }

    #[googletest::test]
    fn to_json_restores_shape() {
        let source = json!({
            "type": "figure",
            "props": {
                "className": "artwork",
                "children": [
                    {"type": "img", "props": {"alt": "Sunset", "width": 300}},
                    "Oil on canvas",
                    null
                ]
            }
        });

        expect_that!(Node::from_json(source.clone()).to_json(), eq(&source));
    }
}

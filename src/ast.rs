//! Syntax tree for Emadocs documents
//!
//! Closed set of node kinds. The parser builds the tree once; every later
//! stage only reads it.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// Root of a parsed document: the top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Page(Construct),
    Component(ComponentNode),
    Style(Construct),
    Event(EventNode),
    State(Construct),
    Api(Construct),
    Router(Construct),
    Route(RouteNode),
    Layout(Construct),
    Animation(Construct),
    Type(TypeNode),
    Hook(HookNode),
    Plugin(Construct),
    Config(Construct),
    Import(ImportNode),
    Export(ExportNode),
    Element(ElementNode),
    Text(TextNode),
    Expression(ExpressionNode),
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared shape of a keyword block: `keyword [name] [key="value"...] [{ ... }]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Construct {
    /// Empty when the block has no name.
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
    #[serde(default)]
    pub location: SourceLocation,
}

impl Construct {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    #[serde(flatten)]
    pub construct: Construct,
    pub type_params: Vec<String>,
}

/// `event <type> on <target>`. The construct name holds the event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    #[serde(flatten)]
    pub construct: Construct,
    pub target: Option<String>,
}

/// `route "<path>" => Component`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    #[serde(flatten)]
    pub construct: Construct,
    pub path: Option<String>,
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    #[serde(flatten)]
    pub construct: Construct,
    /// Raw text after `=`, tokens joined by single spaces.
    pub definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HookNode {
    #[serde(flatten)]
    pub construct: Construct,
    pub parameters: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MODULE STATEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportNode {
    /// `A`, `A as B` or `* as ns`, as written.
    pub specifiers: Vec<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub specifiers: Vec<String>,
    pub source: Option<String>,
    pub is_default: bool,
    #[serde(default)]
    pub location: SourceLocation,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MARKUP
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Node>,
    pub self_closing: bool,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub value: String,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionNode {
    pub expression: String,
    #[serde(default)]
    pub location: SourceLocation,
}

impl Node {
    /// Keyword-style name of the variant, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Page(_) => "page",
            Node::Component(_) => "component",
            Node::Style(_) => "style",
            Node::Event(_) => "event",
            Node::State(_) => "state",
            Node::Api(_) => "api",
            Node::Router(_) => "router",
            Node::Route(_) => "route",
            Node::Layout(_) => "layout",
            Node::Animation(_) => "animation",
            Node::Type(_) => "type",
            Node::Hook(_) => "hook",
            Node::Plugin(_) => "plugin",
            Node::Config(_) => "config",
            Node::Import(_) => "import",
            Node::Export(_) => "export",
            Node::Element(_) => "element",
            Node::Text(_) => "text",
            Node::Expression(_) => "expression",
        }
    }

    /// The shared construct part, for the keyword-block variants.
    pub fn construct(&self) -> Option<&Construct> {
        match self {
            Node::Page(c)
            | Node::Style(c)
            | Node::State(c)
            | Node::Api(c)
            | Node::Router(c)
            | Node::Layout(c)
            | Node::Animation(c)
            | Node::Plugin(c)
            | Node::Config(c) => Some(c),
            Node::Component(n) => Some(&n.construct),
            Node::Event(n) => Some(&n.construct),
            Node::Route(n) => Some(&n.construct),
            Node::Type(n) => Some(&n.construct),
            Node::Hook(n) => Some(&n.construct),
            Node::Import(_)
            | Node::Export(_)
            | Node::Element(_)
            | Node::Text(_)
            | Node::Expression(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            other => other.construct().map(|c| c.children.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Node::Import(n) => n.location,
            Node::Export(n) => n.location,
            Node::Element(n) => n.location,
            Node::Text(n) => n.location,
            Node::Expression(n) => n.location,
            other => other
                .construct()
                .map(|c| c.location)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_serialize_with_type_tag() {
        let node = Node::Component(ComponentNode {
            construct: Construct {
                name: "Card".into(),
                ..Default::default()
            },
            type_params: vec!["T".into()],
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "component");
        assert_eq!(json["name"], "Card");
        assert_eq!(json["typeParams"][0], "T");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn leaf_nodes_have_no_children() {
        let node = Node::Text(TextNode {
            value: "hi".into(),
            location: SourceLocation { line: 2, column: 3 },
        });
        assert!(node.children().is_empty());
        assert_eq!(node.location(), SourceLocation { line: 2, column: 3 });
        assert!(node.construct().is_none());
    }
}

use std::collections::BTreeMap;

use crate::ast::{Construct, ElementNode, ExportNode, ExpressionNode, ImportNode, Node, Program, TextNode};

/// Read-only traversal over a syntax tree.
///
/// Rules:
/// 1. Children are visited in source order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers call the matching `walk_*` function to keep descending
///    unless pruning is intended.
pub trait NodeVisitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    /// Any keyword block (page, component, style, ...).
    fn visit_construct(&mut self, _node: &Node, construct: &Construct) {
        walk_construct(self, construct);
    }

    fn visit_import(&mut self, _import: &ImportNode) {}

    fn visit_export(&mut self, _export: &ExportNode) {}

    fn visit_element(&mut self, element: &ElementNode) {
        walk_element(self, element);
    }

    fn visit_text(&mut self, _text: &TextNode) {
        // Leaf node
    }

    fn visit_expression(&mut self, _expression: &ExpressionNode) {
        // Leaf node
    }

    fn visit_children(&mut self, children: &[Node]) {
        walk_children(self, children);
    }
}

pub fn walk_program<V: NodeVisitor + ?Sized>(visitor: &mut V, program: &Program) {
    visitor.visit_children(&program.statements);
}

pub fn walk_children<V: NodeVisitor + ?Sized>(visitor: &mut V, children: &[Node]) {
    for node in children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: NodeVisitor + ?Sized>(visitor: &mut V, node: &Node) {
    match node {
        Node::Import(i) => visitor.visit_import(i),
        Node::Export(e) => visitor.visit_export(e),
        Node::Element(el) => visitor.visit_element(el),
        Node::Text(t) => visitor.visit_text(t),
        Node::Expression(e) => visitor.visit_expression(e),
        other => {
            if let Some(construct) = other.construct() {
                visitor.visit_construct(other, construct);
            }
        }
    }
}

pub fn walk_construct<V: NodeVisitor + ?Sized>(visitor: &mut V, construct: &Construct) {
    visitor.visit_children(&construct.children);
}

pub fn walk_element<V: NodeVisitor + ?Sized>(visitor: &mut V, element: &ElementNode) {
    visitor.visit_children(&element.children);
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCT STATISTICS
// ═══════════════════════════════════════════════════════════════════════════════

/// Counts every node in a program by kind, nested ones included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConstructStats {
    counts: BTreeMap<&'static str, usize>,
    /// Deepest construct nesting seen; top-level statements are depth 1.
    pub max_depth: usize,
    depth: usize,
}

impl ConstructStats {
    pub fn collect(program: &Program) -> Self {
        let mut stats = Self::default();
        stats.visit_program(program);
        stats
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn counts(&self) -> &BTreeMap<&'static str, usize> {
        &self.counts
    }
}

impl NodeVisitor for ConstructStats {
    fn visit_node(&mut self, node: &Node) {
        *self.counts.entry(node.kind_name()).or_insert(0) += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        walk_node(self, node);
        self.depth -= 1;
    }
}

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use stache_parser::Token;
use std::collections::HashMap;

/// Property key recorded for a bare `{{.}}` reference inside a section.
pub const SELF_KEY: &str = ".";

pub type NodeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A scalar or record-typed field reached by a dotted path
    Value,
    /// A field gating a conditional or repeated block
    Section,
    /// The root of one named template
    Template,
}

/// One node of the structure graph: a fact about a field (or template root)
/// being referenced somewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Property key this node contributes to its parents
    pub key: String,
}

fn join_id(prefix: &str, name: &str) -> NodeId {
    format!("{prefix}_{name}")
}

/// Shared, deduplicated graph of field accesses across a family of templates.
///
/// Node identity is `parent id + field name`, so the same dotted path reached
/// from the same context always maps to one node no matter how many templates
/// or positions reference it. Partial references become edges to the other
/// template's root node; they are followed at resolution time, never expanded
/// here. The graph is assumed acyclic; mutually-including partials are the
/// caller's contract violation, tolerated by the resolver's visit guard.
#[derive(Debug, Default, Clone)]
pub struct StructureGraph {
    nodes: IndexMap<NodeId, StructureNode>,
    edges: HashMap<NodeId, IndexSet<NodeId>>,
    templates: Vec<String>,
}

impl StructureGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template body and merge its token stream into the graph.
    ///
    /// A `Template` node for `name` may already exist as a placeholder created
    /// by an earlier `{{> name}}` reference; merging into it is the point.
    pub fn add_template(&mut self, name: &str, tokens: &[Token]) {
        self.ensure_node(StructureNode {
            id: name.to_string(),
            kind: NodeKind::Template,
            key: name.to_string(),
        });

        let root = name.to_string();
        self.merge_tokens(&root, tokens);
        self.templates.push(name.to_string());
    }

    /// Template names in the order they were registered as sources.
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t == name)
    }

    pub fn node(&self, id: &str) -> Option<&StructureNode> {
        self.nodes.get(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &StructureNode> {
        self.nodes.values()
    }

    /// Child ids of `id` in first-reference order.
    pub fn child_ids(&self, id: &str) -> Vec<NodeId> {
        self.edges
            .get(id)
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn ensure_node(&mut self, node: StructureNode) -> NodeId {
        let id = node.id.clone();
        self.nodes.entry(id.clone()).or_insert(node);
        id
    }

    fn ensure_child(&mut self, parent_id: &str, node: StructureNode) -> NodeId {
        let id = self.ensure_node(node);
        self.edges
            .entry(parent_id.to_string())
            .or_default()
            .insert(id.clone());
        id
    }

    fn ensure_value(&mut self, parent_id: &str, name: &str) -> NodeId {
        self.ensure_child(
            parent_id,
            StructureNode {
                id: join_id(parent_id, name),
                kind: NodeKind::Value,
                key: name.to_string(),
            },
        )
    }

    fn merge_tokens(&mut self, parent_id: &str, tokens: &[Token]) {
        for token in tokens {
            match token {
                Token::Text { .. } | Token::Comment { .. } | Token::Delimiters { .. } => {}
                Token::Variable { path, .. } => {
                    self.merge_value(parent_id, path);
                }
                Token::Partial { name, .. } => {
                    self.merge_partial(parent_id, name);
                }
                Token::Section { path, children, .. } => {
                    self.merge_section(parent_id, path, children);
                }
            }
        }
    }

    fn merge_value(&mut self, parent_id: &str, path: &str) {
        // A bare self-reference only means something as a section's direct
        // content; anywhere else it is inert.
        if path == SELF_KEY {
            let parent_kind = self.nodes.get(parent_id).map(|n| n.kind);
            if parent_kind == Some(NodeKind::Section) {
                self.ensure_value(parent_id, SELF_KEY);
            }
            return;
        }

        let (name, rest) = match path.split_once('.') {
            Some((name, rest)) => (name, Some(rest)),
            None => (path, None),
        };

        let node = self.ensure_value(parent_id, name);

        if let Some(rest) = rest {
            self.merge_value(&node, rest);
        }
    }

    /// Partials are recorded as an edge to the referenced template's own root
    /// node (creating a placeholder on first mention); their token stream is
    /// merged when (if ever) `add_template` is called for them.
    fn merge_partial(&mut self, parent_id: &str, name: &str) {
        self.ensure_child(
            parent_id,
            StructureNode {
                id: name.to_string(),
                kind: NodeKind::Template,
                key: name.to_string(),
            },
        );
    }

    fn merge_section(&mut self, parent_id: &str, path: &str, children: &[Token]) {
        // Sections can sit under record paths: `{{#a.b}}` is a section `b`
        // under the value node `a`.
        if let Some((name, rest)) = path.split_once('.') {
            let node = self.ensure_value(parent_id, name);
            self.merge_section(&node, rest, children);
            return;
        }

        let node = self.ensure_child(
            parent_id,
            StructureNode {
                id: join_id(parent_id, path),
                kind: NodeKind::Section,
                key: path.to_string(),
            },
        );

        self.merge_tokens(&node, children);
    }
}

use crate::error::{InferenceError, InferenceResult};
use crate::graph::{NodeId, NodeKind, StructureGraph, SELF_KEY};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One observed usage shape for a property key at a node. A key accumulates
/// several candidates when templates sharing the node use it inconsistently;
/// the serializer merges them into one union type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    /// Bare scalar use (`{{x}}`)
    Value,
    /// A section whose block referenced nothing resolvable; truthy-or-absent
    /// with no shape
    Optional,
    /// Nested-record use (`{{x.y}}`)
    Record { type_name: String },
    /// Block or list use (`{{#x}}...{{/x}}`)
    Section { type_name: String },
    /// The literal `{{.}}` self-reference inside a section
    SelfRef,
}

/// The resolved shape of one graph node: its assigned type name plus every
/// usage hint collected per property key, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub type_name: String,
    pub candidates: IndexMap<String, Vec<Candidate>>,
}

impl Resolution {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            candidates: IndexMap::new(),
        }
    }

    fn add_candidate(&mut self, key: &str, candidate: Candidate) {
        self.candidates
            .entry(key.to_string())
            .or_default()
            .push(candidate);
    }

    /// True when every hint on every key is the self-reference: the node's
    /// type is "the value itself", not a record.
    pub fn is_self_only(&self) -> bool {
        !self.candidates.is_empty()
            && self
                .candidates
                .values()
                .all(|hints| hints.iter().all(|c| matches!(c, Candidate::SelfRef)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Bottom-up type resolution over a finished [`StructureGraph`].
///
/// Resolutions are registered before their children are walked, and the visit
/// table makes "already in progress" an explicit state, so partial-inclusion
/// chains that loop back into a node still on the call stack are skipped
/// instead of re-walked.
pub struct Resolver<'graph> {
    graph: &'graph StructureGraph,
    resolutions: IndexMap<NodeId, Resolution>,
    states: HashMap<NodeId, Visit>,
    /// Template nodes currently being inlined on this recursion chain
    inlining: HashSet<NodeId>,
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Type name for a template root: upper-cased, with every run of characters
/// that would be invalid in a TypeScript identifier collapsed to `_` (template
/// names come from relative file paths).
fn namespace_for(template_name: &str) -> String {
    let mut out = String::new();
    let mut in_run = false;
    for ch in upper_first(template_name).chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

impl<'graph> Resolver<'graph> {
    pub fn new(graph: &'graph StructureGraph) -> Self {
        Self {
            graph,
            resolutions: IndexMap::new(),
            states: HashMap::new(),
            inlining: HashSet::new(),
        }
    }

    /// Resolve every template root in the graph, then verify that each one was
    /// actually supplied as a source. A partial that was referenced but never
    /// registered fails here, before any output is produced.
    pub fn resolve_all(&mut self) -> InferenceResult<()> {
        let template_ids: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|n| n.kind == NodeKind::Template)
            .map(|n| n.id.clone())
            .collect();

        for id in &template_ids {
            self.resolve_node(id, &namespace_for(id));
        }

        for id in &template_ids {
            if !self.graph.is_registered(id) {
                return Err(InferenceError::UnknownTemplate(id.clone()));
            }
        }

        Ok(())
    }

    /// Resolutions in visitation order.
    pub fn resolutions(&self) -> impl Iterator<Item = &Resolution> {
        self.resolutions.values()
    }

    pub fn resolution(&self, id: &str) -> Option<&Resolution> {
        self.resolutions.get(id)
    }

    fn resolve_node(&mut self, id: &str, namespace: &str) {
        match self.states.get(id) {
            // Still on the call stack: a partial chain looped back here; the
            // registered placeholder already stands in for this node.
            Some(Visit::InProgress) => return,
            // Memoized: finished nodes are not re-walked.
            Some(Visit::Done) => return,
            None => {}
        }
        self.states.insert(id.to_string(), Visit::InProgress);

        // Registered before recursing so that partial chains looping back into
        // this node observe the placeholder instead of recursing forever.
        self.resolutions
            .insert(id.to_string(), Resolution::new(namespace));

        self.walk_children(id, namespace, id);

        self.states.insert(id.to_string(), Visit::Done);
    }

    /// Record candidates on `into`'s resolution for every child of `of`.
    /// `into != of` exactly when a partial's fields are being inlined.
    fn walk_children(&mut self, into: &str, namespace: &str, of: &str) {
        for child_id in self.graph.child_ids(of) {
            let Some(child) = self.graph.node(&child_id) else {
                continue;
            };
            let key = child.key.clone();

            match child.kind {
                NodeKind::Section => {
                    let child_ns = format!("{namespace}{}", upper_first(&key));
                    self.resolve_node(&child_id, &child_ns);

                    match self.resolutions.get(&child_id) {
                        // A block that referenced nothing resolvable is just a
                        // presence gate: drop its type, keep an optional hint.
                        None => self.add_candidate(into, &key, Candidate::Optional),
                        Some(section) if section.candidates.is_empty() => {
                            self.resolutions.shift_remove(&child_id);
                            self.add_candidate(into, &key, Candidate::Optional);
                        }
                        Some(section) => {
                            let type_name = section.type_name.clone();
                            self.add_candidate(into, &key, Candidate::Section { type_name });
                        }
                    }
                }
                NodeKind::Value => {
                    if self.graph.child_ids(&child_id).is_empty() {
                        if key == SELF_KEY {
                            self.add_candidate(into, &key, Candidate::SelfRef);
                        } else {
                            self.add_candidate(into, &key, Candidate::Value);
                        }
                    } else {
                        let child_ns = format!("{namespace}{}", upper_first(&key));
                        self.resolve_node(&child_id, &child_ns);

                        if let Some(record) = self.resolutions.get(&child_id) {
                            let type_name = record.type_name.clone();
                            self.add_candidate(into, &key, Candidate::Record { type_name });
                        }
                    }
                }
                NodeKind::Template => {
                    // Partials are transparently inlined into whichever context
                    // includes them: their fields land on the current node
                    // under the current namespace, with no mediating type. The
                    // inlining set stops mutually-including partial chains.
                    if child_id == into || self.inlining.contains(&child_id) {
                        continue;
                    }
                    self.inlining.insert(child_id.clone());
                    self.walk_children(into, namespace, &child_id);
                    self.inlining.remove(&child_id);
                }
            }
        }
    }

    fn add_candidate(&mut self, id: &str, key: &str, candidate: Candidate) {
        if let Some(resolution) = self.resolutions.get_mut(id) {
            resolution.add_candidate(key, candidate);
        }
    }
}

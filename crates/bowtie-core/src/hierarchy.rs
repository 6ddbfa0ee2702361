//! Canonical hierarchy indexes.
//!
//! A diagram expresses threat/consequence hierarchy twice: `subThreats` /
//! `subConsequences` nesting and flat `parentId` links. Internally only one
//! representation is authoritative: a flat map keyed by id, with `parentId`
//! as the hierarchy source of truth. The nested form is flattened on build
//! and a children-by-parent view is derived on demand.

use crate::model::{Barrier, BowtieDiagram, Consequence, Threat};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Node that participates in a drill-down tree.
pub trait TreeItem: Clone {
    fn id(&self) -> &str;
    fn parent_id(&self) -> Option<&str>;
    fn level(&self) -> u32;
    fn nested_children(&self) -> &[Self];
}

impl TreeItem for Threat {
    fn id(&self) -> &str {
        &self.id
    }
    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
    fn level(&self) -> u32 {
        self.level
    }
    fn nested_children(&self) -> &[Self] {
        &self.sub_threats
    }
}

impl TreeItem for Consequence {
    fn id(&self) -> &str {
        &self.id
    }
    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
    fn level(&self) -> u32 {
        self.level
    }
    fn nested_children(&self) -> &[Self] {
        &self.sub_consequences
    }
}

/// Flat, insertion-ordered index over one side of the diagram.
#[derive(Debug, Clone)]
pub struct TreeIndex<T: TreeItem> {
    items: IndexMap<String, T>,
}

pub type ThreatIndex = TreeIndex<Threat>;
pub type ConsequenceIndex = TreeIndex<Consequence>;

impl<T: TreeItem> TreeIndex<T> {
    pub fn build(roots: &[T]) -> Self {
        let mut items = IndexMap::new();
        collect_flat(roots, &mut items);
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Derived children-by-parent view (flat `parentId` links, not nesting).
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a T> {
        self.items
            .values()
            .filter(move |item| item.parent_id() == Some(parent_id))
    }

    /// Walks `parentId` links towards a root. A node is connected iff the
    /// walk reaches an item without a parent; cycles and missing parents
    /// count as disconnected.
    pub fn is_connected_to_root(&self, id: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = self.items.get(id);
        while let Some(item) = current {
            if !visited.insert(item.id()) {
                return false;
            }
            let Some(parent) = item.parent_id() else {
                return true;
            };
            current = self.items.get(parent);
        }
        false
    }
}

fn collect_flat<T: TreeItem>(items: &[T], out: &mut IndexMap<String, T>) {
    for item in items {
        out.insert(item.id().to_string(), item.clone());
        collect_flat(item.nested_children(), out);
    }
}

/// Lookup bundle used by decoration and focus scoping.
#[derive(Debug, Clone)]
pub struct DiagramIndex {
    pub threats: ThreatIndex,
    pub consequences: ConsequenceIndex,
    pub barriers: IndexMap<String, Barrier>,
}

impl DiagramIndex {
    pub fn build(diagram: &BowtieDiagram) -> Self {
        let barriers = diagram
            .barriers
            .iter()
            .map(|barrier| (barrier.id.clone(), barrier.clone()))
            .collect();
        Self {
            threats: ThreatIndex::build(&diagram.threats),
            consequences: ConsequenceIndex::build(&diagram.consequences),
            barriers,
        }
    }

    pub fn barrier(&self, id: &str) -> Option<&Barrier> {
        self.barriers.get(id)
    }
}

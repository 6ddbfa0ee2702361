//! Minimal layered placement for left-to-right causal graphs.
//!
//! Ranks are assigned by longest path from the sources, layers advance along
//! the x axis, and nodes within a layer stack along the y axis. Compound
//! nodes carry children that are stacked inside the parent and reported in
//! absolute coordinates. This is intentionally much smaller than a general
//! layered engine: bow-tie graphs are shallow (threats, center, consequences)
//! and the interesting placement work happens in the post-processing passes.

use crate::error::{LayoutError, Result};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerConfig {
    /// Horizontal distance between adjacent layers.
    pub ranksep: f64,
    /// Vertical distance between nodes in the same layer.
    pub nodesep: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct LayerNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub children: Vec<LayerChild>,
}

#[derive(Debug, Clone)]
pub(crate) struct LayerChild {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Placement {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default)]
pub(crate) struct LayerGraph {
    nodes: Vec<LayerNode>,
    edges: Vec<(String, String)>,
}

impl LayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: LayerNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, source: &str, target: &str) {
        self.edges.push((source.to_string(), target.to_string()));
    }

    /// Runs the placement and returns absolute top-left coordinates for
    /// every node and child, keyed by id.
    pub fn run(&self, config: &LayerConfig) -> Result<FxHashMap<String, Placement>> {
        let index: FxHashMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();

        let mut in_degree = vec![0usize; self.nodes.len()];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (source, target) in &self.edges {
            let from = *index
                .get(source.as_str())
                .ok_or_else(|| LayoutError::UnknownNode { id: source.clone() })?;
            let to = *index
                .get(target.as_str())
                .ok_or_else(|| LayoutError::UnknownNode { id: target.clone() })?;
            successors[from].push(to);
            in_degree[to] += 1;
        }

        // Longest-path ranks over a topological order. Any node left
        // unprocessed sits on a cycle.
        let mut ranks = vec![0u32; self.nodes.len()];
        let mut queue: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut processed = 0usize;
        while let Some(current) = queue.pop() {
            processed += 1;
            for &next in &successors[current] {
                ranks[next] = ranks[next].max(ranks[current] + 1);
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push(next);
                }
            }
        }
        if processed < self.nodes.len() {
            let stuck = in_degree
                .iter()
                .position(|&degree| degree > 0)
                .unwrap_or(0);
            return Err(LayoutError::CyclicGraph {
                id: self.nodes[stuck].id.clone(),
            });
        }

        let rank_count = ranks.iter().copied().max().map_or(0, |r| r as usize + 1);
        let mut rank_width = vec![0f64; rank_count];
        for (i, node) in self.nodes.iter().enumerate() {
            let rank = ranks[i] as usize;
            rank_width[rank] = rank_width[rank].max(node.width);
        }
        let mut rank_x = vec![0f64; rank_count];
        let mut cursor = 0f64;
        for (rank, x) in rank_x.iter_mut().enumerate() {
            *x = cursor;
            cursor += rank_width[rank] + config.ranksep;
        }

        let mut placements = FxHashMap::default();
        let mut rank_cursor = vec![0f64; rank_count];
        for (i, node) in self.nodes.iter().enumerate() {
            let rank = ranks[i] as usize;
            let x = rank_x[rank];
            let y = rank_cursor[rank];
            rank_cursor[rank] += node.height + config.nodesep;
            placements.insert(node.id.clone(), Placement { x, y });

            // Children stack from the parent's top edge; later passes own
            // their final positions.
            let mut child_y = y;
            for child in &node.children {
                placements.insert(child.id.clone(), Placement { x, y: child_y });
                child_y += child.height + config.nodesep;
            }
        }

        Ok(placements)
    }
}

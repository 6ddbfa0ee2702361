//! Layout engine: depth filtering, layered placement, compaction.

use crate::error::{LayoutError, Result};
use crate::layered::{LayerChild, LayerConfig, LayerGraph, LayerNode};
use bowtie_core::hierarchy::TreeItem;
use bowtie_core::model::{Barrier, BarrierKind, BowtieDiagram};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sentinel view level that shows every hierarchy level.
pub const FULL_DEPTH: u32 = u32::MAX;

pub const THREAT_NODE_WIDTH: f64 = 180.0;
pub const THREAT_NODE_HEIGHT: f64 = 80.0;
pub const CONSEQUENCE_NODE_WIDTH: f64 = 180.0;
pub const CONSEQUENCE_NODE_HEIGHT: f64 = 80.0;
pub const TOP_EVENT_NODE_SIZE: f64 = 200.0;
pub const BARRIER_NODE_WIDTH: f64 = 240.0;
pub const BARRIER_NODE_HEIGHT: f64 = 120.0;

/// Gap between stacked root-level threats/consequences after compaction.
pub const PRIMARY_NODE_VERTICAL_GAP: f64 = 48.0;
/// Horizontal offset of a barrier chain from its parent node.
pub const BARRIER_HORIZONTAL_GAP: f64 = 80.0;
/// Gap between barriers stacked beside the same parent.
pub const BARRIER_VERTICAL_GAP: f64 = 32.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            horizontal: 200.0,
            vertical: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LayoutOptions {
    /// Deepest hierarchy level to include; `FULL_DEPTH` shows everything.
    pub view_level: u32,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Threat,
    Consequence,
    Barrier,
    TopEvent,
    Hazard,
}

/// A positioned node. `id` is the render-graph key (type-prefixed so ids from
/// different entity namespaces cannot collide); `domain_id` is the model id.
/// The kind is carried from construction, never parsed back out of the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub kind: NodeKind,
    pub domain_id: String,
    pub label: String,
    pub level: u32,
    /// Domain id of the hierarchy parent (threats/consequences) or of the
    /// owning threat/consequence (barriers).
    pub parent_id: Option<String>,
    pub barrier_kind: Option<BarrierKind>,
    /// Position within the owning barrier chain, in declaration order.
    pub sequence_index: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub(crate) fn threat_node_id(domain_id: &str) -> String {
    format!("threat-{domain_id}")
}

pub(crate) fn consequence_node_id(domain_id: &str) -> String {
    format!("consequence-{domain_id}")
}

pub(crate) fn top_event_node_id(domain_id: &str) -> String {
    format!("topEvent-{domain_id}")
}

pub(crate) fn barrier_node_id(kind: BarrierKind, domain_id: &str) -> String {
    match kind {
        BarrierKind::Preventive => format!("barrier-preventive-{domain_id}"),
        BarrierKind::Mitigative => format!("barrier-mitigative-{domain_id}"),
    }
}

/// Lays out a diagram: depth filter, layered pass, column compaction and
/// barrier distribution. The hazard node is not placed here; the graph
/// builder synthesizes it relative to the top event.
pub fn layout_bowtie_diagram(
    diagram: &BowtieDiagram,
    options: &LayoutOptions,
) -> Result<Vec<LayoutNode>> {
    let visible_threats = filter_by_level(&diagram.threats, options.view_level);
    let visible_consequences = filter_by_level(&diagram.consequences, options.view_level);

    let mut nodes: Vec<LayoutNode> = Vec::new();
    let mut graph = LayerGraph::new();
    let top_event_id = top_event_node_id(&diagram.top_event.id);

    for threat in &visible_threats {
        let render_id = threat_node_id(&threat.id);
        nodes.push(LayoutNode {
            id: render_id.clone(),
            kind: NodeKind::Threat,
            domain_id: threat.id.clone(),
            label: threat.label.clone(),
            level: threat.level,
            parent_id: threat.parent_id.clone(),
            barrier_kind: None,
            sequence_index: None,
            x: 0.0,
            y: 0.0,
            width: THREAT_NODE_WIDTH,
            height: THREAT_NODE_HEIGHT,
        });
        let children = push_barrier_nodes(
            &mut nodes,
            linked_barriers(diagram, BarrierKind::Preventive, &threat.id),
            BarrierKind::Preventive,
            &threat.id,
        );
        graph.add_node(LayerNode {
            id: render_id.clone(),
            width: THREAT_NODE_WIDTH,
            height: THREAT_NODE_HEIGHT,
            children,
        });
        graph.add_edge(&render_id, &top_event_id);
    }

    nodes.push(LayoutNode {
        id: top_event_id.clone(),
        kind: NodeKind::TopEvent,
        domain_id: diagram.top_event.id.clone(),
        label: diagram.top_event.label.clone(),
        level: 0,
        parent_id: None,
        barrier_kind: None,
        sequence_index: None,
        x: 0.0,
        y: 0.0,
        width: TOP_EVENT_NODE_SIZE,
        height: TOP_EVENT_NODE_SIZE,
    });
    graph.add_node(LayerNode {
        id: top_event_id.clone(),
        width: TOP_EVENT_NODE_SIZE,
        height: TOP_EVENT_NODE_SIZE,
        children: Vec::new(),
    });

    for consequence in &visible_consequences {
        let render_id = consequence_node_id(&consequence.id);
        nodes.push(LayoutNode {
            id: render_id.clone(),
            kind: NodeKind::Consequence,
            domain_id: consequence.id.clone(),
            label: consequence.label.clone(),
            level: consequence.level,
            parent_id: consequence.parent_id.clone(),
            barrier_kind: None,
            sequence_index: None,
            x: 0.0,
            y: 0.0,
            width: CONSEQUENCE_NODE_WIDTH,
            height: CONSEQUENCE_NODE_HEIGHT,
        });
        let children = push_barrier_nodes(
            &mut nodes,
            linked_barriers(diagram, BarrierKind::Mitigative, &consequence.id),
            BarrierKind::Mitigative,
            &consequence.id,
        );
        graph.add_node(LayerNode {
            id: render_id.clone(),
            width: CONSEQUENCE_NODE_WIDTH,
            height: CONSEQUENCE_NODE_HEIGHT,
            children,
        });
        graph.add_edge(&top_event_id, &render_id);
    }

    let placements = graph.run(&LayerConfig {
        ranksep: options.spacing.horizontal,
        nodesep: options.spacing.vertical,
    })?;
    for node in &mut nodes {
        let placement = placements
            .get(&node.id)
            .ok_or_else(|| LayoutError::Unplaced {
                id: node.id.clone(),
            })?;
        node.x = placement.x;
        node.y = placement.y;
    }

    compact_primary_nodes(&mut nodes);
    distribute_barriers(&mut nodes);

    tracing::debug!(
        threats = visible_threats.len(),
        consequences = visible_consequences.len(),
        nodes = nodes.len(),
        view_level = options.view_level,
        "laid out bow-tie diagram"
    );
    Ok(nodes)
}

/// Collects items visible at `view_level`: an item is included while its
/// level is within the view, and its children are only visited while the
/// item sits strictly above the view level. The visible set at level n is a
/// subset of the visible set at level n + 1.
fn filter_by_level<'a, T: TreeItem>(items: &'a [T], view_level: u32) -> Vec<&'a T> {
    let mut out = Vec::new();
    collect_visible(items, view_level, &mut out);
    out
}

fn collect_visible<'a, T: TreeItem>(items: &'a [T], view_level: u32, out: &mut Vec<&'a T>) {
    for item in items {
        if item.level() <= view_level {
            out.push(item);
            if item.level() < view_level {
                collect_visible(item.nested_children(), view_level, out);
            }
        }
    }
}

fn linked_barriers<'a>(
    diagram: &'a BowtieDiagram,
    kind: BarrierKind,
    owner_id: &str,
) -> Vec<&'a Barrier> {
    diagram
        .barriers
        .iter()
        .filter(|barrier| {
            barrier.kind == kind
                && match kind {
                    BarrierKind::Preventive => barrier.threat_id.as_deref() == Some(owner_id),
                    BarrierKind::Mitigative => barrier.consequence_id.as_deref() == Some(owner_id),
                }
        })
        .collect()
}

fn push_barrier_nodes(
    nodes: &mut Vec<LayoutNode>,
    barriers: Vec<&Barrier>,
    kind: BarrierKind,
    owner_id: &str,
) -> Vec<LayerChild> {
    barriers
        .into_iter()
        .enumerate()
        .map(|(index, barrier)| {
            let render_id = barrier_node_id(kind, &barrier.id);
            nodes.push(LayoutNode {
                id: render_id.clone(),
                kind: NodeKind::Barrier,
                domain_id: barrier.id.clone(),
                label: barrier.label.clone(),
                level: 0,
                parent_id: Some(owner_id.to_string()),
                barrier_kind: Some(kind),
                sequence_index: Some(index),
                x: 0.0,
                y: 0.0,
                width: BARRIER_NODE_WIDTH,
                height: BARRIER_NODE_HEIGHT,
            });
            LayerChild {
                id: render_id,
                width: BARRIER_NODE_WIDTH,
                height: BARRIER_NODE_HEIGHT,
            }
        })
        .collect()
}

/// Re-stacks the root-level threat and consequence columns, vertically
/// centered on the top event, preserving the layered pass's top-to-bottom
/// order.
fn compact_primary_nodes(nodes: &mut [LayoutNode]) {
    let anchor = nodes
        .iter()
        .find(|node| node.kind == NodeKind::TopEvent)
        .map(|node| node.y + node.height / 2.0);
    align_column(nodes, NodeKind::Threat, anchor);
    align_column(nodes, NodeKind::Consequence, anchor);
}

fn align_column(nodes: &mut [LayoutNode], kind: NodeKind, anchor: Option<f64>) {
    let mut column: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.kind == kind && node.parent_id.is_none())
        .map(|(i, _)| i)
        .collect();
    if column.len() <= 1 {
        return;
    }

    let total_height: f64 = column.iter().map(|&i| nodes[i].height).sum::<f64>()
        + PRIMARY_NODE_VERTICAL_GAP * (column.len() - 1) as f64;
    let anchor = anchor.unwrap_or_else(|| {
        column.iter().map(|&i| nodes[i].y).sum::<f64>() / column.len() as f64
    });

    column.sort_by(|&a, &b| {
        nodes[a]
            .y
            .partial_cmp(&nodes[b].y)
            .unwrap_or(Ordering::Equal)
    });
    let mut current_y = anchor - total_height / 2.0;
    for &i in &column {
        nodes[i].y = current_y;
        current_y += nodes[i].height + PRIMARY_NODE_VERTICAL_GAP;
    }
}

#[derive(Debug, Clone, Copy)]
struct ParentBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Stacks each barrier group beside its parent: centered on the parent's
/// vertical center, ordered by sequence index (raw y as tie-break), offset
/// left of threats and right of consequences.
fn distribute_barriers(nodes: &mut [LayoutNode]) {
    let parent_boxes: FxHashMap<String, ParentBox> = nodes
        .iter()
        .filter(|node| matches!(node.kind, NodeKind::Threat | NodeKind::Consequence))
        .map(|node| {
            (
                node.id.clone(),
                ParentBox {
                    x: node.x,
                    y: node.y,
                    width: node.width,
                    height: node.height,
                },
            )
        })
        .collect();

    let mut group_order: Vec<String> = Vec::new();
    let mut groups: FxHashMap<String, (BarrierKind, Vec<usize>)> = FxHashMap::default();
    for (i, node) in nodes.iter().enumerate() {
        if node.kind != NodeKind::Barrier {
            continue;
        }
        let (Some(kind), Some(parent)) = (node.barrier_kind, node.parent_id.as_deref()) else {
            continue;
        };
        let parent_key = match kind {
            BarrierKind::Preventive => threat_node_id(parent),
            BarrierKind::Mitigative => consequence_node_id(parent),
        };
        if !parent_boxes.contains_key(&parent_key) {
            continue;
        }
        groups
            .entry(parent_key.clone())
            .or_insert_with(|| {
                group_order.push(parent_key.clone());
                (kind, Vec::new())
            })
            .1
            .push(i);
    }

    for parent_key in group_order {
        let Some((kind, mut members)) = groups.remove(&parent_key) else {
            continue;
        };
        let parent = parent_boxes[&parent_key];
        members.sort_by(|&a, &b| {
            match (nodes[a].sequence_index, nodes[b].sequence_index) {
                (Some(seq_a), Some(seq_b)) => seq_a.cmp(&seq_b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => nodes[a]
                    .y
                    .partial_cmp(&nodes[b].y)
                    .unwrap_or(Ordering::Equal),
            }
        });

        let total_height: f64 = members.iter().map(|&i| nodes[i].height).sum::<f64>()
            + BARRIER_VERTICAL_GAP * (members.len() - 1) as f64;
        let mut current_y = parent.y + parent.height / 2.0 - total_height / 2.0;
        for &i in &members {
            nodes[i].y = current_y;
            current_y += nodes[i].height + BARRIER_VERTICAL_GAP;
            nodes[i].x = match kind {
                BarrierKind::Preventive => parent.x - BARRIER_HORIZONTAL_GAP - nodes[i].width,
                BarrierKind::Mitigative => parent.x + parent.width + BARRIER_HORIZONTAL_GAP,
            };
        }
    }
}

//! Render-graph builder: turns positioned layout nodes into decorated render
//! nodes plus causal/hierarchy edges.

use crate::layout::{LayoutNode, NodeKind, TOP_EVENT_NODE_SIZE, top_event_node_id};
use bowtie_core::hierarchy::DiagramIndex;
use bowtie_core::model::{Appearance, BarrierKind, BowtieDiagram, Effectiveness, Mechanism, Severity};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

pub const HAZARD_NODE_WIDTH: f64 = 240.0;
pub const HAZARD_NODE_HEIGHT: f64 = 150.0;
/// Gap between the hazard node and the top event below it.
pub const HAZARD_VERTICAL_GAP: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub kind: NodeKind,
    /// Model id of the entity behind this node; render ids are keys, this is
    /// what decoration and focus scoping compare against.
    pub domain_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draggable: bool,
    /// Barriers only move vertically; drags snap x back to the layout value.
    pub locked_x: bool,
    pub data: NodeData,
    pub presentation: Presentation,
}

/// Per-kind payload carried by a render node. A tagged union rather than a
/// grab-bag of optional fields: each kind names exactly the data it has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeData {
    #[serde(rename_all = "camelCase")]
    Threat {
        label: String,
        description: Option<String>,
        severity: Option<Severity>,
        severity_level: u32,
        level: u32,
        has_children: bool,
        appearance: Option<Appearance>,
    },
    #[serde(rename_all = "camelCase")]
    Consequence {
        label: String,
        description: Option<String>,
        severity: Option<Severity>,
        severity_level: u32,
        level: u32,
        has_children: bool,
        appearance: Option<Appearance>,
    },
    #[serde(rename_all = "camelCase")]
    Barrier {
        label: String,
        description: Option<String>,
        barrier_kind: BarrierKind,
        effectiveness: Option<Effectiveness>,
        related_threat_id: Option<String>,
        related_consequence_id: Option<String>,
        owner: Option<String>,
        mechanism: Option<Mechanism>,
    },
    #[serde(rename_all = "camelCase")]
    TopEvent {
        label: String,
        description: Option<String>,
        severity: Option<Severity>,
    },
    #[serde(rename_all = "camelCase")]
    Hazard {
        label: String,
        description: Option<String>,
    },
}

impl NodeData {
    pub fn label(&self) -> &str {
        match self {
            NodeData::Threat { label, .. }
            | NodeData::Consequence { label, .. }
            | NodeData::Barrier { label, .. }
            | NodeData::TopEvent { label, .. }
            | NodeData::Hazard { label, .. } => label,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NodeData::Threat { description, .. }
            | NodeData::Consequence { description, .. }
            | NodeData::Barrier { description, .. }
            | NodeData::TopEvent { description, .. }
            | NodeData::Hazard { description, .. } => description.as_deref(),
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            NodeData::Threat { severity, .. }
            | NodeData::Consequence { severity, .. }
            | NodeData::TopEvent { severity, .. } => *severity,
            NodeData::Barrier { .. } | NodeData::Hazard { .. } => None,
        }
    }
}

/// Presentation flags computed by `apply_presentation`. Replaced wholesale on
/// every filter pass, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presentation {
    pub selected: bool,
    pub highlighted: bool,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Direct threat/consequence to top-event edge that shadows a barrier
    /// chain. Hidden while a branch is focused.
    #[serde(default)]
    pub fallback: bool,
}

fn derive_severity_level(severity: Option<Severity>, fallback: u32) -> u32 {
    severity.map_or(fallback, |severity| u32::from(severity.rank()))
}

/// Builds the render graph for a set of positioned nodes. Pure and
/// deterministic; decoration misses fall back to the layout node's own label
/// and defaults rather than failing the build.
pub fn build_render_graph(layout_nodes: &[LayoutNode], diagram: &BowtieDiagram) -> RenderGraph {
    let index = DiagramIndex::build(diagram);

    let mut nodes: Vec<RenderNode> = layout_nodes
        .iter()
        .map(|layout_node| decorate_node(layout_node, diagram, &index))
        .collect();
    let mut edges = build_edges(layout_nodes, diagram, &index);

    if let Some(hazard) = &diagram.hazard {
        if let Some((node, edge)) = synthesize_hazard_node(hazard, &diagram.top_event.id, &nodes) {
            nodes.push(node);
            edges.push(edge);
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "built render graph"
    );
    RenderGraph { nodes, edges }
}

fn decorate_node(
    layout_node: &LayoutNode,
    diagram: &BowtieDiagram,
    index: &DiagramIndex,
) -> RenderNode {
    let data = match layout_node.kind {
        NodeKind::Threat => match index.threats.get(&layout_node.domain_id) {
            Some(threat) => NodeData::Threat {
                label: threat.label.clone(),
                description: threat.description.clone(),
                severity: threat.severity,
                severity_level: derive_severity_level(threat.severity, threat.level),
                level: threat.level,
                has_children: index
                    .threats
                    .children_of(&layout_node.domain_id)
                    .next()
                    .is_some(),
                appearance: threat.appearance.clone(),
            },
            None => NodeData::Threat {
                label: layout_node.label.clone(),
                description: None,
                severity: None,
                severity_level: layout_node.level,
                level: layout_node.level,
                has_children: false,
                appearance: None,
            },
        },
        NodeKind::Consequence => match index.consequences.get(&layout_node.domain_id) {
            Some(consequence) => NodeData::Consequence {
                label: consequence.label.clone(),
                description: consequence.description.clone(),
                severity: consequence.severity,
                severity_level: derive_severity_level(consequence.severity, consequence.level),
                level: consequence.level,
                has_children: index
                    .consequences
                    .children_of(&layout_node.domain_id)
                    .next()
                    .is_some(),
                appearance: consequence.appearance.clone(),
            },
            None => NodeData::Consequence {
                label: layout_node.label.clone(),
                description: None,
                severity: None,
                severity_level: layout_node.level,
                level: layout_node.level,
                has_children: false,
                appearance: None,
            },
        },
        NodeKind::Barrier => match index.barrier(&layout_node.domain_id) {
            Some(barrier) => NodeData::Barrier {
                label: barrier.label.clone(),
                description: barrier.description.clone(),
                barrier_kind: barrier.kind,
                effectiveness: barrier.effectiveness,
                related_threat_id: barrier.threat_id.clone(),
                related_consequence_id: barrier.consequence_id.clone(),
                owner: barrier.owner.clone(),
                mechanism: barrier.mechanism,
            },
            None => NodeData::Barrier {
                label: layout_node.label.clone(),
                description: None,
                barrier_kind: layout_node.barrier_kind.unwrap_or(BarrierKind::Preventive),
                effectiveness: None,
                related_threat_id: None,
                related_consequence_id: None,
                owner: None,
                mechanism: None,
            },
        },
        NodeKind::TopEvent => NodeData::TopEvent {
            label: diagram.top_event.label.clone(),
            description: diagram.top_event.description.clone(),
            severity: diagram.top_event.severity,
        },
        NodeKind::Hazard => NodeData::Hazard {
            label: layout_node.label.clone(),
            description: None,
        },
    };

    RenderNode {
        id: layout_node.id.clone(),
        kind: layout_node.kind,
        domain_id: layout_node.domain_id.clone(),
        x: layout_node.x,
        y: layout_node.y,
        width: layout_node.width,
        height: layout_node.height,
        draggable: !matches!(layout_node.kind, NodeKind::TopEvent | NodeKind::Hazard),
        locked_x: layout_node.kind == NodeKind::Barrier,
        data,
        presentation: Presentation::default(),
    }
}

struct EdgeSink {
    edges: Vec<RenderEdge>,
    seen: FxHashSet<(String, String)>,
    node_ids: FxHashSet<String>,
}

impl EdgeSink {
    /// Drops edges with an endpoint outside the visible node set and silently
    /// keeps the first occurrence of each (source, target) pair.
    fn push(&mut self, id: String, source: &str, target: &str, fallback: bool) {
        if !self.node_ids.contains(source) || !self.node_ids.contains(target) {
            return;
        }
        let key = (source.to_string(), target.to_string());
        if !self.seen.insert(key) {
            return;
        }
        self.edges.push(RenderEdge {
            id,
            source: source.to_string(),
            target: target.to_string(),
            fallback,
        });
    }
}

fn build_edges(
    layout_nodes: &[LayoutNode],
    diagram: &BowtieDiagram,
    index: &DiagramIndex,
) -> Vec<RenderEdge> {
    let top_event_id = top_event_node_id(&diagram.top_event.id);
    let mut sink = EdgeSink {
        edges: Vec::new(),
        seen: FxHashSet::default(),
        node_ids: layout_nodes.iter().map(|node| node.id.clone()).collect(),
    };

    // Barrier chains keyed by the owning threat/consequence render id,
    // ordered top to bottom.
    let mut preventive_chains: FxHashMap<String, Vec<&LayoutNode>> = FxHashMap::default();
    let mut mitigative_chains: FxHashMap<String, Vec<&LayoutNode>> = FxHashMap::default();
    for node in layout_nodes {
        if node.kind != NodeKind::Barrier {
            continue;
        }
        let Some(barrier) = index.barrier(&node.domain_id) else {
            continue;
        };
        match barrier.kind {
            BarrierKind::Preventive => {
                if let Some(threat_id) = &barrier.threat_id {
                    preventive_chains
                        .entry(crate::layout::threat_node_id(threat_id))
                        .or_default()
                        .push(node);
                }
            }
            BarrierKind::Mitigative => {
                if let Some(consequence_id) = &barrier.consequence_id {
                    mitigative_chains
                        .entry(crate::layout::consequence_node_id(consequence_id))
                        .or_default()
                        .push(node);
                }
            }
        }
    }
    for chain in preventive_chains.values_mut().chain(mitigative_chains.values_mut()) {
        chain.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));
    }

    for layout_node in layout_nodes {
        match layout_node.kind {
            NodeKind::Threat => {
                connect_through_barriers(
                    &mut sink,
                    preventive_chains.get(&layout_node.id).map(Vec::as_slice),
                    &layout_node.id,
                    &top_event_id,
                    format!("edge-{}-topEvent", layout_node.id),
                );
                if let Some(parent_id) = &layout_node.parent_id {
                    sink.push(
                        format!("edge-threat-parent-{}", layout_node.id),
                        &crate::layout::threat_node_id(parent_id),
                        &layout_node.id,
                        false,
                    );
                }
            }
            NodeKind::Consequence => {
                connect_through_barriers(
                    &mut sink,
                    mitigative_chains.get(&layout_node.id).map(Vec::as_slice),
                    &top_event_id,
                    &layout_node.id,
                    format!("edge-topEvent-{}", layout_node.id),
                );
                if let Some(parent_id) = &layout_node.parent_id {
                    sink.push(
                        format!("edge-consequence-parent-{}", layout_node.id),
                        &crate::layout::consequence_node_id(parent_id),
                        &layout_node.id,
                        false,
                    );
                }
            }
            _ => {}
        }
    }

    sink.edges
}

/// Threads start -> b1 -> ... -> bn -> end, plus a fallback-tagged direct
/// edge when a chain exists. Without barriers only the direct edge is
/// emitted, untagged.
fn connect_through_barriers(
    sink: &mut EdgeSink,
    chain: Option<&[&LayoutNode]>,
    start_id: &str,
    end_id: &str,
    fallback_edge_id: String,
) {
    let Some(chain) = chain.filter(|chain| !chain.is_empty()) else {
        sink.push(fallback_edge_id, start_id, end_id, false);
        return;
    };

    let mut previous_id = start_id;
    for barrier_node in chain {
        sink.push(
            format!("edge-{previous_id}-{}", barrier_node.id),
            previous_id,
            &barrier_node.id,
            false,
        );
        previous_id = barrier_node.id.as_str();
    }
    sink.push(
        format!("edge-{previous_id}-{end_id}"),
        previous_id,
        end_id,
        false,
    );
    sink.push(fallback_edge_id, start_id, end_id, true);
}

/// The hazard is not part of the layered pass; it hangs centered above the
/// top event. Returns `None` when the top event node is missing.
fn synthesize_hazard_node(
    hazard: &bowtie_core::model::Hazard,
    top_event_domain_id: &str,
    nodes: &[RenderNode],
) -> Option<(RenderNode, RenderEdge)> {
    let top_event = nodes
        .iter()
        .find(|node| node.id == top_event_node_id(top_event_domain_id))?;

    let top_event_width = if top_event.width > 0.0 {
        top_event.width
    } else {
        TOP_EVENT_NODE_SIZE
    };
    let hazard_id = format!("hazard-{}", hazard.id);
    let node = RenderNode {
        id: hazard_id.clone(),
        kind: NodeKind::Hazard,
        domain_id: hazard.id.clone(),
        x: top_event.x + (top_event_width - HAZARD_NODE_WIDTH) / 2.0,
        y: top_event.y - HAZARD_NODE_HEIGHT - HAZARD_VERTICAL_GAP,
        width: HAZARD_NODE_WIDTH,
        height: HAZARD_NODE_HEIGHT,
        draggable: false,
        locked_x: false,
        data: NodeData::Hazard {
            label: hazard.label.clone(),
            description: hazard.description.clone(),
        },
        presentation: Presentation::default(),
    };
    let edge = RenderEdge {
        id: format!("edge-{hazard_id}-topEvent"),
        source: hazard_id,
        target: top_event.id.clone(),
        fallback: false,
    };
    Some((node, edge))
}

/// Left-to-right order of each barrier group, keyed by render id. Captured
/// from the full layout so focus mode can keep chains in their spatial order
/// even after barriers are dragged.
pub fn compute_barrier_order(layout_nodes: &[LayoutNode]) -> FxHashMap<String, usize> {
    let mut groups: FxHashMap<String, Vec<&LayoutNode>> = FxHashMap::default();
    for node in layout_nodes {
        if node.kind != NodeKind::Barrier {
            continue;
        }
        let (Some(kind), Some(parent)) = (node.barrier_kind, node.parent_id.as_deref()) else {
            continue;
        };
        let parent_key = match kind {
            BarrierKind::Preventive => crate::layout::threat_node_id(parent),
            BarrierKind::Mitigative => crate::layout::consequence_node_id(parent),
        };
        groups.entry(parent_key).or_default().push(node);
    }

    let mut order = FxHashMap::default();
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        for (index, node) in group.iter().enumerate() {
            order.insert(node.id.clone(), index);
        }
    }
    order
}

//! Focus / interaction controller.
//!
//! Focusing a threat or consequence collapses the graph to that branch and
//! lays its barrier chain out inline between the branch node and the top
//! event. The controller owns every piece of interaction state explicitly:
//! the focused id, per-barrier drag offsets, the focused node's own drag
//! offset, the captured pre-focus anchor, and the inline positions of the
//! last layout pass (the reference frame drag deltas are measured in).

use crate::graph::{HAZARD_VERTICAL_GAP, NodeData, RenderEdge, RenderNode};
use crate::layout::NodeKind;
use rustc_hash::FxHashMap;

/// Horizontal gap between consecutive nodes of an inline chain.
pub const FOCUS_BARRIER_GAP: f64 = 48.0;
/// Maximum accumulated vertical drag offset for an inline barrier.
pub const FOCUS_VERTICAL_RANGE: f64 = 140.0;
/// Minimum vertical gap enforced between stacked inline barriers.
pub const FOCUS_VERTICAL_GAP: f64 = 16.0;

/// A node position captured at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusAnchor {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// A proposed node move, as reported by an interactive canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionChange {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default)]
pub struct FocusController {
    focused: Option<String>,
    barrier_offsets: FxHashMap<String, f64>,
    focus_node_offsets: FxHashMap<String, (f64, f64)>,
    barrier_order: FxHashMap<String, usize>,
    anchor: Option<FocusAnchor>,
    last_known: Option<FocusAnchor>,
    inline_positions: FxHashMap<String, (f64, f64)>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn anchor(&self) -> Option<&FocusAnchor> {
        self.anchor.as_ref()
    }

    pub fn barrier_offset(&self, id: &str) -> f64 {
        self.barrier_offsets.get(id).copied().unwrap_or(0.0)
    }

    pub fn focus_node_offset(&self, id: &str) -> (f64, f64) {
        self.focus_node_offsets.get(id).copied().unwrap_or((0.0, 0.0))
    }

    /// Installs the left-to-right barrier order captured from the full
    /// layout (`graph::compute_barrier_order`). Survives focus transitions.
    pub fn set_barrier_order(&mut self, order: FxHashMap<String, usize>) {
        self.barrier_order = order;
    }

    /// Focusing the already-focused node unfocuses it; only threats and
    /// consequences can gain focus. Every transition resets the session
    /// offsets and anchors in one step.
    pub fn toggle_focus(&mut self, id: &str, kind: NodeKind) {
        if self.focused.as_deref() == Some(id) {
            tracing::debug!(id, "focus cleared by toggle");
            self.reset_session();
            return;
        }
        if !matches!(kind, NodeKind::Threat | NodeKind::Consequence) {
            return;
        }
        tracing::debug!(id, "focus set");
        self.reset_session();
        self.focused = Some(id.to_string());
    }

    pub fn clear_focus(&mut self) {
        self.reset_session();
    }

    /// Self-heals after the node set changed underneath the session: a
    /// focused id that no longer resolves silently drops focus and the
    /// associated offsets.
    pub fn sync_with_nodes(&mut self, nodes: &[RenderNode]) {
        let Some(focused) = self.focused.as_deref() else {
            return;
        };
        if !nodes.iter().any(|node| node.id == focused) {
            tracing::debug!(id = focused, "focused node disappeared, clearing focus");
            self.reset_session();
        }
    }

    fn reset_session(&mut self) {
        self.focused = None;
        self.barrier_offsets.clear();
        self.focus_node_offsets.clear();
        self.anchor = None;
        self.last_known = None;
        self.inline_positions.clear();
    }

    /// Restricts the graph to the current scope. Unfocused: every node except
    /// barriers. Focused: hazard, top event, the focused node and the
    /// barriers linked to it; fallback edges are excluded while focused.
    pub fn scope_graph(
        &self,
        nodes: &[RenderNode],
        edges: &[RenderEdge],
    ) -> (Vec<RenderNode>, Vec<RenderEdge>) {
        let focus_node = self
            .focused
            .as_deref()
            .and_then(|focused| nodes.iter().find(|node| node.id == focused));

        let Some(focus_node) = focus_node else {
            let scoped_nodes: Vec<RenderNode> = nodes
                .iter()
                .filter(|node| node.kind != NodeKind::Barrier)
                .cloned()
                .collect();
            let scoped_edges = restrict_edges(&scoped_nodes, edges, false);
            return (scoped_nodes, scoped_edges);
        };

        let focus_is_threat = focus_node.kind == NodeKind::Threat;
        let focus_key = focus_node.domain_id.as_str();
        let scoped_nodes: Vec<RenderNode> = nodes
            .iter()
            .filter(|node| match node.kind {
                NodeKind::Hazard | NodeKind::TopEvent => true,
                NodeKind::Barrier => match &node.data {
                    NodeData::Barrier {
                        related_threat_id,
                        related_consequence_id,
                        ..
                    } => {
                        if focus_is_threat {
                            related_threat_id.as_deref() == Some(focus_key)
                        } else {
                            related_consequence_id.as_deref() == Some(focus_key)
                        }
                    }
                    _ => false,
                },
                NodeKind::Threat | NodeKind::Consequence => node.id == focus_node.id,
            })
            .cloned()
            .collect();
        let scoped_edges = restrict_edges(&scoped_nodes, edges, true);
        (scoped_nodes, scoped_edges)
    }

    /// Lays the scoped node set out inline. Recompute after any change to
    /// focus, node set or offsets; the resulting positions become the
    /// reference frame for subsequent drag deltas.
    pub fn apply_focus_layout(&mut self, nodes: Vec<RenderNode>) -> Vec<RenderNode> {
        let mut nodes = nodes;
        let Some(focused) = self.focused.clone() else {
            self.inline_positions.clear();
            return nodes;
        };
        let Some(focus_i) = nodes.iter().position(|node| node.id == focused) else {
            self.inline_positions.clear();
            return nodes;
        };
        let Some(top_i) = nodes.iter().position(|node| node.kind == NodeKind::TopEvent) else {
            self.inline_positions.clear();
            return nodes;
        };
        let barrier_indices: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.kind == NodeKind::Barrier)
            .map(|(i, _)| i)
            .collect();
        if barrier_indices.is_empty() {
            self.inline_positions.clear();
            self.update_anchors(&focused, &nodes, focus_i);
            return nodes;
        }

        let top_event_base = (nodes[top_i].x, nodes[top_i].y);
        let is_threat_focus = nodes[focus_i].kind == NodeKind::Threat;
        let (start_i, end_i) = if is_threat_focus {
            (focus_i, top_i)
        } else {
            (top_i, focus_i)
        };

        // Manual offset of the focused node applies to whichever anchor it
        // is: the chain start for threats, the chain end for consequences.
        let focus_offset = self
            .focus_node_offsets
            .get(&focused)
            .copied()
            .unwrap_or((0.0, 0.0));
        if is_threat_focus {
            nodes[start_i].x += focus_offset.0;
            nodes[start_i].y += focus_offset.1;
        }

        let start_width = nodes[start_i].width;
        let start_height = nodes[start_i].height;
        let baseline_y = nodes[start_i].y + start_height / 2.0;

        let mut sorted = barrier_indices;
        sorted.sort_by(|&a, &b| {
            match (
                self.barrier_order.get(&nodes[a].id),
                self.barrier_order.get(&nodes[b].id),
            ) {
                (Some(order_a), Some(order_b)) => order_a.cmp(order_b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => nodes[a]
                    .x
                    .partial_cmp(&nodes[b].x)
                    .unwrap_or(std::cmp::Ordering::Equal),
            }
        });

        let mut previous_end_x = nodes[start_i].x + start_width;
        let mut previous_bottom = nodes[start_i].y - start_height / 2.0;
        self.inline_positions.clear();

        for &i in &sorted {
            let height = nodes[i].height;
            let offset_y = self
                .barrier_offsets
                .get(&nodes[i].id)
                .copied()
                .unwrap_or(0.0)
                .clamp(-FOCUS_VERTICAL_RANGE, FOCUS_VERTICAL_RANGE);

            nodes[i].x = previous_end_x + FOCUS_BARRIER_GAP;

            let centered_top = baseline_y - height / 2.0;
            let mut proposed_top = (centered_top + offset_y).clamp(
                centered_top - FOCUS_VERTICAL_RANGE,
                centered_top + FOCUS_VERTICAL_RANGE,
            );
            let min_stack_top = previous_bottom + FOCUS_VERTICAL_GAP;
            if proposed_top < min_stack_top {
                proposed_top = min_stack_top;
            }
            nodes[i].y = proposed_top;

            self.inline_positions
                .insert(nodes[i].id.clone(), (nodes[i].x, nodes[i].y));
            previous_end_x = nodes[i].x + nodes[i].width;
            previous_bottom = nodes[i].y + height;
        }

        let end_offset = if is_threat_focus { (0.0, 0.0) } else { focus_offset };
        let end_height = nodes[end_i].height;
        nodes[end_i].y = baseline_y - end_height / 2.0 + end_offset.1;
        let desired_end_x = nodes[end_i].x + end_offset.0;
        let required_end_x = previous_end_x + FOCUS_BARRIER_GAP;
        nodes[end_i].x = desired_end_x.max(required_end_x);

        // The hazard hangs off the top event wherever it ends up.
        if let Some(hazard_i) = nodes.iter().position(|node| node.kind == NodeKind::Hazard) {
            let top_width = nodes[top_i].width;
            let (top_x, top_y) = (nodes[top_i].x, nodes[top_i].y);
            nodes[hazard_i].x = top_x + (top_width - nodes[hazard_i].width) / 2.0;
            nodes[hazard_i].y = top_y - nodes[hazard_i].height - HAZARD_VERTICAL_GAP;
        }

        // Translate the whole set so the top event appears stationary.
        let shift_x = top_event_base.0 - nodes[top_i].x;
        let shift_y = top_event_base.1 - nodes[top_i].y;
        if shift_x != 0.0 || shift_y != 0.0 {
            for node in &mut nodes {
                node.x += shift_x;
                node.y += shift_y;
            }
            for position in self.inline_positions.values_mut() {
                position.0 += shift_x;
                position.1 += shift_y;
            }
        }

        self.update_anchors(&focused, &nodes, focus_i);
        nodes
    }

    fn update_anchors(&mut self, focused: &str, nodes: &[RenderNode], focus_i: usize) {
        let node = &nodes[focus_i];
        if self.anchor.as_ref().is_none_or(|anchor| anchor.id != focused) {
            self.anchor = Some(FocusAnchor {
                id: focused.to_string(),
                x: node.x,
                y: node.y,
            });
        }
        self.last_known = Some(FocusAnchor {
            id: focused.to_string(),
            x: node.x,
            y: node.y,
        });
    }

    /// Applies the drag policy to a batch of proposed moves: barrier x snaps
    /// back to the node's current x, and the focused threat/consequence may
    /// not move right of its captured anchor. Other nodes move freely.
    pub fn constrain_changes(
        &self,
        changes: &[PositionChange],
        nodes: &[RenderNode],
    ) -> Vec<PositionChange> {
        let by_id: FxHashMap<&str, &RenderNode> =
            nodes.iter().map(|node| (node.id.as_str(), node)).collect();

        changes
            .iter()
            .cloned()
            .map(|mut change| {
                let Some(node) = by_id.get(change.id.as_str()) else {
                    return change;
                };
                if node.kind == NodeKind::Barrier {
                    change.x = node.x;
                }
                let anchored = self.focused.as_deref() == Some(node.id.as_str())
                    && matches!(node.kind, NodeKind::Threat | NodeKind::Consequence)
                    && self
                        .anchor
                        .as_ref()
                        .is_some_and(|anchor| anchor.id == node.id);
                if anchored {
                    let anchor_x = self.anchor.as_ref().map_or(change.x, |anchor| anchor.x);
                    if change.x > anchor_x {
                        change.x = anchor_x;
                    }
                }
                change
            })
            .collect()
    }

    /// Constrains and applies a batch of moves, accumulating session offsets.
    /// Barrier deltas are measured against the inline positions of the last
    /// `apply_focus_layout` pass and clamp to the vertical range; the focused
    /// node's delta accumulates into its manual offset. Re-run the focus
    /// layout afterwards to refresh the reference frame.
    pub fn apply_changes(&mut self, changes: &[PositionChange], nodes: &mut [RenderNode]) {
        let constrained = self.constrain_changes(changes, nodes);
        for change in &constrained {
            if let Some(node) = nodes.iter_mut().find(|node| node.id == change.id) {
                node.x = change.x;
                node.y = change.y;
            }
        }

        let Some(focused) = self.focused.clone() else {
            return;
        };

        for change in &constrained {
            let Some(node) = nodes.iter().find(|node| node.id == change.id) else {
                continue;
            };
            if node.kind != NodeKind::Barrier {
                continue;
            }
            let Some(&(_, inline_y)) = self.inline_positions.get(&node.id) else {
                continue;
            };
            let delta_y = node.y - inline_y;
            let offset = self.barrier_offsets.entry(node.id.clone()).or_insert(0.0);
            *offset = (*offset + delta_y).clamp(-FOCUS_VERTICAL_RANGE, FOCUS_VERTICAL_RANGE);
        }

        let last_known = match &self.last_known {
            Some(last) if last.id == focused => last.clone(),
            _ => return,
        };
        if let Some(node) = nodes.iter().find(|node| node.id == focused) {
            let delta_x = node.x - last_known.x;
            let delta_y = node.y - last_known.y;
            if delta_x != 0.0 || delta_y != 0.0 {
                let offset = self
                    .focus_node_offsets
                    .entry(focused)
                    .or_insert((0.0, 0.0));
                offset.0 += delta_x;
                offset.1 += delta_y;
            }
        }
    }
}

fn restrict_edges(
    scoped_nodes: &[RenderNode],
    edges: &[RenderEdge],
    drop_fallback: bool,
) -> Vec<RenderEdge> {
    let allowed: rustc_hash::FxHashSet<&str> =
        scoped_nodes.iter().map(|node| node.id.as_str()).collect();
    edges
        .iter()
        .filter(|edge| {
            allowed.contains(edge.source.as_str())
                && allowed.contains(edge.target.as_str())
                && !(drop_fallback && edge.fallback)
        })
        .cloned()
        .collect()
}

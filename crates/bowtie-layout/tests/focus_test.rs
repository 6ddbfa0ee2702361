use bowtie_core::model::{
    Barrier, BarrierKind, BowtieDiagram, Consequence, Hazard, Severity, Threat, TopEvent,
};
use bowtie_layout::focus::{
    FOCUS_BARRIER_GAP, FOCUS_VERTICAL_GAP, FOCUS_VERTICAL_RANGE, FocusController, PositionChange,
};
use bowtie_layout::graph::{RenderGraph, RenderNode, build_render_graph, compute_barrier_order};
use bowtie_layout::layout::{LayoutOptions, NodeKind, layout_bowtie_diagram};

fn fixture_diagram() -> BowtieDiagram {
    let barrier = |id: &str, kind: BarrierKind, threat: Option<&str>, cons: Option<&str>| Barrier {
        id: id.to_string(),
        label: format!("Barrier {id}"),
        description: None,
        kind,
        effectiveness: None,
        threat_id: threat.map(str::to_string),
        consequence_id: cons.map(str::to_string),
        owner: None,
        mechanism: None,
    };
    BowtieDiagram {
        id: "diagram".to_string(),
        name: "Test".to_string(),
        hazard: Some(Hazard {
            id: "hz".to_string(),
            label: "Hazard".to_string(),
            description: None,
        }),
        top_event: TopEvent {
            id: "top".to_string(),
            label: "Top event".to_string(),
            description: None,
            severity: Some(Severity::High),
        },
        threats: vec![
            Threat {
                id: "t1".to_string(),
                label: "Threat t1".to_string(),
                description: None,
                level: 0,
                parent_id: None,
                severity: None,
                appearance: None,
                sub_threats: Vec::new(),
            },
            Threat {
                id: "t2".to_string(),
                label: "Threat t2".to_string(),
                description: None,
                level: 0,
                parent_id: None,
                severity: None,
                appearance: None,
                sub_threats: Vec::new(),
            },
        ],
        consequences: vec![Consequence {
            id: "c1".to_string(),
            label: "Consequence c1".to_string(),
            description: None,
            level: 0,
            parent_id: None,
            severity: None,
            appearance: None,
            sub_consequences: Vec::new(),
        }],
        barriers: vec![
            barrier("b1", BarrierKind::Preventive, Some("t1"), None),
            barrier("b2", BarrierKind::Preventive, Some("t1"), None),
            barrier("m1", BarrierKind::Mitigative, None, Some("c1")),
        ],
    }
}

fn build_graph() -> (RenderGraph, FocusController) {
    let diagram = fixture_diagram();
    let layout_nodes = layout_bowtie_diagram(&diagram, &LayoutOptions::default()).unwrap();
    let graph = build_render_graph(&layout_nodes, &diagram);
    let mut controller = FocusController::new();
    controller.set_barrier_order(compute_barrier_order(&layout_nodes));
    (graph, controller)
}

fn find<'a>(nodes: &'a [RenderNode], id: &str) -> &'a RenderNode {
    nodes
        .iter()
        .find(|node| node.id == id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

#[test]
fn unfocused_scope_hides_barriers_but_keeps_fallback_edges() {
    let (graph, controller) = build_graph();
    let (nodes, edges) = controller.scope_graph(&graph.nodes, &graph.edges);

    assert!(nodes.iter().all(|node| node.kind != NodeKind::Barrier));
    assert!(
        edges
            .iter()
            .any(|edge| edge.source == "threat-t1" && edge.target == "topEvent-top")
    );
    assert!(
        edges
            .iter()
            .all(|edge| !edge.source.starts_with("barrier-") && !edge.target.starts_with("barrier-"))
    );
}

#[test]
fn only_threats_and_consequences_take_focus() {
    let (_, mut controller) = build_graph();
    controller.toggle_focus("topEvent-top", NodeKind::TopEvent);
    assert_eq!(controller.focused(), None);
    controller.toggle_focus("barrier-preventive-b1", NodeKind::Barrier);
    assert_eq!(controller.focused(), None);

    controller.toggle_focus("threat-t1", NodeKind::Threat);
    assert_eq!(controller.focused(), Some("threat-t1"));
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    assert_eq!(controller.focused(), None);
}

#[test]
fn focused_scope_keeps_only_the_branch_and_drops_fallbacks() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, edges) = controller.scope_graph(&graph.nodes, &graph.edges);

    let ids: Vec<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    assert!(ids.contains(&"threat-t1"));
    assert!(ids.contains(&"topEvent-top"));
    assert!(ids.contains(&"hazard-hz"));
    assert!(ids.contains(&"barrier-preventive-b1"));
    assert!(ids.contains(&"barrier-preventive-b2"));
    assert!(!ids.contains(&"threat-t2"));
    assert!(!ids.contains(&"consequence-c1"));
    assert!(!ids.contains(&"barrier-mitigative-m1"));

    assert!(edges.iter().all(|edge| !edge.fallback));
}

#[test]
fn focus_layout_chains_barriers_left_to_right_with_a_stationary_top_event() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    let top_event_before = find(&nodes, "topEvent-top").clone();

    let laid_out = controller.apply_focus_layout(nodes);

    let threat = find(&laid_out, "threat-t1");
    let b1 = find(&laid_out, "barrier-preventive-b1");
    let b2 = find(&laid_out, "barrier-preventive-b2");
    let top_event = find(&laid_out, "topEvent-top");
    let hazard = find(&laid_out, "hazard-hz");

    assert_eq!(top_event.x, top_event_before.x);
    assert_eq!(top_event.y, top_event_before.y);

    assert_eq!(b1.x, threat.x + threat.width + FOCUS_BARRIER_GAP);
    assert_eq!(b2.x, b1.x + b1.width + FOCUS_BARRIER_GAP);
    assert!(top_event.x >= b2.x + b2.width + FOCUS_BARRIER_GAP - 1e-9);

    // The first barrier is centered on the focused threat.
    let threat_center = threat.y + threat.height / 2.0;
    let b1_center = b1.y + b1.height / 2.0;
    assert!((b1_center - threat_center).abs() < 1e-9);

    // The hazard follows the top event.
    let hazard_center = hazard.x + hazard.width / 2.0;
    let top_center = top_event.x + top_event.width / 2.0;
    assert!((hazard_center - top_center).abs() < 1e-9);
}

#[test]
fn stacked_barriers_keep_a_minimum_gap() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    let laid_out = controller.apply_focus_layout(nodes);

    let b1 = find(&laid_out, "barrier-preventive-b1").clone();
    let b2 = find(&laid_out, "barrier-preventive-b2").clone();
    assert!(b2.y >= b1.y + b1.height + FOCUS_VERTICAL_GAP - 1e-9);

    // Drag the second barrier far above the first; the stacking rule wins
    // over the stored offset on the next pass.
    let mut working = laid_out.clone();
    controller.apply_changes(
        &[PositionChange {
            id: "barrier-preventive-b2".to_string(),
            x: b2.x,
            y: b2.y - 4.0 * FOCUS_VERTICAL_RANGE,
        }],
        &mut working,
    );
    let relaid = controller.apply_focus_layout(laid_out);
    let b1 = find(&relaid, "barrier-preventive-b1").clone();
    let b2 = find(&relaid, "barrier-preventive-b2").clone();
    assert!(b2.y >= b1.y + b1.height + FOCUS_VERTICAL_GAP - 1e-9);
}

#[test]
fn barrier_drags_keep_the_layout_x() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    let laid_out = controller.apply_focus_layout(nodes);

    let b1 = find(&laid_out, "barrier-preventive-b1").clone();
    let constrained = controller.constrain_changes(
        &[PositionChange {
            id: b1.id.clone(),
            x: b1.x + 500.0,
            y: b1.y + 20.0,
        }],
        &laid_out,
    );
    assert_eq!(constrained[0].x, b1.x);
    assert_eq!(constrained[0].y, b1.y + 20.0);
}

#[test]
fn the_focused_threat_cannot_cross_its_anchor() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    let laid_out = controller.apply_focus_layout(nodes);

    let anchor_x = controller.anchor().unwrap().x;
    let threat = find(&laid_out, "threat-t1").clone();
    let constrained = controller.constrain_changes(
        &[PositionChange {
            id: threat.id.clone(),
            x: anchor_x + 100.0,
            y: threat.y,
        }],
        &laid_out,
    );
    assert_eq!(constrained[0].x, anchor_x);

    // Moving left is allowed.
    let constrained = controller.constrain_changes(
        &[PositionChange {
            id: threat.id,
            x: anchor_x - 100.0,
            y: threat.y,
        }],
        &laid_out,
    );
    assert_eq!(constrained[0].x, anchor_x - 100.0);
}

#[test]
fn focused_node_drags_accumulate_into_offsets() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    let mut laid_out = controller.apply_focus_layout(nodes);

    let threat = find(&laid_out, "threat-t1").clone();
    controller.apply_changes(
        &[PositionChange {
            id: threat.id.clone(),
            x: threat.x - 50.0,
            y: threat.y + 10.0,
        }],
        &mut laid_out,
    );
    assert_eq!(controller.focus_node_offset("threat-t1"), (-50.0, 10.0));
}

#[test]
fn barrier_offsets_clamp_to_the_vertical_range() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    let mut laid_out = controller.apply_focus_layout(nodes);

    let b1 = find(&laid_out, "barrier-preventive-b1").clone();
    controller.apply_changes(
        &[PositionChange {
            id: b1.id.clone(),
            x: b1.x,
            y: b1.y + 10.0 * FOCUS_VERTICAL_RANGE,
        }],
        &mut laid_out,
    );
    assert_eq!(
        controller.barrier_offset("barrier-preventive-b1"),
        FOCUS_VERTICAL_RANGE
    );
}

#[test]
fn sync_clears_focus_when_the_node_disappears() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("threat-t1", NodeKind::Threat);
    assert_eq!(controller.focused(), Some("threat-t1"));

    let without_t1: Vec<RenderNode> = graph
        .nodes
        .iter()
        .filter(|node| node.id != "threat-t1")
        .cloned()
        .collect();
    controller.sync_with_nodes(&without_t1);
    assert_eq!(controller.focused(), None);
    assert_eq!(controller.barrier_offset("barrier-preventive-b1"), 0.0);
}

#[test]
fn clearing_focus_restores_the_full_scope() {
    let (graph, mut controller) = build_graph();
    controller.toggle_focus("consequence-c1", NodeKind::Consequence);
    let (focused_nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    assert!(focused_nodes.iter().any(|n| n.id == "barrier-mitigative-m1"));
    assert!(focused_nodes.iter().all(|n| n.id != "threat-t1"));

    controller.clear_focus();
    let (nodes, _) = controller.scope_graph(&graph.nodes, &graph.edges);
    assert!(nodes.iter().any(|n| n.id == "threat-t1"));
    assert!(nodes.iter().any(|n| n.id == "consequence-c1"));
}

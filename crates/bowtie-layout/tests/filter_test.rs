use bowtie_core::baseline_diagram;
use bowtie_layout::filter::{FilterState, SeverityFilter, apply_presentation};
use bowtie_layout::graph::{RenderNode, build_render_graph};
use bowtie_layout::layout::{LayoutOptions, layout_bowtie_diagram};

fn render_nodes() -> Vec<RenderNode> {
    let diagram = baseline_diagram();
    let layout_nodes = layout_bowtie_diagram(&diagram, &LayoutOptions::default()).unwrap();
    build_render_graph(&layout_nodes, &diagram).nodes
}

fn find<'a>(nodes: &'a [RenderNode], id: &str) -> &'a RenderNode {
    nodes
        .iter()
        .find(|node| node.id == id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

#[test]
fn inactive_filters_leave_presentation_untouched() {
    let nodes = apply_presentation(render_nodes(), &FilterState::default());
    assert!(nodes.iter().all(|node| {
        !node.presentation.highlighted && !node.presentation.dimmed && !node.presentation.selected
    }));
}

#[test]
fn text_filter_matches_label_and_description_case_insensitively() {
    let filters = FilterState {
        text: "  BREATHALYZER ".to_string(),
        ..FilterState::default()
    };
    let nodes = apply_presentation(render_nodes(), &filters);

    // "Breathalyzer" only appears in the interlock barrier's description.
    let interlock = find(&nodes, "barrier-preventive-barrier-ignition-interlock");
    assert!(interlock.presentation.highlighted);
    assert!(!interlock.presentation.dimmed);

    let sobriety = find(&nodes, "barrier-preventive-barrier-sobriety-program");
    assert!(!sobriety.presentation.highlighted);
    assert!(sobriety.presentation.dimmed);
}

#[test]
fn medium_filter_matches_medium_and_above() {
    let filters = FilterState {
        severity: SeverityFilter::Medium,
        ..FilterState::default()
    };
    let nodes = apply_presentation(render_nodes(), &filters);

    assert!(find(&nodes, "threat-threat-slippery-road").presentation.highlighted);
    assert!(find(&nodes, "threat-threat-intoxicated-driving").presentation.highlighted);
    // Barriers carry no severity and are dimmed while the filter is active.
    assert!(find(&nodes, "barrier-preventive-barrier-phone-lockout").presentation.dimmed);
}

#[test]
fn low_filter_matches_low_exactly() {
    let filters = FilterState {
        severity: SeverityFilter::Low,
        ..FilterState::default()
    };
    let nodes = apply_presentation(render_nodes(), &filters);

    // The baseline has no low-severity entities, so nothing matches.
    assert!(nodes.iter().all(|node| !node.presentation.highlighted));
    assert!(nodes.iter().all(|node| node.presentation.dimmed));
}

#[test]
fn selection_highlights_without_an_active_filter() {
    let filters = FilterState {
        selected: Some("topEvent-top-event-loss-of-control".to_string()),
        ..FilterState::default()
    };
    let nodes = apply_presentation(render_nodes(), &filters);

    let top_event = find(&nodes, "topEvent-top-event-loss-of-control");
    assert!(top_event.presentation.selected);
    assert!(top_event.presentation.highlighted);
    assert!(!top_event.presentation.dimmed);
    // No filter is active, so nothing else is dimmed.
    assert!(
        nodes
            .iter()
            .filter(|node| node.id != top_event.id)
            .all(|node| !node.presentation.dimmed)
    );
}

#[test]
fn presentation_is_replaced_wholesale_on_each_pass() {
    let filters = FilterState {
        severity: SeverityFilter::Critical,
        ..FilterState::default()
    };
    let filtered = apply_presentation(render_nodes(), &filters);
    assert!(filtered.iter().any(|node| node.presentation.dimmed));

    let cleared = apply_presentation(filtered, &FilterState::default());
    assert!(cleared.iter().all(|node| {
        !node.presentation.highlighted && !node.presentation.dimmed && !node.presentation.selected
    }));
}

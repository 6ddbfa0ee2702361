use crate::hierarchy::{DiagramIndex, ThreatIndex};
use crate::model::Threat;

fn threat(id: &str, level: u32, parent_id: Option<&str>, sub_threats: Vec<Threat>) -> Threat {
    Threat {
        id: id.to_string(),
        label: format!("Threat {id}"),
        description: None,
        level,
        parent_id: parent_id.map(str::to_string),
        severity: None,
        appearance: None,
        sub_threats,
    }
}

#[test]
fn nested_threats_are_flattened() {
    let roots = vec![threat(
        "a",
        0,
        None,
        vec![threat("b", 1, Some("a"), vec![threat("c", 2, Some("b"), vec![])])],
    )];
    let index = ThreatIndex::build(&roots);
    assert_eq!(index.len(), 3);
    assert!(index.contains("a"));
    assert!(index.contains("b"));
    assert!(index.contains("c"));
}

#[test]
fn children_view_follows_parent_links() {
    let roots = vec![
        threat("a", 0, None, vec![]),
        threat("b", 1, Some("a"), vec![]),
        threat("c", 1, Some("a"), vec![]),
    ];
    let index = ThreatIndex::build(&roots);
    let children: Vec<&str> = index.children_of("a").map(|t| t.id.as_str()).collect();
    assert_eq!(children, vec!["b", "c"]);
}

#[test]
fn connectivity_walk_reaches_roots() {
    let roots = vec![
        threat("a", 0, None, vec![]),
        threat("b", 1, Some("a"), vec![]),
        threat("c", 2, Some("b"), vec![]),
    ];
    let index = ThreatIndex::build(&roots);
    assert!(index.is_connected_to_root("c"));
    assert!(index.is_connected_to_root("a"));
}

#[test]
fn connectivity_walk_rejects_cycles_and_gaps() {
    let roots = vec![
        threat("a", 0, Some("b"), vec![]),
        threat("b", 1, Some("a"), vec![]),
        threat("c", 1, Some("gone"), vec![]),
    ];
    let index = ThreatIndex::build(&roots);
    assert!(!index.is_connected_to_root("a"));
    assert!(!index.is_connected_to_root("b"));
    assert!(!index.is_connected_to_root("c"));
    assert!(!index.is_connected_to_root("unknown"));
}

#[test]
fn diagram_index_exposes_barriers_by_id() {
    let diagram = super::base_diagram();
    let index = DiagramIndex::build(&diagram);
    assert!(index.barrier("barrier-1").is_some());
    assert!(index.barrier("nope").is_none());
    assert!(index.threats.contains("threat-1"));
    assert!(index.consequences.contains("consequence-1"));
}

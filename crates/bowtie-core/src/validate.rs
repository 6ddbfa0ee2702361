//! Advisory diagram validation.
//!
//! Validation reports issues instead of failing: the layout engine and graph
//! builder render a best-effort graph even for diagrams with errors, so
//! nothing here gates the pipeline.

use crate::hierarchy::{ConsequenceIndex, ThreatIndex, TreeItem, TreeIndex};
use crate::model::{BarrierKind, BowtieDiagram};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Stable dotted identifier, e.g. `barrier.b1.linkType`.
    pub id: String,
    pub message: String,
    pub severity: IssueSeverity,
}

impl ValidationIssue {
    fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

struct IdRegistry {
    owners: IndexMap<String, &'static str>,
}

impl IdRegistry {
    fn new() -> Self {
        Self {
            owners: IndexMap::new(),
        }
    }

    fn register(
        &mut self,
        id: &str,
        kind: &'static str,
        label: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if id.trim().is_empty() {
            let label = if label.trim().is_empty() {
                "unnamed"
            } else {
                label
            };
            issues.push(ValidationIssue::error(
                format!("{kind}.missingId"),
                format!("{kind} \"{label}\" is missing a stable id."),
            ));
            return;
        }
        if let Some(existing) = self.owners.get(id) {
            issues.push(ValidationIssue::error(
                format!("{kind}.duplicateId"),
                format!("Id \"{id}\" is reused by {existing} and {kind}."),
            ));
            return;
        }
        self.owners.insert(id.to_string(), kind);
    }
}

fn has_label(value: &str) -> bool {
    !value.trim().is_empty()
}

fn safe_label<'a>(label: &'a str, fallback: &'a str) -> &'a str {
    if has_label(label) { label } else { fallback }
}

/// Validates a bow-tie diagram, returning every detected issue.
///
/// Pure and infallible: a `None` diagram yields a single fatal issue, any
/// other input yields the full independent list of findings.
pub fn validate_bowtie_diagram(diagram: Option<&BowtieDiagram>) -> Vec<ValidationIssue> {
    let Some(diagram) = diagram else {
        return vec![ValidationIssue::error(
            "diagram.missing",
            "Diagram payload is missing.",
        )];
    };

    let mut issues = Vec::new();
    let mut registry = IdRegistry::new();

    match &diagram.hazard {
        None => issues.push(ValidationIssue::error(
            "hazard.absent",
            "Each bowtie diagram must define a hazard node.",
        )),
        Some(hazard) => {
            registry.register(&hazard.id, "Hazard", &hazard.label, &mut issues);
            if !has_label(&hazard.label) {
                issues.push(ValidationIssue::error(
                    "hazard.label",
                    "Hazard label cannot be empty.",
                ));
            }
        }
    }

    if !has_label(&diagram.top_event.label) {
        issues.push(ValidationIssue::error(
            "topEvent.label",
            "Top event label cannot be empty.",
        ));
    }
    registry.register(
        &diagram.top_event.id,
        "TopEvent",
        &diagram.top_event.label,
        &mut issues,
    );

    let threats = ThreatIndex::build(&diagram.threats);
    let consequences = ConsequenceIndex::build(&diagram.consequences);

    if threats.is_empty() && consequences.is_empty() {
        issues.push(ValidationIssue::warning(
            "diagram.empty",
            "Diagram should define at least one threat or consequence.",
        ));
    }

    check_tree_side(&threats, "Threat", "threat", &mut registry, &mut issues);
    check_tree_side(
        &consequences,
        "Consequence",
        "consequence",
        &mut registry,
        &mut issues,
    );

    for barrier in &diagram.barriers {
        registry.register(&barrier.id, "Barrier", &barrier.label, &mut issues);

        let name = safe_label(&barrier.label, &barrier.id);
        if !has_label(&barrier.label) {
            issues.push(ValidationIssue::error(
                format!("barrier.{}.label", barrier.id),
                format!("Barrier \"{name}\" is missing a label."),
            ));
        }

        match barrier.kind {
            BarrierKind::Preventive => {
                if barrier.threat_id.is_none() {
                    issues.push(ValidationIssue::error(
                        format!("barrier.{}.link", barrier.id),
                        format!("Preventive barrier \"{name}\" must reference a threatId."),
                    ));
                }
                if barrier.consequence_id.is_some() {
                    issues.push(ValidationIssue::error(
                        format!("barrier.{}.linkType", barrier.id),
                        format!("Preventive barrier \"{name}\" cannot reference consequenceId."),
                    ));
                }
                if let Some(threat_id) = &barrier.threat_id {
                    if !threats.contains(threat_id) {
                        issues.push(ValidationIssue::error(
                            format!("barrier.{}.threatMissing", barrier.id),
                            format!(
                                "Barrier \"{name}\" references missing threat \"{threat_id}\"."
                            ),
                        ));
                    } else if !threats.is_connected_to_root(threat_id) {
                        issues.push(ValidationIssue::error(
                            format!("barrier.{}.threatDisconnected", barrier.id),
                            format!(
                                "Barrier \"{name}\" is attached to threat \"{threat_id}\" that is not connected to the top event."
                            ),
                        ));
                    }
                }
            }
            BarrierKind::Mitigative => {
                if barrier.consequence_id.is_none() {
                    issues.push(ValidationIssue::error(
                        format!("barrier.{}.link", barrier.id),
                        format!("Mitigative barrier \"{name}\" must reference a consequenceId."),
                    ));
                }
                if barrier.threat_id.is_some() {
                    issues.push(ValidationIssue::error(
                        format!("barrier.{}.linkType", barrier.id),
                        format!("Mitigative barrier \"{name}\" cannot reference threatId."),
                    ));
                }
                if let Some(consequence_id) = &barrier.consequence_id {
                    if !consequences.contains(consequence_id) {
                        issues.push(ValidationIssue::error(
                            format!("barrier.{}.consequenceMissing", barrier.id),
                            format!(
                                "Barrier \"{name}\" references missing consequence \"{consequence_id}\"."
                            ),
                        ));
                    } else if !consequences.is_connected_to_root(consequence_id) {
                        issues.push(ValidationIssue::error(
                            format!("barrier.{}.consequenceDisconnected", barrier.id),
                            format!(
                                "Barrier \"{name}\" is attached to consequence \"{consequence_id}\" that is not connected to the top event."
                            ),
                        ));
                    }
                }
            }
        }
    }

    issues
}

fn check_tree_side<T>(
    index: &TreeIndex<T>,
    kind: &'static str,
    prefix: &str,
    registry: &mut IdRegistry,
    issues: &mut Vec<ValidationIssue>,
) where
    T: TreeItem + Labeled,
{
    for item in index.iter() {
        registry.register(item.id(), kind, item.label(), issues);

        let name = safe_label(item.label(), item.id());
        if !has_label(item.label()) {
            issues.push(ValidationIssue::error(
                format!("{prefix}.{}.label", item.id()),
                format!("{kind} \"{name}\" is missing a label."),
            ));
        }

        if let Some(parent_id) = item.parent_id() {
            if !index.contains(parent_id) {
                issues.push(ValidationIssue::error(
                    format!("{prefix}.{}.parent", item.id()),
                    format!("{kind} \"{name}\" references missing parent \"{parent_id}\"."),
                ));
            } else if !index.is_connected_to_root(item.id()) {
                issues.push(ValidationIssue::error(
                    format!("{prefix}.{}.disconnected", item.id()),
                    format!(
                        "{kind} \"{name}\" is not connected to the top event due to a broken hierarchy."
                    ),
                ));
            }
        }
    }
}

/// Label access shared by both tree sides.
pub trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for crate::model::Threat {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Labeled for crate::model::Consequence {
    fn label(&self) -> &str {
        &self.label
    }
}

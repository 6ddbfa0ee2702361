//! Presentation filters: text search, severity focus, selection.
//!
//! Filtering never removes nodes; it only computes the presentation flags
//! (`highlighted`/`dimmed`/`selected`) consumed by a renderer.

use crate::graph::{Presentation, RenderNode};
use bowtie_core::model::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    #[default]
    All,
    /// Matches severity `low` exactly, not "low and above".
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityFilter {
    fn threshold(self) -> Option<u8> {
        match self {
            SeverityFilter::All => None,
            SeverityFilter::Low => Some(Severity::Low.rank()),
            SeverityFilter::Medium => Some(Severity::Medium.rank()),
            SeverityFilter::High => Some(Severity::High.rank()),
            SeverityFilter::Critical => Some(Severity::Critical.rank()),
        }
    }

    fn matches(self, severity: Option<Severity>) -> bool {
        let (Some(threshold), Some(severity)) = (self.threshold(), severity) else {
            return false;
        };
        if self == SeverityFilter::Low {
            severity.rank() == Severity::Low.rank()
        } else {
            severity.rank() >= threshold
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub text: String,
    pub severity: SeverityFilter,
    /// Render id of the selected node, if any.
    pub selected: Option<String>,
}

impl FilterState {
    fn is_active(&self) -> bool {
        !self.text.trim().is_empty() || self.severity != SeverityFilter::All
    }
}

/// Recomputes every node's presentation from the filter state. A node is
/// highlighted when selected or when it matches an active text/severity
/// filter; non-matching nodes are dimmed while any filter is active.
pub fn apply_presentation(nodes: Vec<RenderNode>, filters: &FilterState) -> Vec<RenderNode> {
    let needle = filters.text.trim().to_lowercase();
    let filter_active = filters.is_active();

    nodes
        .into_iter()
        .map(|mut node| {
            let matches_text = if needle.is_empty() {
                false
            } else {
                let content = format!(
                    "{} {}",
                    node.data.label(),
                    node.data.description().unwrap_or("")
                )
                .to_lowercase();
                content.contains(&needle)
            };
            let matches_severity = filters.severity.matches(node.data.severity());

            let selected = filters.selected.as_deref() == Some(node.id.as_str());
            let highlighted = selected || (filter_active && (matches_text || matches_severity));
            node.presentation = Presentation {
                selected,
                highlighted,
                dimmed: filter_active && !highlighted,
            };
            node
        })
        .collect()
}

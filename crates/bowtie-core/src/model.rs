//! Typed bow-tie diagram model.
//!
//! Field names serialize in the camelCase shape produced by external data
//! loaders (`parentId`, `subThreats`, `topEvent`, ...), so an assembled JSON
//! payload deserializes into this model unchanged.

use serde::{Deserialize, Serialize};

/// Severity scale shared by threats, consequences and the top event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric rank used by severity filters and decoration (1..=4).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effectiveness {
    Low,
    Medium,
    High,
}

/// Barrier role in the causal chain. Carried as an explicit discriminant from
/// construction time; never re-derived from id strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarrierKind {
    Preventive,
    Mitigative,
}

impl BarrierKind {
    pub fn describe(self) -> &'static str {
        match self {
            BarrierKind::Preventive => "Preventive barrier",
            BarrierKind::Mitigative => "Mitigative barrier",
        }
    }
}

/// How a barrier intervenes (human action, hardware, or both).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mechanism {
    ActiveHuman,
    ActiveHardware,
    PassiveHardware,
    Hybrid,
}

impl Mechanism {
    pub fn label(self) -> &'static str {
        match self {
            Mechanism::ActiveHuman => "Active human",
            Mechanism::ActiveHardware => "Active hardware",
            Mechanism::PassiveHardware => "Passive hardware",
            Mechanism::Hybrid => "Active human + hardware",
        }
    }
}

/// Styling hints attached to a threat/consequence by the authoring side.
/// Opaque to the layout engine; forwarded through decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub background: String,
    pub border_color: String,
    pub text_color: String,
    pub shadow_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEvent {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Drill-down depth; 0 is the coarsest level.
    pub level: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub appearance: Option<Appearance>,
    #[serde(default)]
    pub sub_threats: Vec<Threat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequence {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub appearance: Option<Appearance>,
    #[serde(default)]
    pub sub_consequences: Vec<Consequence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barrier {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: BarrierKind,
    #[serde(default)]
    pub effectiveness: Option<Effectiveness>,
    /// Set iff `kind` is preventive.
    #[serde(default)]
    pub threat_id: Option<String>,
    /// Set iff `kind` is mitigative.
    #[serde(default)]
    pub consequence_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub mechanism: Option<Mechanism>,
}

/// A full bow-tie diagram as assembled by the data-access layer. Treated as
/// immutable input for the duration of a layout/render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowtieDiagram {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hazard: Option<Hazard>,
    pub top_event: TopEvent,
    #[serde(default)]
    pub threats: Vec<Threat>,
    #[serde(default)]
    pub consequences: Vec<Consequence>,
    #[serde(default)]
    pub barriers: Vec<Barrier>,
}

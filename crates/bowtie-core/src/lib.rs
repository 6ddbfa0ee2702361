#![forbid(unsafe_code)]

//! Bow-tie hazard diagram model + validator (headless).
//!
//! Design goals:
//! - typed, serde-compatible diagram model matching the external payload shape
//! - advisory validation: issues are reported, never thrown, and never gate
//!   layout or graph construction
//! - one canonical hierarchy representation (flat map + parent links) with
//!   derived views

pub mod baseline;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod validate;

pub use baseline::baseline_diagram;
pub use error::{Error, Result};
pub use hierarchy::{ConsequenceIndex, DiagramIndex, ThreatIndex, TreeItem};
pub use model::{
    Appearance, Barrier, BarrierKind, BowtieDiagram, Consequence, Effectiveness, Hazard, Mechanism,
    Severity, Threat, TopEvent,
};
pub use validate::{IssueSeverity, ValidationIssue, validate_bowtie_diagram};

impl BowtieDiagram {
    /// Deserializes a diagram from its external JSON shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests;

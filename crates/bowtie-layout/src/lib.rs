#![forbid(unsafe_code)]

//! Layout engine and render-graph builder for bow-tie hazard diagrams.
//!
//! The pipeline is: layout (`layout_bowtie_diagram`) places the visible
//! nodes, the graph builder (`build_render_graph`) derives decorated nodes
//! and causal edges, `apply_presentation` computes filter flags, and the
//! `FocusController` handles branch focus and drag interaction on top of the
//! built graph. Each stage is pure except the controller, which owns the
//! interaction session state.

pub mod error;
pub mod filter;
pub mod focus;
pub mod graph;
mod layered;
pub mod layout;

pub use error::{LayoutError, Result};
pub use filter::{FilterState, SeverityFilter, apply_presentation};
pub use focus::{
    FOCUS_BARRIER_GAP, FOCUS_VERTICAL_GAP, FOCUS_VERTICAL_RANGE, FocusAnchor, FocusController,
    PositionChange,
};
pub use graph::{
    HAZARD_VERTICAL_GAP, NodeData, Presentation, RenderEdge, RenderGraph, RenderNode,
    build_render_graph, compute_barrier_order,
};
pub use layout::{
    FULL_DEPTH, LayoutNode, LayoutOptions, NodeKind, Spacing, layout_bowtie_diagram,
};

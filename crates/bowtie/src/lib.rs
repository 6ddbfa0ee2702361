#![forbid(unsafe_code)]

//! `bowtie` is a headless bow-tie hazard diagram engine.
//!
//! It turns a declarative diagram (hazard, top event, threats with
//! preventive barrier chains, consequences with mitigative barrier chains)
//! into a positioned render graph, with advisory validation, presentation
//! filters and an interactive focus controller. Rendering, data access and
//! application UI are left to the caller.
//!
//! The async entry points are thin wrappers over the sync ones and do not
//! require a specific runtime.

pub use bowtie_core::*;
pub use bowtie_layout::{
    FOCUS_BARRIER_GAP, FOCUS_VERTICAL_GAP, FOCUS_VERTICAL_RANGE, FULL_DEPTH, FilterState,
    FocusAnchor, FocusController, HAZARD_VERTICAL_GAP, LayoutError, LayoutNode, LayoutOptions,
    NodeData, NodeKind, Presentation, PositionChange, RenderEdge, RenderGraph, RenderNode,
    SeverityFilter, Spacing, apply_presentation, build_render_graph, compute_barrier_order,
    layout_bowtie_diagram,
};

mod session;
pub use session::LayoutSession;

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Model(#[from] bowtie_core::Error),
    #[error(transparent)]
    Layout(#[from] bowtie_layout::LayoutError),
}

pub type Result<T> = std::result::Result<T, HeadlessError>;

pub fn layout_diagram_sync(
    diagram: &BowtieDiagram,
    options: &LayoutOptions,
) -> Result<Vec<LayoutNode>> {
    Ok(layout_bowtie_diagram(diagram, options)?)
}

pub async fn layout_diagram(
    diagram: &BowtieDiagram,
    options: &LayoutOptions,
) -> Result<Vec<LayoutNode>> {
    layout_diagram_sync(diagram, options)
}

/// Convenience bundle: layout options plus filter state, producing decorated
/// render graphs in one call. Defaults to the full hierarchy depth.
#[derive(Debug, Clone)]
pub struct HeadlessBowtie {
    pub layout: LayoutOptions,
    pub filter: FilterState,
    graph: Option<RenderGraph>,
}

impl Default for HeadlessBowtie {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBowtie {
    pub fn new() -> Self {
        Self {
            layout: LayoutOptions {
                view_level: FULL_DEPTH,
                ..LayoutOptions::default()
            },
            filter: FilterState::default(),
            graph: None,
        }
    }

    /// Runs layout, graph construction and presentation. The stored graph is
    /// only replaced on success; a failed pass leaves the previous result in
    /// place.
    pub fn render_graph_sync(&mut self, diagram: &BowtieDiagram) -> Result<&RenderGraph> {
        let layout_nodes = layout_bowtie_diagram(diagram, &self.layout)?;
        let built = build_render_graph(&layout_nodes, diagram);
        let nodes = apply_presentation(built.nodes, &self.filter);
        Ok(&*self.graph.insert(RenderGraph {
            nodes,
            edges: built.edges,
        }))
    }

    pub async fn render_graph(&mut self, diagram: &BowtieDiagram) -> Result<&RenderGraph> {
        self.render_graph_sync(diagram)
    }

    /// The last successfully built graph, if any.
    pub fn current(&self) -> Option<&RenderGraph> {
        self.graph.as_ref()
    }
}

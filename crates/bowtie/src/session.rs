//! Supersession-safe tracking of layout results.
//!
//! Layout requests for large diagrams may finish out of order when a new
//! diagram or view level arrives while an earlier pass is still running.
//! Instead of cancelling in-flight work, each request gets a generation
//! stamp and a stale completion is simply discarded: a newer result is never
//! overwritten by an older one.

use bowtie_layout::RenderGraph;

#[derive(Debug, Default)]
pub struct LayoutSession {
    generation: u64,
    current: Option<(u64, RenderGraph)>,
}

impl LayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request and supersedes every outstanding one. Returns
    /// the generation stamp to pass to `complete`.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Installs a finished graph if its request is still the latest one.
    /// Returns `false` (and leaves the current graph untouched) for a stale
    /// generation.
    pub fn complete(&mut self, generation: u64, graph: RenderGraph) -> bool {
        if generation != self.generation {
            return false;
        }
        self.current = Some((generation, graph));
        true
    }

    /// The most recent successfully installed graph.
    pub fn current(&self) -> Option<&RenderGraph> {
        self.current.as_ref().map(|(_, graph)| graph)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Failures of the placement pass. These propagate to the caller; the engine
/// never substitutes origin coordinates for a node it could not place.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layered graph edge references unknown node `{id}`")]
    UnknownNode { id: String },

    #[error("cyclic dependency in layered graph at node `{id}`")]
    CyclicGraph { id: String },

    #[error("node `{id}` was not assigned a placement")]
    Unplaced { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A payload that does not deserialize into the typed model. Unknown
    /// barrier kinds and similar shape errors surface here, not from the
    /// validator.
    #[error("diagram JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Error types for the mind-map pipeline.
//!
//! Malformed generator output is recovered inside [`crate::reconstruct`] and
//! only reported through the log; the variants below are the conditions a
//! caller has to handle.

/// Result type alias for mind-map operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The generator returned zero concept nodes.
    #[error("the generated structure was empty")]
    EmptyResult,

    /// The generator response could not be decoded into a node list.
    #[error("malformed generator response: {reason}")]
    MalformedResponse {
        /// Why decoding failed
        reason: String,
    },

    /// The external generation service failed (network, quota, schema).
    #[error("analysis failed: {0}")]
    Generation(String),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

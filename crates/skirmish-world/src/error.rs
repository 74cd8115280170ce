//! Error types for the world crate.

/// Errors that can occur when constructing arena geometry.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The arena bounds are degenerate (non-positive extent).
    #[error("invalid arena bounds: {reason}")]
    InvalidBounds {
        /// Explanation of what is wrong with the bounds.
        reason: String,
    },
}

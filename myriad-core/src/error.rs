//! Error taxonomy for the Myriad engine
//!
//! Nothing here is fatal to the process: every failure degrades to "reuse
//! previous buckets" or "fall back to the sequential path". Bucket overflow
//! is deliberately absent — silent truncation at a fixed tier is the
//! documented degradation strategy, not an error.

use thiserror::Error;

/// Main error type for Myriad engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// The accelerated compute backend could not be initialized. Recovered
    /// by falling back to the sequential resolver for the process lifetime.
    #[error("Accelerated backend unavailable: {reason}")]
    BackendUnavailable { reason: String },

    /// A resolution pass completed for a dataset generation that has since
    /// been replaced. The pass output must be discarded, not bucketed.
    #[error("Stale resolution result: expected generation {expected}, got {got}")]
    StaleResult { expected: u64, got: u64 },

    /// Camera precondition violation (degenerate or non-finite state).
    /// Producing a frame at all requires a valid camera from the input
    /// layer, so this propagates to the caller rather than being recovered.
    #[error("Invalid camera state: {reason}")]
    InvalidCamera { reason: String },

    /// Dataset snapshot arrays disagree with the declared entity count.
    #[error("Malformed dataset snapshot: {reason}")]
    MalformedDataset { reason: String },
}

impl EngineError {
    pub fn invalid_camera(reason: impl Into<String>) -> Self {
        Self::InvalidCamera {
            reason: reason.into(),
        }
    }

    pub fn backend_unavailable(reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            reason: reason.into(),
        }
    }
}

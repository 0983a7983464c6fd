//! Error types for signal generation.

use std::io;
use thiserror::Error;

/// Result type for signal generation.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while building or generating a signal. All of them are structural: a
/// bad configuration, a bad segment or plan, or an unwritable destination. None are retried.
#[derive(Error, Debug)]
pub enum SignalError {
    /// The sequence plan names a segment the library doesn't have.
    #[error("unknown segment '{name}'")]
    UnknownSegment { name: String },

    /// A segment's breakpoints are unordered or out of the voltage range.
    #[error("invalid segment '{name}': {reason}")]
    InvalidSegment { name: String, reason: String },

    /// A segment with this name is already registered.
    #[error("segment '{name}' is already defined")]
    DuplicateSegment { name: String },

    /// A plan entry can't be expanded.
    #[error("invalid sequence plan: {reason}")]
    InvalidPlan { reason: String },

    /// The video matrix has the wrong shape or out-of-range levels.
    #[error("invalid video matrix: {reason}")]
    InvalidVideoMatrix { reason: String },

    /// Timing or voltage constants that can't describe a signal.
    #[error("invalid signal configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Breakpoints handed to the duplicate repair go back in time.
    #[error("breakpoint {index} goes back in time")]
    UnsortedBreakpoints { index: usize },

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding the plot failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl SignalError {
    pub(crate) fn invalid_segment(name: &str, reason: impl Into<String>) -> Self {
        SignalError::InvalidSegment {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        SignalError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

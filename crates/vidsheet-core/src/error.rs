//! Error types for vidsheet-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vidsheet-core
#[derive(Debug, Error)]
pub enum Error {
    /// Frame buffer does not match the declared dimensions
    #[error("frame buffer of {actual} bytes does not match {width}x{height} RGB24 ({expected} bytes)")]
    FrameBufferMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Frame with zero width or height
    #[error("frame has no pixels ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    /// Quantization requested with zero target colors
    #[error("color count must be at least 1")]
    ZeroColors,
}

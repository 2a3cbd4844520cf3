//! Error types for vidsheet-video

use thiserror::Error;

/// Result type alias using [`VideoError`]
pub type Result<T> = std::result::Result<T, VideoError>;

/// Errors that can occur while probing or decoding a video
#[derive(Debug, Error)]
pub enum VideoError {
    /// The decoder executable could not be spawned
    #[error("could not run {tool} (is it installed and on PATH?): {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be opened or decoded
    #[error("{tool} could not read the input: {detail}")]
    Unreadable { tool: &'static str, detail: String },

    /// ffprobe produced output we could not interpret
    #[error("unexpected probe output: {0}")]
    Metadata(String),

    /// The raw video stream ended in the middle of a frame
    #[error("video stream ended mid-frame ({got} of {expected} bytes)")]
    TruncatedFrame { expected: usize, got: usize },

    /// I/O failure on the decoder pipe
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A decoded buffer failed frame validation
    #[error(transparent)]
    Frame(#[from] vidsheet_core::Error),
}

//! # vidsheet-video
//!
//! Video decoding for vidsheet, built on `ffmpeg`/`ffprobe` subprocesses.
//!
//! [`FfmpegFrameSource`] probes an input file and then streams raw RGB24
//! frames off a piped `ffmpeg` decode, one [`Frame`](vidsheet_core::Frame)
//! at a time. The [`FrameSource`] trait is the seam the conversion
//! pipeline consumes, so tests can substitute synthetic sources.

pub mod error;
pub mod probe;
pub mod source;

pub use error::{Result, VideoError};
pub use probe::{probe, VideoMetadata};
pub use source::{FfmpegFrameSource, FrameSource};

//! Convenience re-exports for the common conversion workflow.
//!
//! ```rust
//! use vidsheet::prelude::*;
//! ```

pub use crate::pipeline::{convert, ConvertError, ConvertOptions, ConvertReport};
pub use vidsheet_core::{Frame, PaletteRegistry, QuantizeOptions, ResizeFilter, Rgb};
pub use vidsheet_video::{FfmpegFrameSource, FrameSource};
pub use vidsheet_xlsx::WorkbookWriter;

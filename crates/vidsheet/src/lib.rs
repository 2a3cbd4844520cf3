//! # vidsheet
//!
//! Turns a video into an XLSX document where every sampled frame is a
//! worksheet and every cell is one color-quantized pixel, rendered purely
//! through cell background styles.
//!
//! The conversion is a single-threaded, streaming pipeline: decode one
//! frame, keep it only if its index lands on the sampling interval,
//! downscale it to the working raster, quantize it to K colors in Oklab
//! space, resolve each palette color to a workbook style (deduplicated
//! for the whole run), and stream the sheet's cells out before pulling
//! the next frame.
//!
//! ## Example
//!
//! ```no_run
//! use vidsheet::{convert, ConvertOptions, FfmpegFrameSource};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = FfmpegFrameSource::open(Path::new("input.mp4"))?;
//! let options = ConvertOptions::new(8, 30); // 8 colors, every 30th frame
//! let report = convert(source, Path::new("out.xlsx"), &options)?;
//! println!("{} sheets, {} colors", report.sheets_written, report.distinct_colors);
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
pub mod prelude;
pub mod preview;

// Re-exports for convenience
pub use vidsheet_core::{
    quantize, CapacityCheck, CapacityGuard, ColorKey, Frame, Oklab, PaletteRegistry,
    QuantizeOptions, QuantizedFrame, ResizeFilter, Rgb, FORMAT_STYLE_CEILING,
};
pub use vidsheet_video::{FfmpegFrameSource, FrameSource, VideoError, VideoMetadata};
pub use vidsheet_xlsx::{FillId, SheetWriter, WorkbookWriter, XlsxError};

pub use pipeline::{
    convert, convert_to_writer, ConvertError, ConvertOptions, ConvertReport, FrameSampler, Sample,
};
pub use preview::FramePreview;

//! # vidsheet-core
//!
//! Core data structures for the vidsheet video-to-spreadsheet converter.
//!
//! This crate provides the fundamental types used throughout vidsheet:
//! - [`Frame`] - A decoded video frame (packed RGB24)
//! - [`Rgb`] and [`ColorKey`] - Colors and their canonical dedup keys
//! - [`quantize`] - Clustering-based color quantization in Oklab space
//! - [`PaletteRegistry`] - Run-lifetime deduplication of color styles
//! - [`CapacityGuard`] - Advisory checks against the XLSX style ceiling
//!
//! ## Example
//!
//! ```rust
//! use vidsheet_core::{quantize, Frame, QuantizeOptions};
//!
//! // A 2x2 frame with two distinct colors
//! let data = vec![
//!     255, 0, 0, 255, 0, 0, //
//!     0, 0, 255, 0, 0, 255,
//! ];
//! let frame = Frame::from_rgb24(2, 2, data).unwrap();
//!
//! let opts = QuantizeOptions::with_colors(2).seeded(7);
//! let quantized = quantize(&frame, &opts).unwrap();
//! assert_eq!(quantized.width(), 2);
//! assert!(quantized.palette().len() <= 2);
//! ```

pub mod capacity;
pub mod color;
pub mod error;
pub mod frame;
pub mod oklab;
pub mod palette;
pub mod quantize;

// Re-exports for convenience
pub use capacity::{CapacityCheck, CapacityGuard, FORMAT_STYLE_CEILING};
pub use color::{ColorKey, Rgb};
pub use error::{Error, Result};
pub use frame::{Frame, ResizeFilter};
pub use oklab::Oklab;
pub use palette::PaletteRegistry;
pub use quantize::{quantize, QuantizeOptions, QuantizedFrame};

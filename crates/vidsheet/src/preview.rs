//! Preview of the latest quantized frame
//!
//! Stands in for an interactive display window: the most recent
//! quantized frame is re-rendered to a single PNG path, overwritten for
//! every sampled frame and removed when the pipeline releases it. Point
//! an auto-reloading image viewer at the path to watch the conversion.

use std::path::PathBuf;

use tracing::debug;
use vidsheet_core::QuantizedFrame;

/// One PNG file tracking the frame currently being written.
#[derive(Debug)]
pub struct FramePreview {
    path: PathBuf,
    written: bool,
}

impl FramePreview {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FramePreview {
            path: path.into(),
            written: false,
        }
    }

    /// Overwrite the preview with this frame.
    pub fn render(&mut self, frame: &QuantizedFrame) -> Result<(), image::ImageError> {
        let mut img = image::RgbImage::new(frame.width(), frame.height());
        for row in 0..frame.height() {
            for col in 0..frame.width() {
                let c = frame.color(row, col);
                img.put_pixel(col, row, image::Rgb([c.r, c.g, c.b]));
            }
        }
        img.save_with_format(&self.path, image::ImageFormat::Png)?;
        self.written = true;
        Ok(())
    }

    /// Remove the preview file. Runs on normal completion and early
    /// termination alike; removal failures are not worth failing a
    /// finished conversion over.
    pub fn release(self) {
        if self.written {
            if let Err(err) = std::fs::remove_file(&self.path) {
                debug!(path = %self.path.display(), %err, "could not remove preview file");
            }
        }
    }
}

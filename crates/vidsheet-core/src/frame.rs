//! Decoded video frames

use crate::color::Rgb;
use crate::error::{Error, Result};

/// One decoded video frame: a `width x height` grid of RGB pixels,
/// stored as packed RGB24 in row-major order.
///
/// Frames are ephemeral. The pipeline owns exactly one at a time and
/// drops it once it has been quantized and written.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Build a frame from a packed RGB24 buffer.
    ///
    /// The buffer length must be exactly `width * height * 3`.
    pub fn from_rgb24(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyFrame { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::FrameBufferMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Frame {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel at (row, col). Rows run top to bottom.
    pub fn pixel(&self, row: u32, col: u32) -> Rgb {
        let i = (row as usize * self.width as usize + col as usize) * 3;
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
    }

    /// Resample to the given dimensions.
    pub fn resize(&self, width: u32, height: u32, filter: ResizeFilter) -> Frame {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("buffer length is checked at construction");
        let resized = image::imageops::resize(&img, width, height, filter.image_filter());
        Frame {
            width,
            height,
            data: resized.into_raw(),
        }
    }
}

/// Interpolation used when downscaling to the working raster.
///
/// Both variants show up in practice for this job; cubic resampling keeps
/// more detail, linear is faster on large sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeFilter {
    /// Catmull-Rom bicubic interpolation
    #[default]
    Bicubic,
    /// Bilinear (triangle) interpolation
    Bilinear,
}

impl ResizeFilter {
    fn image_filter(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Bicubic => image::imageops::FilterType::CatmullRom,
            ResizeFilter::Bilinear => image::imageops::FilterType::Triangle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, c: Rgb) -> Frame {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&[c.r, c.g, c.b]);
        }
        Frame::from_rgb24(width, height, data).unwrap()
    }

    #[test]
    fn test_buffer_length_checked() {
        assert!(matches!(
            Frame::from_rgb24(2, 2, vec![0; 11]),
            Err(Error::FrameBufferMismatch { expected: 12, .. })
        ));
        assert!(Frame::from_rgb24(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            Frame::from_rgb24(0, 2, vec![]),
            Err(Error::EmptyFrame { .. })
        ));
    }

    #[test]
    fn test_pixel_access() {
        let data = vec![
            1, 2, 3, 4, 5, 6, //
            7, 8, 9, 10, 11, 12,
        ];
        let frame = Frame::from_rgb24(2, 2, data).unwrap();
        assert_eq!(frame.pixel(0, 0), Rgb::new(1, 2, 3));
        assert_eq!(frame.pixel(0, 1), Rgb::new(4, 5, 6));
        assert_eq!(frame.pixel(1, 0), Rgb::new(7, 8, 9));
        assert_eq!(frame.pixel(1, 1), Rgb::new(10, 11, 12));
        assert_eq!(frame.pixels().count(), 4);
    }

    #[test]
    fn test_resize_dimensions() {
        let frame = solid(8, 6, Rgb::new(10, 200, 30));
        for filter in [ResizeFilter::Bicubic, ResizeFilter::Bilinear] {
            let small = frame.resize(4, 3, filter);
            assert_eq!(small.width(), 4);
            assert_eq!(small.height(), 3);
            assert_eq!(small.pixel_count(), 12);
            // A solid frame stays solid under any interpolation
            assert!(small.pixels().all(|p| p == Rgb::new(10, 200, 30)));
        }
    }
}

//! Example: convert a generated animation without needing ffmpeg
//!
//! Run with: cargo run --example synthetic

use std::path::Path;

use vidsheet::{convert, ConvertOptions, Frame, FrameSource, Rgb};
use vidsheet_video::Result as VideoResult;

/// A horizontally sweeping two-tone gradient, 60 frames long.
struct Sweep {
    emitted: u64,
}

impl FrameSource for Sweep {
    fn frame_count(&self) -> Option<u64> {
        Some(60)
    }

    fn next_frame(&mut self) -> VideoResult<Option<Frame>> {
        if self.emitted == 60 {
            return Ok(None);
        }
        let phase = self.emitted as u32;
        self.emitted += 1;

        let (width, height) = (160, 90);
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _row in 0..height {
            for col in 0..width {
                let t = ((col + phase * 4) % width) as f32 / width as f32;
                let c = Rgb::new((t * 255.0) as u8, 40, ((1.0 - t) * 255.0) as u8);
                data.extend_from_slice(&[c.r, c.g, c.b]);
            }
        }
        Ok(Some(Frame::from_rgb24(width, height, data)?))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConvertOptions::new(6, 15);
    options.grid_width = 160;
    options.grid_height = 90;
    options.seed = Some(0);

    let output = Path::new("synthetic.xlsx");
    let report = convert(Sweep { emitted: 0 }, output, &options)?;

    println!(
        "wrote {} with {} worksheets and {} distinct colors",
        output.display(),
        report.sheets_written,
        report.distinct_colors
    );
    Ok(())
}

//! The frame-to-sheet conversion pipeline

use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use vidsheet_core::{
    quantize, CapacityCheck, CapacityGuard, ColorKey, Frame, PaletteRegistry, QuantizeOptions,
    ResizeFilter,
};
use vidsheet_video::{FrameSource, VideoError};
use vidsheet_xlsx::{FillId, WorkbookWriter, XlsxError};

use crate::preview::FramePreview;

/// Working raster width in cells.
pub const RASTER_WIDTH: u32 = 640;
/// Working raster height in cells.
pub const RASTER_HEIGHT: u32 = 360;

/// Column width that makes cells read as roughly square pixels at the
/// default row height.
pub const DEFAULT_COLUMN_WIDTH: f64 = 3.17;
/// Row height paired with [`DEFAULT_COLUMN_WIDTH`].
pub const DEFAULT_ROW_HEIGHT: f64 = 18.75;
/// Sheet zoom that fits a 640x360 grid on screen.
pub const DEFAULT_ZOOM: u16 = 10;

/// Errors from a conversion run
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Options failed validation before processing started
    #[error("invalid options: {0}")]
    Options(String),

    /// Input could not be decoded
    #[error(transparent)]
    Video(#[from] VideoError),

    /// Output document could not be written
    #[error(transparent)]
    Xlsx(#[from] XlsxError),

    /// Frame processing failure
    #[error(transparent)]
    Core(#[from] vidsheet_core::Error),

    /// Preview image could not be written
    #[error("could not write preview image: {0}")]
    Preview(#[from] image::ImageError),

    /// I/O failure finalizing the output file
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Colors per frame (K)
    pub colors: usize,
    /// Sample every Nth decoded frame (F)
    pub frame_interval: u64,
    /// Working raster width; every worksheet is exactly this many columns
    pub grid_width: u32,
    /// Working raster height; every worksheet is exactly this many rows
    pub grid_height: u32,
    /// Interpolation used when downscaling to the raster
    pub filter: ResizeFilter,
    /// Fixed clustering seed; `None` leaves runs non-reproducible
    pub seed: Option<u64>,
    /// Uniform column width applied to every sheet
    pub column_width: f64,
    /// Uniform row height applied to every sheet
    pub row_height: f64,
    /// Sheet view zoom percent
    pub zoom: u16,
    /// Write the latest quantized frame to this PNG while converting
    pub preview: Option<PathBuf>,
}

impl ConvertOptions {
    /// Options for K colors sampled every `frame_interval` frames, with
    /// the standard raster and cell geometry.
    pub fn new(colors: usize, frame_interval: u64) -> Self {
        ConvertOptions {
            colors,
            frame_interval,
            grid_width: RASTER_WIDTH,
            grid_height: RASTER_HEIGHT,
            filter: ResizeFilter::default(),
            seed: None,
            column_width: DEFAULT_COLUMN_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
            zoom: DEFAULT_ZOOM,
            preview: None,
        }
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.colors == 0 {
            return Err(ConvertError::Options("colors must be at least 1".into()));
        }
        if self.frame_interval == 0 {
            return Err(ConvertError::Options(
                "frame interval must be at least 1".into(),
            ));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConvertError::Options("grid must be at least 1x1".into()));
        }
        Ok(())
    }
}

/// Outcome of a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    /// Frames pulled from the source (sampled or not)
    pub frames_decoded: u64,
    /// Worksheets written
    pub sheets_written: u64,
    /// Distinct colors registered across the whole run
    pub distinct_colors: usize,
    /// Pre-run capacity projection; `None` when the source does not
    /// report a frame count
    pub projection: Option<CapacityCheck>,
    /// Post-run check of the realized palette size
    pub actual: CapacityCheck,
}

/// A sampled frame together with its position in the decoded sequence.
#[derive(Debug)]
pub struct Sample {
    /// Decoded-frame ordinal; also the worksheet name
    pub index: u64,
    pub frame: Frame,
}

/// Selects every Nth decoded frame from a source.
///
/// The index advances once per decoded frame whether or not the frame is
/// kept, so samples are evenly spaced in decoded-frame units rather than
/// wall-clock time.
pub struct FrameSampler<S: FrameSource> {
    source: S,
    interval: u64,
    next_index: u64,
}

impl<S: FrameSource> FrameSampler<S> {
    /// `interval` must be positive; the pipeline validates it before
    /// constructing a sampler.
    pub fn new(source: S, interval: u64) -> Self {
        FrameSampler {
            source,
            interval,
            next_index: 0,
        }
    }

    /// Frame count reported by the underlying source, if any.
    pub fn frame_count(&self) -> Option<u64> {
        self.source.frame_count()
    }

    /// Frames pulled from the source so far.
    pub fn frames_read(&self) -> u64 {
        self.next_index
    }

    /// Advance to the next sampled frame, discarding the ones between.
    /// `Ok(None)` once the source is exhausted.
    pub fn next_sample(&mut self) -> Result<Option<Sample>, VideoError> {
        loop {
            let Some(frame) = self.source.next_frame()? else {
                return Ok(None);
            };
            let index = self.next_index;
            self.next_index += 1;
            if index % self.interval == 0 {
                return Ok(Some(Sample { index, frame }));
            }
            // Unsampled frames are dropped here; the index still advanced.
        }
    }
}

/// Number of sheets a run over `frame_count` frames will produce.
pub fn expected_sheets(frame_count: u64, interval: u64) -> u64 {
    if frame_count == 0 {
        0
    } else {
        (frame_count - 1) / interval + 1
    }
}

/// Convert a frame source into an XLSX file at `output`.
pub fn convert<S: FrameSource>(
    source: S,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    // Invalid options must not leave an empty file behind.
    options.validate()?;
    let workbook = WorkbookWriter::create(output)?;
    let (report, mut writer) = run(source, workbook, options)?;
    writer.flush()?;
    info!(output = %output.display(), "wrote xlsx file");
    Ok(report)
}

/// Convert into an arbitrary writer; returns the writer alongside the
/// report so in-memory callers can get their buffer back.
pub fn convert_to_writer<S: FrameSource, W: Write + Seek>(
    source: S,
    writer: W,
    options: &ConvertOptions,
) -> Result<(ConvertReport, W), ConvertError> {
    run(source, WorkbookWriter::new(writer), options)
}

fn run<S: FrameSource, W: Write + Seek>(
    source: S,
    mut workbook: WorkbookWriter<W>,
    options: &ConvertOptions,
) -> Result<(ConvertReport, W), ConvertError> {
    options.validate()?;

    let guard = CapacityGuard::new();
    let mut sampler = FrameSampler::new(source, options.frame_interval);

    let projection = match sampler.frame_count() {
        Some(frames) => {
            let sheets = expected_sheets(frames, options.frame_interval);
            debug!(frames, expected_sheets = sheets, "input reports frame count");
            Some(guard.check_projection(sheets, options.colors as u64))
        }
        None => {
            debug!("input does not report a frame count; skipping capacity projection");
            None
        }
    };

    let mut registry: PaletteRegistry<FillId> = PaletteRegistry::new();
    let mut preview = options.preview.clone().map(FramePreview::new);

    let outcome = write_sheets(
        &mut sampler,
        &mut workbook,
        &mut registry,
        &mut preview,
        options,
    );

    // The document is finalized and the preview released on success and
    // failure alike; a mid-run error must not leak either resource.
    if let Some(p) = preview.take() {
        p.release();
    }
    let sheets_written = match outcome {
        Ok(sheets) => sheets,
        Err(err) => {
            // Best-effort finalize so completed sheets are not lost; the
            // run error is what callers see either way. A failure inside
            // an unfinished sheet cannot be finalized and falls through
            // to dropping the writer.
            let _ = workbook.close();
            return Err(err);
        }
    };
    let writer = workbook.close()?;

    let actual = guard.check_actual(registry.len() as u64);
    info!(
        sheets = sheets_written,
        distinct_colors = registry.len(),
        "conversion complete"
    );

    Ok((
        ConvertReport {
            frames_decoded: sampler.frames_read(),
            sheets_written,
            distinct_colors: registry.len(),
            projection,
            actual,
        },
        writer,
    ))
}

fn write_sheets<S: FrameSource, W: Write + Seek>(
    sampler: &mut FrameSampler<S>,
    workbook: &mut WorkbookWriter<W>,
    registry: &mut PaletteRegistry<FillId>,
    preview: &mut Option<FramePreview>,
    options: &ConvertOptions,
) -> Result<u64, ConvertError> {
    let quantize_opts = QuantizeOptions {
        colors: options.colors,
        seed: options.seed,
        ..Default::default()
    };

    let mut sheets = 0u64;
    while let Some(Sample { index, frame }) = sampler.next_sample()? {
        info!(frame = index, "processing frame");
        debug!(palette_size = registry.len(), "palette registry size");

        let frame = frame.resize(options.grid_width, options.grid_height, options.filter);
        let quantized = quantize(&frame, &quantize_opts)?;

        // One registry lookup per palette entry, not one per pixel.
        let styles: Vec<FillId> = quantized
            .palette()
            .iter()
            .map(|&color| {
                registry.resolve(ColorKey::from(color), || workbook.add_fill_style(color))
            })
            .collect();

        let mut sheet = workbook.add_sheet(&index.to_string())?;
        sheet.set_zoom(options.zoom)?;
        sheet.set_column_width(0, options.grid_width - 1, options.column_width)?;
        sheet.set_row_height(options.row_height);
        for row in 0..options.grid_height {
            for col in 0..options.grid_width {
                sheet.write_blank(row, col, styles[quantized.label(row, col) as usize])?;
            }
        }
        sheet.finish()?;

        if let Some(p) = preview.as_mut() {
            p.render(&quantized)?;
        }
        sheets += 1;
    }

    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidsheet_core::Rgb;
    use vidsheet_video::Result as VideoResult;

    /// Source yielding a fixed number of tiny solid frames.
    struct SolidSource {
        remaining: u64,
        total: Option<u64>,
        color: Rgb,
    }

    impl SolidSource {
        fn new(frames: u64) -> Self {
            SolidSource {
                remaining: frames,
                total: Some(frames),
                color: Rgb::new(40, 40, 40),
            }
        }
    }

    impl FrameSource for SolidSource {
        fn frame_count(&self) -> Option<u64> {
            self.total
        }

        fn next_frame(&mut self) -> VideoResult<Option<Frame>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            let c = self.color;
            Ok(Some(
                Frame::from_rgb24(1, 1, vec![c.r, c.g, c.b]).expect("1x1 buffer"),
            ))
        }
    }

    fn sampled_indices(frames: u64, interval: u64) -> Vec<u64> {
        let mut sampler = FrameSampler::new(SolidSource::new(frames), interval);
        let mut indices = Vec::new();
        while let Some(sample) = sampler.next_sample().unwrap() {
            indices.push(sample.index);
        }
        indices
    }

    #[test]
    fn test_sampler_picks_every_nth_index() {
        assert_eq!(sampled_indices(7, 3), vec![0, 3, 6]);
        assert_eq!(sampled_indices(90, 30), vec![0, 30, 60]);
        assert_eq!(sampled_indices(5, 1), vec![0, 1, 2, 3, 4]);
        assert_eq!(sampled_indices(0, 3), Vec::<u64>::new());
        // A single frame is always sampled
        assert_eq!(sampled_indices(1, 1000), vec![0]);
    }

    #[test]
    fn test_sampler_counts_every_decoded_frame() {
        let mut sampler = FrameSampler::new(SolidSource::new(10), 4);
        while sampler.next_sample().unwrap().is_some() {}
        assert_eq!(sampler.frames_read(), 10);
    }

    #[test]
    fn test_expected_sheets_matches_ceil() {
        assert_eq!(expected_sheets(0, 30), 0);
        assert_eq!(expected_sheets(1, 30), 1);
        assert_eq!(expected_sheets(90, 30), 3);
        assert_eq!(expected_sheets(91, 30), 4);
        assert_eq!(expected_sheets(30, 30), 1);
        assert_eq!(expected_sheets(31, 30), 2);
    }

    #[test]
    fn test_options_validated() {
        let mut options = ConvertOptions::new(0, 30);
        assert!(matches!(
            options.validate(),
            Err(ConvertError::Options(_))
        ));
        options.colors = 4;
        options.frame_interval = 0;
        assert!(matches!(
            options.validate(),
            Err(ConvertError::Options(_))
        ));
        options.frame_interval = 30;
        assert!(options.validate().is_ok());
    }

    proptest::proptest! {
        /// Sheets produced always equals ceil(L / F).
        #[test]
        fn prop_sample_count_is_ceil(frames in 0u64..200, interval in 1u64..20) {
            let count = sampled_indices(frames, interval).len() as u64;
            let ceil = (frames + interval - 1) / interval;
            proptest::prop_assert_eq!(count, ceil);
        }
    }
}

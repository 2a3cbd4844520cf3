//! Clustering-based color quantization
//!
//! Each frame is quantized independently: pixels are mapped to Oklab,
//! k-means picks up to K representative colors, and every pixel is
//! labeled with its nearest representative. No palette state survives
//! from one frame to the next.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::oklab::Oklab;

/// Iteration cutoff when centroids stop moving (squared Oklab distance).
const CONVERGENCE_EPSILON: f32 = 1e-6;

/// Options controlling one quantization pass.
#[derive(Debug, Clone)]
pub struct QuantizeOptions {
    /// Target palette size K. The effective cluster count may come out
    /// lower on frames with fewer distinct colors; that result is
    /// accepted as-is.
    pub colors: usize,
    /// Upper bound on Lloyd iterations.
    pub max_iterations: usize,
    /// Cap on the number of pixels the centroids are fitted on. Labeling
    /// always covers the full frame; fitting on a sample keeps the cost
    /// independent of raster size.
    pub sample_size: usize,
    /// Fixed RNG seed for the centroid initialization. `None` seeds from
    /// entropy, so repeated runs may pick slightly different
    /// representatives for identical input.
    pub seed: Option<u64>,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        QuantizeOptions {
            colors: 16,
            max_iterations: 16,
            sample_size: 16_384,
            seed: None,
        }
    }
}

impl QuantizeOptions {
    /// Options for a K-color quantization with default tuning.
    pub fn with_colors(colors: usize) -> Self {
        QuantizeOptions {
            colors,
            ..Default::default()
        }
    }

    /// Fix the RNG seed for reproducible palettes.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A frame reduced to a bounded palette.
///
/// Same dimensions as the input frame; `labels` holds one palette index
/// per pixel in row-major order. Callers that need one style per distinct
/// color should walk `palette()` once rather than every pixel.
#[derive(Debug, Clone)]
pub struct QuantizedFrame {
    width: u32,
    height: u32,
    palette: Vec<Rgb>,
    labels: Vec<u32>,
}

impl QuantizedFrame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The representative colors, at most K entries.
    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Palette index of the pixel at (row, col).
    pub fn label(&self, row: u32, col: u32) -> u32 {
        self.labels[row as usize * self.width as usize + col as usize]
    }

    /// Quantized color of the pixel at (row, col).
    pub fn color(&self, row: u32, col: u32) -> Rgb {
        self.palette[self.label(row, col) as usize]
    }
}

/// Quantize one frame to at most `opts.colors` representative colors.
pub fn quantize(frame: &Frame, opts: &QuantizeOptions) -> Result<QuantizedFrame> {
    if opts.colors == 0 {
        return Err(Error::ZeroColors);
    }

    let pixels: Vec<Oklab> = frame.pixels().map(Oklab::from_rgb).collect();
    let k = opts.colors.min(pixels.len());

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let centroids = fit_centroids(&pixels, k, opts, &mut rng);

    let labels: Vec<u32> = pixels
        .iter()
        .map(|&p| nearest(&centroids, p) as u32)
        .collect();
    let palette: Vec<Rgb> = centroids.iter().map(|&c| c.to_rgb()).collect();

    Ok(QuantizedFrame {
        width: frame.width(),
        height: frame.height(),
        palette,
        labels,
    })
}

/// Lloyd's algorithm over a bounded training sample.
///
/// Initialization draws k random pixels from the sample. A cluster that
/// loses all members keeps its previous centroid, so a frame with fewer
/// distinct colors than k simply yields duplicate representatives.
fn fit_centroids(
    pixels: &[Oklab],
    k: usize,
    opts: &QuantizeOptions,
    rng: &mut StdRng,
) -> Vec<Oklab> {
    let sample_size = opts.sample_size.max(1);
    let training: Vec<Oklab> = if pixels.len() <= sample_size {
        pixels.to_vec()
    } else {
        (0..sample_size)
            .map(|_| pixels[rng.gen_range(0..pixels.len())])
            .collect()
    };

    let mut centroids: Vec<Oklab> = (0..k)
        .map(|_| training[rng.gen_range(0..training.len())])
        .collect();

    let mut sums = vec![(0.0f64, 0.0f64, 0.0f64); k];
    let mut counts = vec![0usize; k];

    for iteration in 0..opts.max_iterations {
        sums.iter_mut().for_each(|s| *s = (0.0, 0.0, 0.0));
        counts.iter_mut().for_each(|c| *c = 0);

        for &p in &training {
            let i = nearest(&centroids, p);
            sums[i].0 += p.l as f64;
            sums[i].1 += p.a as f64;
            sums[i].2 += p.b as f64;
            counts[i] += 1;
        }

        let mut moved = 0.0f32;
        for i in 0..k {
            if counts[i] == 0 {
                continue;
            }
            let n = counts[i] as f64;
            let next = Oklab::new(
                (sums[i].0 / n) as f32,
                (sums[i].1 / n) as f32,
                (sums[i].2 / n) as f32,
            );
            moved = moved.max(next.distance_squared(centroids[i]));
            centroids[i] = next;
        }

        if moved < CONVERGENCE_EPSILON {
            trace!(iteration, "k-means converged");
            break;
        }
    }

    centroids
}

/// Index of the centroid closest to `p`.
fn nearest(centroids: &[Oklab], p: Oklab) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, &c) in centroids.iter().enumerate() {
        let d = p.distance_squared(c);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

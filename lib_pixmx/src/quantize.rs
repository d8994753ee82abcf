use std::collections::HashMap;

use log::debug;
use thiserror::Error;

use crate::codec::format::{MAX_PALETTE_COLORS, MAX_PIXEL_POSITIONS};
use crate::constants::COLOR_FUZZ;

/// An RGB color; one byte per channel.
pub type Color = [u8; 3];

/// One entry per scanned pixel: its row-major offset and its palette slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub position: u32,
    pub palette_index: u16,
}

/// Deduplicated palette plus one index record per source pixel, in scan order.
#[derive(Debug)]
pub struct Quantization {
    pub palette: Vec<Color>,
    pub records: Vec<IndexRecord>,
}

#[derive(Error, Debug)]
pub enum QuantizeError {
    #[error("invalid pixel data length: expected {expected} bytes for {width}x{height} at {channels} channels, got {actual}")]
    InvalidPixelDataLength {
        width: u32,
        height: u32,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("pixel format has {0} channels, at least 3 are required")]
    TooFewChannels(usize),
    #[error("palette overflow: image needs more than {0} distinct colors")]
    PaletteOverflow(usize),
    #[error("pixel count {0} exceeds the {1}-position format limit")]
    TooManyPixels(u64, u32),
}

/// How the quantizer searches the palette for a fuzzy match.
///
/// Both policies return the earliest-inserted matching entry, so they produce
/// identical palettes and records for identical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// First-fit scan over the palette in insertion order.
    LinearScan,
    /// Hash lookup over quantized channel buckets.
    BucketIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct QuantizerConfig {
    pub fuzz: f32,
    pub max_colors: usize,
    pub policy: MatchPolicy,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            fuzz: COLOR_FUZZ,
            max_colors: MAX_PALETTE_COLORS,
            policy: MatchPolicy::BucketIndex,
        }
    }
}

/// Relative difference of two channel values against their average.
///
/// Two zero channels compare as no difference.
pub fn percent_difference(a: f32, b: f32) -> f32 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    (a - b).abs() / ((a + b) * 0.5)
}

/// Two colors are equal when every channel pair stays strictly under `fuzz`.
pub fn color_equals(a: Color, b: Color, fuzz: f32) -> bool {
    percent_difference(f32::from(a[0]), f32::from(b[0])) < fuzz
        && percent_difference(f32::from(a[1]), f32::from(b[1])) < fuzz
        && percent_difference(f32::from(a[2]), f32::from(b[2])) < fuzz
}

const BUCKET_WIDTH: u8 = 16;

/// Palette indices grouped by quantized channel cell. Candidate cells within
/// `reach` of a color's own cell cover every entry its tolerance window can
/// match; candidates are tested in insertion order to keep first-fit
/// semantics.
struct BucketIndexMap {
    cells: HashMap<[u8; 3], Vec<u16>>,
    reach: i32,
}

impl BucketIndexMap {
    fn new(fuzz: f32) -> Self {
        // Widest in-tolerance channel gap: |a - b| < fuzz/2 * (a + b),
        // maximized at a = 255.
        let max_gap = 255.0 * 2.0 * fuzz / (2.0 - fuzz).max(f32::EPSILON);
        let reach = ((max_gap / f32::from(BUCKET_WIDTH)).ceil() as i32).clamp(1, 16);
        Self {
            cells: HashMap::new(),
            reach,
        }
    }

    fn cell_of(color: Color) -> [u8; 3] {
        [
            color[0] / BUCKET_WIDTH,
            color[1] / BUCKET_WIDTH,
            color[2] / BUCKET_WIDTH,
        ]
    }

    fn find(&self, color: Color, palette: &[Color], fuzz: f32) -> Option<u16> {
        let cell = Self::cell_of(color);
        let mut candidates: Vec<u16> = Vec::new();

        for dr in -self.reach..=self.reach {
            for dg in -self.reach..=self.reach {
                for db in -self.reach..=self.reach {
                    let key = [
                        i32::from(cell[0]) + dr,
                        i32::from(cell[1]) + dg,
                        i32::from(cell[2]) + db,
                    ];
                    if key.iter().any(|&c| !(0..=0xFF / i32::from(BUCKET_WIDTH)).contains(&c)) {
                        continue;
                    }
                    if let Some(entries) =
                        self.cells.get(&[key[0] as u8, key[1] as u8, key[2] as u8])
                    {
                        candidates.extend_from_slice(entries);
                    }
                }
            }
        }

        candidates.sort_unstable();
        candidates
            .into_iter()
            .find(|&index| color_equals(color, palette[index as usize], fuzz))
    }

    fn insert(&mut self, color: Color, index: u16) {
        self.cells.entry(Self::cell_of(color)).or_default().push(index);
    }
}

/// Walks `pixels` in row-major order, deduplicating colors under the fuzzy
/// equality of [`color_equals`] and emitting one [`IndexRecord`] per pixel.
///
/// The alpha channel, if present, is read over but never stored.
///
/// # Errors
///
/// - [`QuantizeError::TooFewChannels`] for buffers without a full RGB triple
/// - [`QuantizeError::InvalidPixelDataLength`] when the buffer does not match
///   `width * height * channels`
/// - [`QuantizeError::TooManyPixels`] past the 3-byte position limit
/// - [`QuantizeError::PaletteOverflow`] past `config.max_colors`
pub fn quantize(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    config: &QuantizerConfig,
) -> Result<Quantization, QuantizeError> {
    if channels < 3 {
        return Err(QuantizeError::TooFewChannels(channels));
    }

    let pixel_count = u64::from(width) * u64::from(height);
    if pixel_count > u64::from(MAX_PIXEL_POSITIONS) {
        return Err(QuantizeError::TooManyPixels(pixel_count, MAX_PIXEL_POSITIONS));
    }

    let expected = pixel_count as usize * channels;
    if pixels.len() != expected {
        return Err(QuantizeError::InvalidPixelDataLength {
            width,
            height,
            channels,
            expected,
            actual: pixels.len(),
        });
    }

    let max_colors = config.max_colors.min(MAX_PALETTE_COLORS);
    let mut palette: Vec<Color> = Vec::new();
    let mut records = Vec::with_capacity(pixel_count as usize);
    let mut buckets = match config.policy {
        MatchPolicy::BucketIndex => Some(BucketIndexMap::new(config.fuzz)),
        MatchPolicy::LinearScan => None,
    };

    for y in 0..height {
        for x in 0..width {
            let position = y * width + x;
            let offset = position as usize * channels;
            let color = [pixels[offset], pixels[offset + 1], pixels[offset + 2]];

            let found = match &buckets {
                Some(index_map) => index_map.find(color, &palette, config.fuzz),
                None => palette
                    .iter()
                    .position(|&entry| color_equals(color, entry, config.fuzz))
                    .map(|index| index as u16),
            };

            let palette_index = match found {
                Some(index) => index,
                None => {
                    if palette.len() >= max_colors {
                        return Err(QuantizeError::PaletteOverflow(max_colors));
                    }
                    let index = palette.len() as u16;
                    palette.push(color);
                    if let Some(index_map) = &mut buckets {
                        index_map.insert(color, index);
                    }
                    index
                }
            };

            records.push(IndexRecord {
                position,
                palette_index,
            });
        }
    }

    debug!(
        "quantized {} pixels into {} palette colors",
        records.len(),
        palette.len()
    );

    Ok(Quantization { palette, records })
}

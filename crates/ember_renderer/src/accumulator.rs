//! Running per-pixel radiance sums.

use ember_math::Color;

/// Per-pixel sum of radiance samples and the shared sample count.
///
/// The displayed value of a pixel is `sum / spp`: the plain mean of every
/// sample since the last [`Accumulator::clear`].
pub struct Accumulator {
    width: u32,
    height: u32,
    sums: Vec<Color>,
    spp: u32,
}

impl Accumulator {
    /// Create a zeroed accumulator.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sums: vec![Color::ZERO; width as usize * height as usize],
            spp: 0,
        }
    }

    /// Zero every sum and the sample count.
    pub fn clear(&mut self) {
        self.sums.fill(Color::ZERO);
        self.spp = 0;
    }

    /// Start a pass: bump the sample count, return `1 / spp`.
    pub fn begin_pass(&mut self) -> f32 {
        self.spp += 1;
        1.0 / self.spp as f32
    }

    /// Add `sample` into `slot`. Non-finite samples are dropped and reported
    /// by returning `false`.
    #[inline]
    pub fn accumulate(slot: &mut Color, sample: Color) -> bool {
        if !sample.is_finite() {
            return false;
        }
        *slot += sample;
        true
    }

    pub fn spp(&self) -> u32 {
        self.spp
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw sum at pixel index `idx`.
    pub fn sum(&self, idx: usize) -> Color {
        self.sums[idx]
    }

    /// Mean radiance at pixel index `idx` (zero before the first pass).
    pub fn mean(&self, idx: usize) -> Color {
        if self.spp == 0 {
            return Color::ZERO;
        }
        self.sums[idx] / self.spp as f32
    }

    pub fn sums(&self) -> &[Color] {
        &self.sums
    }

    pub(crate) fn sums_mut(&mut self) -> &mut [Color] {
        &mut self.sums
    }
}

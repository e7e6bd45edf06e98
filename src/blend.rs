//! Per-pixel linear blend of two RGB images into an opaque RGBA frame.

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Interpolation weight `P` in `[0, 1]`, held as the exact fraction `num / den`.
///
/// `P = 0` reproduces the first image, `P = 1` the second. Equality compares values, so `0/3`
/// equals [`MixRatio::ZERO`].
#[derive(Clone, Copy, Debug)]
pub struct MixRatio {
    num: u32,
    den: u32,
}

impl MixRatio {
    /// `P = 0`.
    pub const ZERO: Self = Self { num: 0, den: 1 };
    /// `P = 1`.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Create the ratio `num / den`, requiring `den > 0` and `num <= den`.
    pub fn new(num: u32, den: u32) -> CrossfadeResult<Self> {
        if den == 0 {
            return Err(CrossfadeError::validation(
                "mix ratio denominator must be > 0",
            ));
        }
        if num > den {
            return Err(CrossfadeError::validation(format!(
                "mix ratio {num}/{den} is greater than 1"
            )));
        }
        Ok(Self { num, den })
    }

    /// Ratio for frame `index` of `total_frames`: `index / (total_frames - 1)`.
    ///
    /// A single-frame run has no interval to divide, so it maps to `P = 0`. Indices past the last
    /// frame clamp to `P = 1`.
    pub fn for_frame(index: FrameIndex, total_frames: u32) -> Self {
        if total_frames <= 1 {
            return Self::ZERO;
        }
        let den = total_frames - 1;
        Self {
            num: index.0.min(den),
            den,
        }
    }

    pub fn numerator(self) -> u32 {
        self.num
    }

    pub fn denominator(self) -> u32 {
        self.den
    }

    /// The ratio as a float, for reporting.
    pub fn value(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl PartialEq for MixRatio {
    fn eq(&self, other: &Self) -> bool {
        u64::from(self.num) * u64::from(other.den) == u64::from(other.num) * u64::from(self.den)
    }
}

impl Eq for MixRatio {}

/// One frame of the crossfade: its index and derived mix ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSpec {
    pub index: FrameIndex,
    pub mix: MixRatio,
}

impl FrameSpec {
    pub fn new(index: FrameIndex, total_frames: u32) -> Self {
        Self {
            index,
            mix: MixRatio::for_frame(index, total_frames),
        }
    }
}

/// Blend `color` and `bw` into `out` with ratio `mix`.
///
/// Each output channel is `truncate(c * (1 - P) + b * P)` evaluated exactly; alpha is always 255.
/// Inputs must be [`PixelLayout::Rgb8`] and `out` must be [`PixelLayout::Rgba8`], all on the same
/// canvas. No pixel depends on another, so the visit order is irrelevant.
pub fn blend_into(
    color: &PixelBuffer,
    bw: &PixelBuffer,
    mix: MixRatio,
    out: &mut PixelBuffer,
) -> CrossfadeResult<()> {
    if color.layout() != PixelLayout::Rgb8 || bw.layout() != PixelLayout::Rgb8 {
        return Err(CrossfadeError::validation(
            "blend inputs must be packed RGB8 buffers",
        ));
    }
    if out.layout() != PixelLayout::Rgba8 {
        return Err(CrossfadeError::validation(
            "blend output must be a packed RGBA8 buffer",
        ));
    }
    if color.canvas() != bw.canvas() || color.canvas() != out.canvas() {
        return Err(CrossfadeError::validation(format!(
            "blend buffers must share one canvas: color {}x{}, second {}x{}, out {}x{}",
            color.width(),
            color.height(),
            bw.width(),
            bw.height(),
            out.width(),
            out.height()
        )));
    }

    let den = u64::from(mix.den);
    let take = u64::from(mix.num);
    let keep = den - take;

    for ((dst, c), b) in out
        .as_bytes_mut()
        .chunks_exact_mut(4)
        .zip(color.as_bytes().chunks_exact(3))
        .zip(bw.as_bytes().chunks_exact(3))
    {
        dst[0] = mix_channel(c[0], b[0], keep, take, den);
        dst[1] = mix_channel(c[1], b[1], keep, take, den);
        dst[2] = mix_channel(c[2], b[2], keep, take, den);
        dst[3] = 255;
    }
    Ok(())
}

/// Allocating form of [`blend_into`].
pub fn blend(color: &PixelBuffer, bw: &PixelBuffer, mix: MixRatio) -> CrossfadeResult<PixelBuffer> {
    let mut out = PixelBuffer::try_zeroed(color.canvas(), PixelLayout::Rgba8)?;
    blend_into(color, bw, mix, &mut out)?;
    Ok(out)
}

// keep + take == den, so the quotient never exceeds max(c, b).
#[inline]
fn mix_channel(c: u8, b: u8, keep: u64, take: u64, den: u64) -> u8 {
    ((u64::from(c) * keep + u64::from(b) * take) / den) as u8
}

#[cfg(test)]
#[path = "../tests/unit/blend.rs"]
mod tests;

//! Source image loading.

pub mod decode;

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::foundation::core::Canvas;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// The two read-only inputs of a crossfade: same canvas, both packed RGB8.
///
/// A pair is immutable once built and is shared by reference between worker threads.
#[derive(Clone, Debug)]
pub struct SourcePair {
    color: PixelBuffer,
    bw: PixelBuffer,
}

impl SourcePair {
    /// Pair two RGB8 buffers, rejecting differing dimensions.
    pub fn new(color: PixelBuffer, bw: PixelBuffer) -> CrossfadeResult<Self> {
        if color.layout() != PixelLayout::Rgb8 || bw.layout() != PixelLayout::Rgb8 {
            return Err(CrossfadeError::validation(
                "source images must be packed RGB8 buffers",
            ));
        }
        if color.canvas() != bw.canvas() {
            return Err(CrossfadeError::SizeMismatch {
                color_width: color.width(),
                color_height: color.height(),
                other_width: bw.width(),
                other_height: bw.height(),
            });
        }
        Ok(Self { color, bw })
    }

    /// The first image, shown at mix ratio 0.
    pub fn color(&self) -> &PixelBuffer {
        &self.color
    }

    /// The second image, shown at mix ratio 1.
    pub fn bw(&self) -> &PixelBuffer {
        &self.bw
    }

    pub fn canvas(&self) -> Canvas {
        self.color.canvas()
    }
}

use crate::foundation::core::Canvas;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Channel layout of a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Packed 8-bit RGB, 3 channels per pixel. Used for source images.
    Rgb8,
    /// Packed 8-bit straight-alpha RGBA, 4 channels per pixel. Used for produced frames.
    Rgba8,
}

impl PixelLayout {
    /// Channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Tightly packed, row-major 8-bit pixels.
///
/// Invariant: `data.len() == width * height * layout.channels()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    canvas: Canvas,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing bytes, validating the length invariant.
    pub fn from_raw(canvas: Canvas, layout: PixelLayout, data: Vec<u8>) -> CrossfadeResult<Self> {
        let expected = byte_len(canvas, layout)?;
        if data.len() != expected {
            return Err(CrossfadeError::validation(format!(
                "{layout:?} buffer for {}x{} must hold {expected} bytes, got {}",
                canvas.width,
                canvas.height,
                data.len()
            )));
        }
        Ok(Self {
            canvas,
            layout,
            data,
        })
    }

    /// Allocate a zeroed buffer, reporting allocation failure instead of aborting.
    pub fn try_zeroed(canvas: Canvas, layout: PixelLayout) -> CrossfadeResult<Self> {
        let len = byte_len(canvas, layout)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            CrossfadeError::allocation(format!(
                "failed to allocate {len} bytes for a {}x{} {layout:?} buffer: {e}",
                canvas.width, canvas.height
            ))
        })?;
        data.resize(len, 0);
        Ok(Self {
            canvas,
            layout,
            data,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Raw channel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Channel values of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let c = self.layout.channels();
        let start = (y as usize * self.canvas.width as usize + x as usize) * c;
        self.data.get(start..start + c)
    }
}

fn byte_len(canvas: Canvas, layout: PixelLayout) -> CrossfadeResult<usize> {
    (canvas.width as usize)
        .checked_mul(canvas.height as usize)
        .and_then(|px| px.checked_mul(layout.channels()))
        .ok_or_else(|| {
            CrossfadeError::allocation(format!(
                "{}x{} {layout:?} buffer size overflows usize",
                canvas.width, canvas.height
            ))
        })
}

#[cfg(test)]
#[path = "../tests/unit/buffer.rs"]
mod tests;

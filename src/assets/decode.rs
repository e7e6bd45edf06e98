use std::path::Path;

use crate::assets::SourcePair;
use crate::buffer::{PixelBuffer, PixelLayout};
use crate::foundation::core::Canvas;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Decode encoded image bytes (any format `image` recognizes) into packed RGB8.
///
/// Alpha, if present, is dropped.
pub fn decode_rgb(bytes: &[u8]) -> CrossfadeResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CrossfadeError::load(format!("decode image from memory: {e}")))?;
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let canvas = Canvas::new(width, height)?;
    PixelBuffer::from_raw(canvas, PixelLayout::Rgb8, rgb.into_raw())
}

/// Read and decode one image file into packed RGB8.
pub fn load_rgb(path: &Path) -> CrossfadeResult<PixelBuffer> {
    let bytes = std::fs::read(path)
        .map_err(|e| CrossfadeError::load(format!("read '{}': {e}", path.display())))?;
    decode_rgb(&bytes).map_err(|e| match e {
        CrossfadeError::Load(msg) => CrossfadeError::load(format!("'{}': {msg}", path.display())),
        other => other,
    })
}

/// Load both source images and check that their dimensions match.
#[tracing::instrument]
pub fn load_pair(color_path: &Path, bw_path: &Path) -> CrossfadeResult<SourcePair> {
    let color = load_rgb(color_path)?;
    let bw = load_rgb(bw_path)?;
    let pair = SourcePair::new(color, bw)?;
    tracing::debug!(
        width = pair.canvas().width,
        height = pair.canvas().height,
        "loaded source pair"
    );
    Ok(pair)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

use std::path::{Path, PathBuf};

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::encode::sink::{FrameSink, FrameTag};
use crate::foundation::core::UnitId;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Writes each frame as its own PNG file under `out_dir`.
///
/// File names carry the frame index and the producing unit:
/// `frame_007.png` (sequential), `frame_007_thread_2.png`, `frame_007_proc2.png`.
#[derive(Clone, Debug)]
pub struct PngSink {
    out_dir: PathBuf,
}

impl PngSink {
    /// Create the sink, creating `out_dir` if needed.
    pub fn new(out_dir: impl Into<PathBuf>) -> CrossfadeResult<Self> {
        let out_dir = out_dir.into();
        std::fs::create_dir_all(&out_dir).map_err(|e| {
            CrossfadeError::validation(format!(
                "failed to create output directory '{}': {e}",
                out_dir.display()
            ))
        })?;
        Ok(Self { out_dir })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Full output path for `tag`.
    pub fn path_for(&self, tag: FrameTag) -> PathBuf {
        self.out_dir.join(frame_file_name(tag))
    }
}

/// File name for a frame, unique per (index, unit).
pub fn frame_file_name(tag: FrameTag) -> String {
    let f = tag.index.0;
    match tag.unit {
        UnitId::Sequential => format!("frame_{f:03}.png"),
        UnitId::Thread(n) => format!("frame_{f:03}_thread_{n}.png"),
        UnitId::Process(n) => format!("frame_{f:03}_proc{n}.png"),
    }
}

impl FrameSink for PngSink {
    fn persist(&self, frame: &PixelBuffer, tag: FrameTag) -> CrossfadeResult<()> {
        if frame.layout() != PixelLayout::Rgba8 {
            return Err(CrossfadeError::write(format!(
                "frame {} is not RGBA8",
                tag.index.0
            )));
        }
        let path = self.path_for(tag);
        image::save_buffer_with_format(
            &path,
            frame.as_bytes(),
            frame.width(),
            frame.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| CrossfadeError::write(format!("write png '{}': {e}", path.display())))?;
        tracing::debug!(path = %path.display(), unit = %tag.unit, "wrote frame");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;

use std::sync::Mutex;

use crate::buffer::PixelBuffer;
use crate::foundation::core::{FrameIndex, UnitId};
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Identifies one persisted frame: which frame, produced by which unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTag {
    pub index: FrameIndex,
    pub unit: UnitId,
}

/// Consumer of produced RGBA frames.
///
/// Sinks are shared by reference across all units of a run, so `persist` takes `&self` and
/// implementations synchronize any internal state. The frame buffer is borrowed and is reused by
/// the caller as soon as `persist` returns.
///
/// An `Err` from `persist` is logged by the driver and never stops the unit; return
/// [`CrossfadeError::Write`] for such failures.
pub trait FrameSink: Send + Sync {
    /// Persist one frame.
    fn persist(&self, frame: &PixelBuffer, tag: FrameTag) -> CrossfadeResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &S {
    fn persist(&self, frame: &PixelBuffer, tag: FrameTag) -> CrossfadeResult<()> {
        (**self).persist(frame, tag)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Mutex<Vec<(FrameTag, PixelBuffer)>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured frames sorted by frame index.
    pub fn into_frames(self) -> CrossfadeResult<Vec<(FrameTag, PixelBuffer)>> {
        let mut frames = self
            .frames
            .into_inner()
            .map_err(|_| CrossfadeError::coordination("in-memory sink lock poisoned"))?;
        frames.sort_by_key(|(tag, _)| tag.index);
        Ok(frames)
    }

    /// Number of frames captured so far.
    pub fn len(&self) -> usize {
        self.frames.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameSink for InMemorySink {
    fn persist(&self, frame: &PixelBuffer, tag: FrameTag) -> CrossfadeResult<()> {
        self.frames
            .lock()
            .map_err(|_| CrossfadeError::write("in-memory sink lock poisoned"))?
            .push((tag, frame.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

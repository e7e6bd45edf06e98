use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Absolute 0-based frame index within a run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> CrossfadeResult<Self> {
        if width == 0 || height == 0 {
            return Err(CrossfadeError::validation(format!(
                "canvas dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels on the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

/// Identity of one execution unit.
///
/// Tags persisted frames so outputs from different units never collide.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum UnitId {
    /// The single unit of a sequential run.
    Sequential,
    /// A worker thread of the shared-memory driver.
    Thread(u32),
    /// A worker process of the distributed driver.
    Process(u32),
}

impl UnitId {
    /// 0-based index of the unit within its run.
    pub fn index(self) -> u32 {
        match self {
            Self::Sequential => 0,
            Self::Thread(n) | Self::Process(n) => n,
        }
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Thread(n) => write!(f, "thread {n}"),
            Self::Process(n) => write!(f, "process {n}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

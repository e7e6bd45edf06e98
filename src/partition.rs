//! Contiguous, balanced assignment of frame indices to execution units.

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Half-open slice `[start, start + count)` of frame indices owned by one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct WorkRange {
    /// First frame index of the slice.
    pub start: u32,
    /// Number of frames in the slice; may be zero.
    pub count: u32,
}

impl WorkRange {
    /// Exclusive end index; a range that runs past `u32::MAX` is rejected.
    pub fn end(self) -> CrossfadeResult<u32> {
        self.start.checked_add(self.count).ok_or_else(|| {
            CrossfadeError::validation(format!(
                "work range {}+{} overflows the frame index space",
                self.start, self.count
            ))
        })
    }

    pub fn is_empty(self) -> bool {
        self.count == 0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        f.0 >= self.start && f.0 - self.start < self.count
    }

    /// Frame indices in increasing order, stopping at `u32::MAX`.
    pub fn frames(self) -> impl Iterator<Item = FrameIndex> {
        (self.start..self.start.saturating_add(self.count)).map(FrameIndex)
    }
}

/// Compute the [`WorkRange`] of unit `unit_index` out of `unit_count` for `total_frames` frames.
///
/// Every unit gets `total_frames / unit_count` frames and the first `total_frames % unit_count`
/// units get one more. Ranges are laid out in unit order, so the ranges of all units cover
/// `[0, total_frames)` exactly once. Units past the last frame receive an empty range.
pub fn partition(
    total_frames: u32,
    unit_count: u32,
    unit_index: u32,
) -> CrossfadeResult<WorkRange> {
    if unit_count == 0 {
        return Err(CrossfadeError::validation("unit count must be >= 1"));
    }
    if unit_index >= unit_count {
        return Err(CrossfadeError::validation(format!(
            "unit index {unit_index} is out of range for {unit_count} units"
        )));
    }

    let base = total_frames / unit_count;
    let remainder = total_frames % unit_count;
    // u * base + min(u, remainder) <= total_frames, so no overflow in u32.
    let start = unit_index * base + unit_index.min(remainder);
    let count = base + u32::from(unit_index < remainder);
    Ok(WorkRange { start, count })
}

/// Ranges for every unit, in unit order.
pub fn partition_all(total_frames: u32, unit_count: u32) -> CrossfadeResult<Vec<WorkRange>> {
    (0..unit_count)
        .map(|u| partition(total_frames, unit_count, u))
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/partition.rs"]
mod tests;

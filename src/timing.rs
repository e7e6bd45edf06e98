//! Per-unit timing results and their reduction to a run-level report.

use crate::foundation::core::UnitId;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};
use crate::partition::WorkRange;

/// Outcome of one unit's pass over its [`WorkRange`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UnitResult {
    /// Unit that produced this result.
    pub unit: UnitId,
    /// Frames the unit was assigned.
    pub range: WorkRange,
    /// Wall-clock seconds spent in the frame loop, excluding setup.
    pub elapsed_secs: f64,
    /// Frames handed to the sink successfully.
    pub frames_written: u32,
    /// Frames whose persistence failed.
    pub frames_failed: u32,
}

/// Fold `items` with `op`, or `None` for an empty sequence.
///
/// This is the reduce step that runs after every unit has passed the end of its loop.
pub fn reduce<T, I, F>(items: I, op: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T, T) -> T,
{
    items.into_iter().reduce(op)
}

/// MAX of `elapsed_secs` across units: the completion time of the slowest unit.
pub fn reduce_max_elapsed<'a, I>(results: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a UnitResult>,
{
    reduce(results.into_iter().map(|r| r.elapsed_secs), f64::max)
}

/// Aggregated outcome of a whole run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    /// Total frames requested.
    pub total_frames: u32,
    /// Per-unit results, ordered by unit.
    pub units: Vec<UnitResult>,
    /// Slowest unit's elapsed seconds.
    pub max_elapsed_secs: f64,
    /// Frames persisted across all units.
    pub frames_written: u32,
    /// Frames that failed to persist across all units.
    pub frames_failed: u32,
}

impl RunReport {
    /// Reduce collected unit results into a report.
    pub fn from_units(total_frames: u32, mut units: Vec<UnitResult>) -> CrossfadeResult<Self> {
        let max_elapsed_secs = reduce_max_elapsed(&units)
            .ok_or_else(|| CrossfadeError::coordination("no unit results to aggregate"))?;
        units.sort_by_key(|u| u.unit);

        let frames_written = units.iter().map(|u| u.frames_written).sum();
        let frames_failed = units.iter().map(|u| u.frames_failed).sum();
        Ok(Self {
            total_frames,
            units,
            max_elapsed_secs,
            frames_written,
            frames_failed,
        })
    }

    /// Human-readable summary line.
    pub fn summary(&self) -> String {
        format!(
            "total time (max across units) = {:.6} s",
            self.max_elapsed_secs
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/timing.rs"]
mod tests;

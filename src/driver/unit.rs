use std::time::Instant;

use crate::assets::SourcePair;
use crate::blend::{FrameSpec, blend_into};
use crate::buffer::{PixelBuffer, PixelLayout};
use crate::encode::sink::{FrameSink, FrameTag};
use crate::foundation::core::{Canvas, UnitId};
use crate::foundation::error::{CrossfadeError, CrossfadeResult};
use crate::partition::WorkRange;
use crate::timing::UnitResult;

/// Everything one unit needs to produce its frames.
#[derive(Clone, Copy, Debug)]
pub struct UnitJob<'a> {
    /// Read-only inputs, possibly shared with other units.
    pub sources: &'a SourcePair,
    /// Frame count of the whole run; fixes every frame's mix ratio.
    pub total_frames: u32,
    /// Frames this unit owns.
    pub range: WorkRange,
    pub unit: UnitId,
}

/// Allocate a unit's private output buffer.
///
/// Each unit owns exactly one scratch buffer and reuses it for every frame it produces.
pub fn allocate_scratch(canvas: Canvas) -> CrossfadeResult<PixelBuffer> {
    PixelBuffer::try_zeroed(canvas, PixelLayout::Rgba8)
}

/// Produce every frame of `job.range` in increasing order and hand each to `sink`.
///
/// The returned `elapsed_secs` covers the frame loop only. A frame that fails to persist is
/// logged and counted; the loop continues with the next frame.
#[tracing::instrument(
    skip_all,
    fields(unit = %job.unit, start = job.range.start, count = job.range.count)
)]
pub fn run_unit(
    job: &UnitJob<'_>,
    scratch: &mut PixelBuffer,
    sink: &dyn FrameSink,
) -> CrossfadeResult<UnitResult> {
    if scratch.layout() != PixelLayout::Rgba8 || scratch.canvas() != job.sources.canvas() {
        return Err(CrossfadeError::validation(
            "unit scratch buffer must be RGBA8 on the source canvas",
        ));
    }
    let end = job.range.end()?;
    if end > job.total_frames {
        return Err(CrossfadeError::validation(format!(
            "work range ends at {end} but the run has {} frames",
            job.total_frames
        )));
    }

    let mut frames_written = 0u32;
    let mut frames_failed = 0u32;

    let t0 = Instant::now();
    for index in job.range.frames() {
        let spec = FrameSpec::new(index, job.total_frames);
        blend_into(job.sources.color(), job.sources.bw(), spec.mix, scratch)?;

        let tag = FrameTag {
            index,
            unit: job.unit,
        };
        match sink.persist(scratch, tag) {
            Ok(()) => {
                frames_written += 1;
                tracing::debug!(frame = index.0, mix = spec.mix.value(), "frame persisted");
            }
            Err(e) => {
                frames_failed += 1;
                tracing::warn!(
                    frame = index.0,
                    unit = %job.unit,
                    error = %e,
                    "failed to persist frame"
                );
            }
        }
    }
    let elapsed_secs = t0.elapsed().as_secs_f64();

    Ok(UnitResult {
        unit: job.unit,
        range: job.range,
        elapsed_secs,
        frames_written,
        frames_failed,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/driver/unit.rs"]
mod tests;

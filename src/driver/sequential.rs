use crate::assets::SourcePair;
use crate::driver::unit::{UnitJob, allocate_scratch, run_unit};
use crate::encode::sink::FrameSink;
use crate::foundation::core::UnitId;
use crate::foundation::error::CrossfadeResult;
use crate::partition::partition;
use crate::timing::RunReport;

/// Produce all `total_frames` frames on the calling thread.
pub fn run_sequential(
    sources: &SourcePair,
    total_frames: u32,
    sink: &dyn FrameSink,
) -> CrossfadeResult<RunReport> {
    let range = partition(total_frames, 1, 0)?;
    let mut scratch = allocate_scratch(sources.canvas())?;
    let job = UnitJob {
        sources,
        total_frames,
        range,
        unit: UnitId::Sequential,
    };
    let result = run_unit(&job, &mut scratch, sink)?;
    RunReport::from_units(total_frames, vec![result])
}

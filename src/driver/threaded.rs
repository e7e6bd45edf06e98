use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::SourcePair;
use crate::buffer::PixelBuffer;
use crate::driver::unit::{UnitJob, allocate_scratch, run_unit};
use crate::encode::sink::FrameSink;
use crate::foundation::core::UnitId;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};
use crate::partition::partition;
use crate::timing::{RunReport, UnitResult};

/// Produce all frames on a dedicated pool of `threads` worker threads.
///
/// Every pool thread is one unit: it derives its own range from its thread index, allocates its
/// own scratch buffer, waits at a shared start barrier, then runs the unit loop. The source pair is
/// read concurrently without locking. If any thread fails setup, all threads skip frame work and
/// the first setup error is returned.
///
/// `threads = None` uses rayon's default pool size.
pub fn run_threaded(
    sources: &SourcePair,
    total_frames: u32,
    sink: &dyn FrameSink,
    threads: Option<usize>,
) -> CrossfadeResult<RunReport> {
    let pool = build_thread_pool(threads)?;
    run_on_pool(&pool, total_frames, sink, |index, num_threads| {
        prepare_thread_unit(index, num_threads, total_frames, sources)
    })
}

/// Run one unit per pool thread. `prepare(index, num_threads)` is each thread's setup step.
fn run_on_pool<'a, P>(
    pool: &rayon::ThreadPool,
    total_frames: u32,
    sink: &dyn FrameSink,
    prepare: P,
) -> CrossfadeResult<RunReport>
where
    P: Fn(usize, usize) -> CrossfadeResult<(UnitJob<'a>, PixelBuffer)> + Sync,
{
    let barrier = Barrier::new(pool.current_num_threads());
    let setup_failed = AtomicBool::new(false);

    tracing::info!(
        threads = pool.current_num_threads(),
        frames = total_frames,
        "starting shared-memory run"
    );

    let outcomes = pool.broadcast(|ctx| -> CrossfadeResult<Option<UnitResult>> {
        let prepared = prepare(ctx.index(), ctx.num_threads());
        if prepared.is_err() {
            setup_failed.store(true, Ordering::SeqCst);
        }

        barrier.wait();
        if setup_failed.load(Ordering::SeqCst) {
            return prepared.map(|_| None);
        }

        let (job, mut scratch) = prepared?;
        run_unit(&job, &mut scratch, sink).map(Some)
    });

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        if let Some(result) = outcome? {
            results.push(result);
        }
    }
    RunReport::from_units(total_frames, results)
}

fn prepare_thread_unit(
    index: usize,
    num_threads: usize,
    total_frames: u32,
    sources: &SourcePair,
) -> CrossfadeResult<(UnitJob<'_>, PixelBuffer)> {
    let unit_index = to_u32(index, "thread index")?;
    let unit_count = to_u32(num_threads, "thread count")?;
    let range = partition(total_frames, unit_count, unit_index)?;
    let scratch = allocate_scratch(sources.canvas())?;
    Ok((
        UnitJob {
            sources,
            total_frames,
            range,
            unit: UnitId::Thread(unit_index),
        },
        scratch,
    ))
}

fn to_u32(n: usize, what: &str) -> CrossfadeResult<u32> {
    u32::try_from(n).map_err(|_| CrossfadeError::validation(format!("{what} {n} exceeds u32")))
}

fn build_thread_pool(threads: Option<usize>) -> CrossfadeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CrossfadeError::validation(
            "thread count must be >= 1",
        ));
    }

    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("crossfade-unit-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CrossfadeError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/driver/threaded.rs"]
mod tests;

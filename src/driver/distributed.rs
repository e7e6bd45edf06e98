use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::assets::decode::load_pair;
use crate::config::RunConfig;
use crate::driver::protocol::{ControlMsg, WorkerMsg, read_msg, write_msg};
use crate::driver::unit::{UnitJob, allocate_scratch, run_unit};
use crate::encode::sink::FrameSink;
use crate::foundation::core::UnitId;
use crate::foundation::error::{CrossfadeError, CrossfadeResult};
use crate::partition::partition;
use crate::timing::{RunReport, UnitResult};

/// How to launch one worker process.
///
/// The coordinator runs `program args... --rank <r> --size <n>` for every rank. The worker must
/// speak the coordination protocol on stdin/stdout (see [`run_worker`]); its stderr is inherited.
#[derive(Clone, Debug)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one base argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self, rank: u32, size: u32) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--rank")
            .arg(rank.to_string())
            .arg("--size")
            .arg(size.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd
    }
}

/// Rank and group size of one worker process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerRank {
    pub rank: u32,
    pub size: u32,
}

/// Coordinate `size` worker processes producing `total_frames` frames.
///
/// Workers load their own inputs and report ready; once every worker is ready the coordinator
/// releases them all at once and then collects one [`UnitResult`] per worker. A setup failure in
/// any worker, or any worker exiting early, aborts every worker and fails the run.
pub fn run_distributed(
    launch: &WorkerCommand,
    size: usize,
    total_frames: u32,
) -> CrossfadeResult<RunReport> {
    if size == 0 {
        return Err(CrossfadeError::validation("process count must be >= 1"));
    }
    let size = u32::try_from(size)
        .map_err(|_| CrossfadeError::validation(format!("process count {size} exceeds u32")))?;

    tracing::info!(
        procs = size,
        frames = total_frames,
        program = %launch.program.display(),
        "starting distributed run"
    );

    let mut group = WorkerGroup::default();
    for rank in 0..size {
        let spawned = launch.command(rank, size).spawn().map_err(|e| {
            CrossfadeError::coordination(format!(
                "failed to spawn worker {rank} ('{}'): {e}",
                launch.program.display()
            ))
        });
        match spawned.and_then(|child| WorkerHandle::new(rank, child)) {
            Ok(worker) => group.workers.push(worker),
            Err(e) => {
                group.abort();
                return Err(e);
            }
        }
    }

    let outcome = (|| -> CrossfadeResult<Vec<UnitResult>> {
        group.await_ready()?;
        group.broadcast(ControlMsg::Start)?;
        group.collect_done()
    })();

    match outcome {
        Ok(results) => {
            group.finish();
            RunReport::from_units(total_frames, results)
        }
        Err(e) => {
            tracing::error!(error = %e, "aborting all workers");
            group.abort();
            Err(e)
        }
    }
}

/// Worker side of a distributed run.
///
/// Loads its own copy of the inputs, allocates its scratch buffer, reports `ready` on `report`,
/// then blocks on `control` until the coordinator releases the start barrier. Setup failures are
/// reported to the coordinator before being returned.
pub fn run_worker<S, F, R, W>(
    config: &RunConfig,
    rank: WorkerRank,
    make_sink: F,
    control: &mut R,
    report: &mut W,
) -> CrossfadeResult<UnitResult>
where
    S: FrameSink,
    F: FnOnce() -> CrossfadeResult<S>,
    R: BufRead,
    W: Write,
{
    let prepared = (|| -> CrossfadeResult<(_, _, _, S)> {
        let range = partition(config.frames, rank.size, rank.rank)?;
        let sources = load_pair(&config.color_path, &config.bw_path)?;
        let scratch = allocate_scratch(sources.canvas())?;
        let sink = make_sink()?;
        Ok((range, sources, scratch, sink))
    })();

    let (range, sources, mut scratch, sink) = match prepared {
        Ok(p) => p,
        Err(e) => {
            let msg = WorkerMsg::SetupFailed {
                rank: rank.rank,
                message: e.to_string(),
            };
            let _ = write_msg(report, &msg);
            return Err(e);
        }
    };

    write_msg(report, &WorkerMsg::Ready { rank: rank.rank })?;
    match read_msg::<_, ControlMsg>(control)? {
        Some(ControlMsg::Start) => {}
        Some(ControlMsg::Abort) => {
            return Err(CrossfadeError::coordination(format!(
                "worker {} aborted before start",
                rank.rank
            )));
        }
        None => {
            return Err(CrossfadeError::coordination(format!(
                "worker {}: coordinator closed the control channel before start",
                rank.rank
            )));
        }
    }

    let job = UnitJob {
        sources: &sources,
        total_frames: config.frames,
        range,
        unit: UnitId::Process(rank.rank),
    };
    let result = run_unit(&job, &mut scratch, &sink)?;
    write_msg(report, &WorkerMsg::Done { result })?;
    Ok(result)
}

struct WorkerHandle {
    rank: u32,
    child: Child,
    control: Option<ChildStdin>,
    reports: BufReader<ChildStdout>,
}

impl WorkerHandle {
    fn new(rank: u32, mut child: Child) -> CrossfadeResult<Self> {
        let control = child.stdin.take();
        let reports = child.stdout.take();
        match (control, reports) {
            (Some(control), Some(reports)) => Ok(Self {
                rank,
                child,
                control: Some(control),
                reports: BufReader::new(reports),
            }),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                Err(CrossfadeError::coordination(format!(
                    "failed to open pipes to worker {rank} (unexpected)"
                )))
            }
        }
    }

    fn recv(&mut self) -> CrossfadeResult<WorkerMsg> {
        read_msg(&mut self.reports)?.ok_or_else(|| {
            CrossfadeError::coordination(format!("worker {} exited without reporting", self.rank))
        })
    }

    fn send(&mut self, msg: ControlMsg) -> CrossfadeResult<()> {
        let Some(control) = self.control.as_mut() else {
            return Err(CrossfadeError::coordination(format!(
                "control channel to worker {} is closed",
                self.rank
            )));
        };
        write_msg(control, &msg)
    }
}

/// Owns every spawned worker; dropping the group kills and reaps any still running.
#[derive(Default)]
struct WorkerGroup {
    workers: Vec<WorkerHandle>,
}

impl WorkerGroup {
    fn await_ready(&mut self) -> CrossfadeResult<()> {
        for w in &mut self.workers {
            match w.recv()? {
                WorkerMsg::Ready { rank } if rank == w.rank => {
                    tracing::debug!(rank, "worker ready");
                }
                WorkerMsg::SetupFailed { rank, message } => {
                    return Err(CrossfadeError::coordination(format!(
                        "worker {rank} failed during setup: {message}"
                    )));
                }
                other => {
                    return Err(CrossfadeError::coordination(format!(
                        "worker {} sent {other:?} before the start barrier",
                        w.rank
                    )));
                }
            }
        }
        Ok(())
    }

    fn broadcast(&mut self, msg: ControlMsg) -> CrossfadeResult<()> {
        for w in &mut self.workers {
            w.send(msg)?;
        }
        Ok(())
    }

    fn collect_done(&mut self) -> CrossfadeResult<Vec<UnitResult>> {
        let mut results = Vec::with_capacity(self.workers.len());
        for w in &mut self.workers {
            match w.recv()? {
                WorkerMsg::Done { result } if result.unit == UnitId::Process(w.rank) => {
                    results.push(result)
                }
                other => {
                    return Err(CrossfadeError::coordination(format!(
                        "worker {} sent {other:?} instead of its result",
                        w.rank
                    )));
                }
            }
        }
        Ok(results)
    }

    /// Close control channels and reap workers that completed normally.
    fn finish(&mut self) {
        for mut w in self.workers.drain(..) {
            drop(w.control.take());
            match w.child.wait() {
                Ok(status) if !status.success() => {
                    tracing::warn!(
                        rank = w.rank,
                        %status,
                        "worker exited unsuccessfully after reporting"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(rank = w.rank, error = %e, "failed to reap worker");
                }
            }
        }
    }

    /// Tell every worker to abort, then kill and reap all of them.
    fn abort(&mut self) {
        for mut w in self.workers.drain(..) {
            if let Some(mut control) = w.control.take() {
                let _ = write_msg(&mut control, &ControlMsg::Abort);
            }
            let _ = w.child.kill();
            let _ = w.child.wait();
        }
    }
}

impl Drop for WorkerGroup {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/distributed.rs"]
mod tests;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::foundation::error::{CrossfadeError, CrossfadeResult};

/// Frame count used when none (or a non-positive one) is requested.
pub const DEFAULT_FRAMES: u32 = 96;

/// Environment variable read for the shared-memory pool size.
pub const THREADS_ENV: &str = "CROSSFADE_THREADS";

/// Environment variable read for the distributed process count.
pub const PROCS_ENV: &str = "CROSSFADE_PROCS";

/// Inputs shared by every driver variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// First ("color") source image.
    pub color_path: PathBuf,
    /// Second ("black-and-white") source image.
    pub bw_path: PathBuf,
    /// Total frames to generate, >= 1.
    pub frames: u32,
    /// Directory that receives persisted frames.
    pub out_dir: PathBuf,
}

impl RunConfig {
    pub fn new(
        color_path: impl Into<PathBuf>,
        bw_path: impl Into<PathBuf>,
        frames: Option<i64>,
        out_dir: impl Into<PathBuf>,
    ) -> CrossfadeResult<Self> {
        Ok(Self {
            color_path: color_path.into(),
            bw_path: bw_path.into(),
            frames: normalize_frames(frames)?,
            out_dir: out_dir.into(),
        })
    }
}

/// Apply the frame-count default: unset or `<= 0` becomes [`DEFAULT_FRAMES`].
pub fn normalize_frames(requested: Option<i64>) -> CrossfadeResult<u32> {
    match requested {
        None => Ok(DEFAULT_FRAMES),
        Some(n) if n <= 0 => Ok(DEFAULT_FRAMES),
        Some(n) => u32::try_from(n).map_err(|_| {
            CrossfadeError::validation(format!(
                "frame count {n} exceeds the supported maximum of {}",
                u32::MAX
            ))
        }),
    }
}

/// Resolve the shared-memory pool size.
///
/// An explicit value wins, then [`THREADS_ENV`]. `None` leaves the choice to rayon.
pub fn resolve_threads(explicit: Option<usize>) -> CrossfadeResult<Option<usize>> {
    if let Some(n) = explicit {
        if n == 0 {
            return Err(CrossfadeError::validation("thread count must be >= 1"));
        }
        return Ok(Some(n));
    }
    Ok(positive_from_env(THREADS_ENV))
}

/// Resolve the distributed process count.
///
/// An explicit value wins, then [`PROCS_ENV`], then the machine's available parallelism.
pub fn resolve_procs(explicit: Option<usize>) -> CrossfadeResult<usize> {
    if let Some(n) = explicit {
        if n == 0 {
            return Err(CrossfadeError::validation("process count must be >= 1"));
        }
        return Ok(n);
    }
    Ok(positive_from_env(PROCS_ENV).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }))
}

fn positive_from_env(var: &str) -> Option<usize> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!(var, value = %raw, "ignoring invalid unit count in environment");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

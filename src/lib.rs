//! Crossfade frame generation.
//!
//! Produces an ordered sequence of frames that linearly blend a "color" image into a second image
//! of the same size. The same per-unit loop runs under three drivers:
//!
//! - [`run_sequential`]: one unit on the calling thread
//! - [`run_threaded`]: one unit per thread of a fixed rayon pool, sharing the read-only inputs
//! - [`run_distributed`] / [`run_worker`]: one unit per worker process, coordinated over pipes
//!
//! Frame ranges come from [`partition`]; every driver reports a [`RunReport`] whose
//! `max_elapsed_secs` is the slowest unit's frame-loop time.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod blend;
pub mod buffer;
pub mod config;
pub mod driver;
pub mod encode;
pub mod partition;
pub mod timing;

pub use crate::foundation::core::{Canvas, FrameIndex, UnitId};
pub use crate::foundation::error::{CrossfadeError, CrossfadeResult};

pub use crate::assets::SourcePair;
pub use crate::assets::decode::{decode_rgb, load_pair, load_rgb};
pub use crate::blend::{FrameSpec, MixRatio, blend, blend_into};
pub use crate::buffer::{PixelBuffer, PixelLayout};
pub use crate::config::{DEFAULT_FRAMES, RunConfig, normalize_frames};
pub use crate::driver::distributed::{WorkerCommand, WorkerRank, run_distributed, run_worker};
pub use crate::driver::sequential::run_sequential;
pub use crate::driver::threaded::run_threaded;
pub use crate::driver::unit::{UnitJob, allocate_scratch, run_unit};
pub use crate::encode::png::{PngSink, frame_file_name};
pub use crate::encode::sink::{FrameSink, FrameTag, InMemorySink};
pub use crate::partition::{WorkRange, partition, partition_all};
pub use crate::timing::{RunReport, UnitResult, reduce, reduce_max_elapsed};

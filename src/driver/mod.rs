//! Execution drivers.
//!
//! All variants run the same per-unit loop ([`unit::run_unit`]) and differ only in how units are
//! created, synchronized at the start barrier, and reduced at the end.

/// Multi-process variant: coordinator and worker sides.
pub mod distributed;
pub(crate) mod protocol;
/// Single-unit variant.
pub mod sequential;
/// Shared-memory variant on a fixed rayon pool.
pub mod threaded;
/// The per-unit frame loop shared by every variant.
pub mod unit;

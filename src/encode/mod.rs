//! Frame persistence.
//!
//! Drivers hand every produced frame to a [`sink::FrameSink`] tagged with its index and unit.

/// PNG-per-frame output.
pub mod png;
/// Sink trait and the in-memory sink.
pub mod sink;

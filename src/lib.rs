//! Buffered delivery of chronological sensor readings.
//!
//! Readings flow through two buffering layers before they reach a sink:
//!
//! ```text
//! readings --> [Streamer] --window batch--> [BatchAccumulator] --N batches--> [Sink]
//! ```
//!
//! The [`Streamer`] groups readings into fixed-duration windows and emits one
//! batch per completed window. The [`BatchAccumulator`] coalesces batches
//! until its capacity is reached, so the sink sees few, large writes.

pub mod accumulator;
pub mod batch;
pub mod config;
pub mod error;
pub mod list;
pub mod pipeline;
pub mod reading;
pub mod sink;
pub mod streamer;

#[cfg(test)]
mod list_test;
#[cfg(test)]
mod test_utils;

pub use accumulator::BatchAccumulator;
pub use batch::Batch;
pub use config::{BufferConfig, ConfigError};
pub use error::{Error, Interrupted, PartialWrite, Result};
pub use list::ImmutableList;
pub use pipeline::Source;
pub use reading::{CalibrationRead, GlucoseRead, GlucoseUnit};
pub use sink::{MemorySink, NullSink, Sink};
pub use streamer::Streamer;

use chrono::{DateTime, Utc};

/// A value that knows when it was measured.
///
/// This is the only thing the buffering layers ask of a reading: windows are
/// cut and ordering is preserved purely on this timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}

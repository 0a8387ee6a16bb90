//! Count-threshold batch accumulator
//!
//! Collects whole batches in a bounded buffer and hands them to the
//! underlying sink in one `write_batches` call once the buffer is full. A
//! failed downstream write keeps whatever the sink did not take at the front
//! of the buffer and makes the accumulator refuse further input: the error is
//! sticky and is returned from every later call.

use tracing::{debug, warn};

use crate::batch::Batch;
use crate::error::{Error, PartialWrite};
use crate::sink::Sink;

/// Buffer capacity used when zero is requested
pub const DEFAULT_CAPACITY: usize = 200;

/// Buffers batches and writes them downstream `capacity` at a time
#[derive(Debug)]
pub struct BatchAccumulator<T, S> {
    buf: Vec<Batch<T>>,
    capacity: usize,
    sink: S,
    err: Option<Error>,
}

impl<T, S> BatchAccumulator<T, S>
where
    T: Clone,
    S: Sink<T>,
{
    /// Wraps `sink` with a buffer of `capacity` batches.
    ///
    /// A capacity of zero falls back to [`DEFAULT_CAPACITY`].
    pub fn new(sink: S, capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };

        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            sink,
            err: None,
        }
    }

    /// Returns this accumulator able to buffer at least `capacity` batches.
    ///
    /// When the current capacity already suffices the accumulator comes back
    /// untouched. Otherwise its own buffer grows, buffered batches included;
    /// no second buffering layer is stacked on top.
    #[must_use]
    pub fn ensure_capacity(mut self, capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        if self.capacity >= capacity {
            return self;
        }

        debug!(from = self.capacity, to = capacity, "growing batch buffer");
        self.buf.reserve_exact(capacity - self.buf.len());
        self.capacity = capacity;
        self
    }

    /// Slots left before the next write triggers a flush
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Batches currently held
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The sticky error, if a downstream write has failed
    pub fn error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Unwraps the underlying sink. Buffered batches are dropped; call
    /// [`Sink::flush`] first.
    pub fn into_inner(self) -> S {
        self.sink
    }

    fn flush_buffer(&mut self) -> Result<(), Error> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.buf.is_empty() {
            return Ok(());
        }

        let expected = self.buf.len();
        let (written, err) = match self.sink.write_batches(&self.buf) {
            Ok(n) if n >= expected => {
                debug!(batches = expected, "flushed batch buffer");
                self.buf.clear();
                return Ok(());
            }
            Ok(n) => (
                n,
                Error::ShortWrite {
                    written: n,
                    expected,
                },
            ),
            Err(partial) => (partial.accepted.min(expected), partial.source),
        };

        warn!(
            written,
            expected,
            error = %err,
            "batch buffer flush failed"
        );
        self.buf.drain(..written);
        self.err = Some(err.clone());
        Err(err)
    }
}

impl<T, S> Sink<T> for BatchAccumulator<T, S>
where
    T: Clone,
    S: Sink<T>,
{
    fn write_batch(&mut self, batch: Batch<T>) -> Result<usize, PartialWrite> {
        if self.available() == 0 {
            self.flush_buffer()?;
        }
        if let Some(err) = &self.err {
            return Err(err.clone().into());
        }

        let len = batch.len();
        self.buf.push(batch);
        Ok(len)
    }

    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite> {
        let mut accepted = 0;
        let mut rest = batches;

        while rest.len() > self.available() && self.err.is_none() {
            let n = self.available();
            self.buf.extend_from_slice(&rest[..n]);
            // On failure the error is now sticky and ends the loop.
            let _ = self.flush_buffer();

            accepted += n;
            rest = &rest[n..];
        }
        if let Some(err) = &self.err {
            return Err(PartialWrite::new(accepted, err.clone()));
        }

        self.buf.extend_from_slice(rest);
        accepted += rest.len();
        Ok(accepted)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.flush_buffer()?;
        self.sink.flush()
    }
}

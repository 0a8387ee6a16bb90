//! Time-window streamer
//!
//! Groups a chronological stream of readings into fixed-duration windows and
//! writes each completed window to the sink as one batch. The open window is
//! an [`ImmutableList`], so taking a snapshot of it with [`Streamer::pending`]
//! is O(1) and unaffected by later writes.
//!
//! A window is `[start, start + duration)` where `start` is the first
//! reading's timestamp truncated to the duration. Crossing into a later window
//! flushes the current one; the last window of a stream is only written by
//! [`Streamer::flush`] or [`Streamer::close`].
//!
//! Readings must arrive in non-decreasing time order, within and across
//! calls. Out-of-order input is not detected and skews window boundaries.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::Timestamped;
use crate::batch::{self, Batch};
use crate::error::{Error, Interrupted, Result};
use crate::list::ImmutableList;
use crate::sink::Sink;

/// Seconds in the default window, one day
pub const DEFAULT_WINDOW_SECS: u64 = 86_400;

/// Buckets readings into time windows, one batch per window
pub struct Streamer<T, S> {
    window: ImmutableList<T>,
    window_start: Option<DateTime<Utc>>,
    sink: S,
    duration: TimeDelta,
    closed: bool,
}

impl<T, S> Streamer<T, S>
where
    T: Timestamped + Clone,
    S: Sink<T>,
{
    /// Creates an empty streamer writing `duration`-long windows to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] if `duration` is not positive.
    pub fn new(sink: S, duration: TimeDelta) -> Result<Self> {
        let duration = batch::check_window(duration)?;
        Ok(Self {
            window: ImmutableList::new(),
            window_start: None,
            sink,
            duration,
            closed: false,
        })
    }

    /// Writes a single reading.
    pub fn write_reading(&mut self, reading: T) -> Result<()> {
        self.write_readings(std::slice::from_ref(&reading))
            .map_err(Error::from)
    }

    /// Writes `readings`, oldest first.
    ///
    /// Every window boundary crossed along the way flushes exactly one batch,
    /// in input order. The window the last reading lands in stays open.
    ///
    /// # Errors
    ///
    /// Stops at the first failed flush. [`Interrupted::consumed`] counts the
    /// readings applied; the window that failed to flush is kept, so calling
    /// again with `&readings[consumed..]` resumes where this call stopped.
    pub fn write_readings(&mut self, readings: &[T]) -> std::result::Result<(), Interrupted> {
        if self.closed {
            return Err(Interrupted {
                consumed: 0,
                source: Error::Closed,
            });
        }

        for (consumed, reading) in readings.iter().enumerate() {
            self.push(reading)
                .map_err(|source| Interrupted { consumed, source })?;
        }
        Ok(())
    }

    fn push(&mut self, reading: &T) -> Result<()> {
        let time = reading.timestamp();
        match self.window_start {
            Some(start) if time - start < self.duration => {
                self.window = self.window.prepend(reading.clone());
                Ok(())
            }
            Some(_) => {
                self.flush()?;
                self.open(reading, time)
            }
            None => self.open(reading, time),
        }
    }

    fn open(&mut self, reading: &T, time: DateTime<Utc>) -> Result<()> {
        let start = batch::truncate(time, self.duration)?;
        self.window = ImmutableList::new().prepend(reading.clone());
        self.window_start = Some(start);
        Ok(())
    }

    /// Writes the open window, if any, as one batch.
    ///
    /// On failure the window stays open and intact.
    pub fn flush(&mut self) -> Result<()> {
        let Some(batch) = Batch::new(self.window.to_vec_ordered()) else {
            return Ok(());
        };

        let expected = batch.len();
        let start = self.window_start;
        match self.sink.write_batch(batch) {
            Ok(written) if written >= expected => {
                debug!(window_start = ?start, reads = written, "window flushed");
                self.window = ImmutableList::new();
                self.window_start = None;
                Ok(())
            }
            Ok(written) => {
                warn!(window_start = ?start, written, expected, "short window write");
                Err(Error::ShortWrite { written, expected })
            }
            Err(partial) => {
                warn!(
                    window_start = ?start,
                    accepted = partial.accepted,
                    error = %partial.source,
                    "window flush failed"
                );
                Err(partial.source)
            }
        }
    }

    /// Flushes the open window and then the sink itself.
    ///
    /// Anything left in an unflushed window is lost unless this is called at
    /// the end of a stream. Closing twice is a no-op; writing after close
    /// fails with [`Error::Closed`].
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.flush()?;
        self.sink.flush()?;
        self.closed = true;
        debug!("streamer closed");
        Ok(())
    }
}

impl<T, S> Streamer<T, S> {
    /// Snapshot of the open window, newest first
    pub fn pending(&self) -> ImmutableList<T> {
        self.window.clone()
    }

    /// Readings in the open window
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.window.len()
    }

    /// Start of the open window, `None` when no window is open
    #[inline]
    pub fn window_start(&self) -> Option<DateTime<Utc>> {
        self.window_start
    }

    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink. Writing through it bypasses the open
    /// window.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Unwraps the sink. The open window, if any, is dropped.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<T, S: Clone> Clone for Streamer<T, S> {
    fn clone(&self) -> Self {
        Self {
            window: self.window.clone(),
            window_start: self.window_start,
            sink: self.sink.clone(),
            duration: self.duration,
            closed: self.closed,
        }
    }
}

impl<T: std::fmt::Debug, S: std::fmt::Debug> std::fmt::Debug for Streamer<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Streamer")
            .field("window_start", &self.window_start)
            .field("pending", &self.window.len())
            .field("duration", &self.duration)
            .field("closed", &self.closed)
            .field("sink", &self.sink)
            .finish()
    }
}

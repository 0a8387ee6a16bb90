//! Shared fixtures for unit tests

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::batch::Batch;
use crate::error::{Error, PartialWrite};
use crate::reading::{GlucoseRead, GlucoseUnit};
use crate::sink::{MemorySink, Sink};

/// 2014-04-18T00:00:00Z
pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 4, 18, 0, 0, 0).unwrap()
}

/// `count` glucose readings `step` apart starting at `start`, valued by index
pub(crate) fn reads(start: DateTime<Utc>, count: usize, step: TimeDelta) -> Vec<GlucoseRead> {
    (0..count)
        .map(|i| GlucoseRead::new(start + step * i as i32, GlucoseUnit::MgPerDl, i as f32))
        .collect()
}

/// `count` day-long batches of 24 hourly readings, back to back from `t0()`
pub(crate) fn day_batches(count: usize) -> Vec<Batch<GlucoseRead>> {
    (0..count)
        .map(|day| {
            let start = t0() + TimeDelta::days(day as i64);
            Batch::new(reads(start, 24, TimeDelta::hours(1))).unwrap()
        })
        .collect()
}

/// Sink that misbehaves on demand, recording what it did accept
pub(crate) struct FlakySink<T> {
    pub inner: MemorySink<T>,
    /// Write calls that succeed before every later one fails
    pub healthy_writes: usize,
    /// Most batches taken by one successful call
    pub accept_limit: usize,
    /// Batches taken by a failing call before it errors
    pub accept_on_failure: usize,
    pub fail_flush: bool,
    calls: usize,
}

impl<T> FlakySink<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemorySink::new(),
            healthy_writes: usize::MAX,
            accept_limit: usize::MAX,
            accept_on_failure: 0,
            fail_flush: false,
            calls: 0,
        }
    }

    /// Fails every write after the first `n`
    pub(crate) fn failing_after(n: usize) -> Self {
        Self {
            healthy_writes: n,
            ..Self::new()
        }
    }

    /// Never takes more than `limit` batches per call
    pub(crate) fn short(limit: usize) -> Self {
        Self {
            accept_limit: limit,
            ..Self::new()
        }
    }

    pub(crate) fn heal(&mut self) {
        self.healthy_writes = usize::MAX;
    }
}

impl<T: Clone> Sink<T> for FlakySink<T> {
    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite> {
        self.calls += 1;
        if self.calls > self.healthy_writes {
            let n = batches.len().min(self.accept_on_failure);
            if n > 0 {
                self.inner.write_batches(&batches[..n])?;
            }
            return Err(PartialWrite::new(n, Error::sink("backend unavailable")));
        }

        let n = batches.len().min(self.accept_limit);
        self.inner.write_batches(&batches[..n])?;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Error> {
        if self.fail_flush {
            return Err(Error::sink("flush rejected"));
        }
        self.inner.flush()
    }
}

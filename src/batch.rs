//! Batches of readings and window arithmetic

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::error::{Error, Result};
use crate::Timestamped;

/// Ordered, non-empty group of readings destined for one downstream write
///
/// Readings are kept in the order they were supplied, which for every batch
/// produced by this crate is ascending time.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    reads: Vec<T>,
}

impl<T> Batch<T> {
    /// Wrap `reads`, or `None` when there is nothing to wrap
    pub fn new(reads: Vec<T>) -> Option<Self> {
        if reads.is_empty() {
            None
        } else {
            Some(Self { reads })
        }
    }

    #[inline]
    pub fn reads(&self) -> &[T] {
        &self.reads
    }

    #[inline]
    pub fn into_reads(self) -> Vec<T> {
        self.reads
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn first(&self) -> &T {
        &self.reads[0]
    }

    pub fn last(&self) -> &T {
        &self.reads[self.reads.len() - 1]
    }
}

impl<T: Timestamped> Batch<T> {
    /// Timestamp of the oldest reading
    pub fn start(&self) -> DateTime<Utc> {
        self.first().timestamp()
    }

    /// Timestamp of the newest reading
    pub fn end(&self) -> DateTime<Utc> {
        self.last().timestamp()
    }

    /// Start of the window this batch's first reading falls in
    pub fn window_start(&self, window: TimeDelta) -> Result<DateTime<Utc>> {
        truncate(self.start(), window)
    }
}

impl<T> AsRef<[T]> for Batch<T> {
    fn as_ref(&self) -> &[T] {
        &self.reads
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.reads.into_iter()
    }
}

/// Reject zero and negative window durations
pub fn check_window(window: TimeDelta) -> Result<TimeDelta> {
    if window <= TimeDelta::zero() {
        return Err(Error::InvalidWindow(window));
    }
    Ok(window)
}

/// Round `time` down to the nearest multiple of `window` since the Unix epoch
pub fn truncate(time: DateTime<Utc>, window: TimeDelta) -> Result<DateTime<Utc>> {
    let window = check_window(window)?;
    Ok(time.duration_trunc(window)?)
}

use tracing::{debug, warn};

use crate::Timestamped;
use crate::accumulator::BatchAccumulator;
use crate::config::BufferConfig;
use crate::error::Result;
use crate::sink::Sink;
use crate::streamer::Streamer;

/// Source of readings, typically a device or remote API being polled.
///
/// Each page must be in ascending time order and must not precede the
/// previous page.
pub trait Source<T> {
    /// Fetches the next page of readings, `None` once the source is drained.
    fn next_page(&mut self) -> Result<Option<Vec<T>>>;
}

/// Adapts an iterator of pages into a [`Source`]
#[derive(Debug, Clone)]
pub struct Pages<I>(I);

/// Wraps pages that are already in memory.
pub fn pages<T, I>(pages: I) -> Pages<I::IntoIter>
where
    I: IntoIterator<Item = Vec<T>>,
{
    Pages(pages.into_iter())
}

impl<T, I> Source<T> for Pages<I>
where
    I: Iterator<Item = Vec<T>>,
{
    fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        Ok(self.0.next())
    }
}

/// What a [`run`] pushed through the streamer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub readings: usize,
}

/// Builds the usual chain: a streamer windowing into an accumulator that
/// batches windows before they reach `sink`.
pub fn build<T, S>(sink: S, config: &BufferConfig) -> Result<Streamer<T, BatchAccumulator<T, S>>>
where
    T: Timestamped + Clone,
    S: Sink<T>,
{
    Streamer::new(BatchAccumulator::new(sink, config.capacity), config.window())
}

/// Drains `source` into `streamer`, then closes the streamer.
///
/// Stops at the first error. Readings written before the error stay with the
/// streamer and its sink; nothing is retried.
pub fn run<T, R, S>(source: &mut R, streamer: &mut Streamer<T, S>) -> Result<Summary>
where
    T: Timestamped + Clone,
    R: Source<T>,
    S: Sink<T>,
{
    let mut summary = Summary::default();

    while let Some(page) = source.next_page()? {
        if let Err(interrupted) = streamer.write_readings(&page) {
            warn!(
                page = summary.pages,
                consumed = interrupted.consumed,
                error = %interrupted.source,
                "page write interrupted"
            );
            return Err(interrupted.into());
        }

        summary.pages += 1;
        summary.readings += page.len();
        debug!(page = summary.pages, readings = page.len(), "page written");
    }

    streamer.close()?;
    Ok(summary)
}

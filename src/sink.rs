//! Sink capability
//!
//! A [`Sink`] is where batches end up: a datastore, a file, another buffering
//! layer. Every call goes through `&mut self`, so a sink that needs to swap
//! its internal state between writes does so in place and the same handle
//! stays authoritative for the next call.

use std::marker::PhantomData;

use crate::batch::Batch;
use crate::error::{Error, PartialWrite};

/// Destination for batches of readings.
///
/// Implementations are not expected to retry. Whatever error the backend
/// produces should be returned as [`Error::Sink`] and is handed to the caller
/// untouched.
pub trait Sink<T> {
    /// Writes a single batch.
    ///
    /// Returns the number of readings written.
    fn write_batch(&mut self, batch: Batch<T>) -> Result<usize, PartialWrite> {
        let len = batch.len();
        match self.write_batches(std::slice::from_ref(&batch)) {
            Ok(n) => Ok(n * len),
            Err(partial) => Err(PartialWrite::new(partial.accepted * len, partial.source)),
        }
    }

    /// Writes `batches` in order.
    ///
    /// Returns the number of batches accepted. Accepting fewer than
    /// `batches.len()` without an error is a short write.
    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite>;

    /// Makes everything written so far durable.
    fn flush(&mut self) -> Result<(), Error>;
}

impl<T, S: Sink<T> + ?Sized> Sink<T> for &mut S {
    fn write_batch(&mut self, batch: Batch<T>) -> Result<usize, PartialWrite> {
        (**self).write_batch(batch)
    }

    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite> {
        (**self).write_batches(batches)
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }
}

impl<T, S: Sink<T> + ?Sized> Sink<T> for Box<S> {
    fn write_batch(&mut self, batch: Batch<T>) -> Result<usize, PartialWrite> {
        (**self).write_batch(batch)
    }

    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite> {
        (**self).write_batches(batches)
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }
}

/// In-memory terminal sink
///
/// Keeps every batch it receives along with write and flush counters. Useful
/// for dry runs and for asserting on what a buffering layer emitted.
#[derive(Debug, Clone)]
pub struct MemorySink<T> {
    batches: Vec<Batch<T>>,
    total: usize,
    write_count: usize,
    flush_count: usize,
}

impl<T> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
            total: 0,
            write_count: 0,
            flush_count: 0,
        }
    }

    /// Batches received, in arrival order
    pub fn batches(&self) -> &[Batch<T>] {
        &self.batches
    }

    /// Total readings received
    pub fn total(&self) -> usize {
        self.total
    }

    /// Total batches received
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Number of write calls
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Number of flush calls
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Every reading received, flattened in arrival order
    pub fn reads(&self) -> impl Iterator<Item = &T> {
        self.batches.iter().flat_map(|batch| batch.reads())
    }
}

impl<T> Default for MemorySink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Sink<T> for MemorySink<T> {
    fn write_batch(&mut self, batch: Batch<T>) -> Result<usize, PartialWrite> {
        let len = batch.len();
        self.total += len;
        self.write_count += 1;
        self.batches.push(batch);
        Ok(len)
    }

    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite> {
        self.total += batches.iter().map(Batch::len).sum::<usize>();
        self.write_count += 1;
        self.batches.extend_from_slice(batches);
        Ok(batches.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.flush_count += 1;
        Ok(())
    }
}

/// Sink that accepts and drops everything
#[derive(Debug)]
pub struct NullSink<T>(PhantomData<fn(T)>);

impl<T> NullSink<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for NullSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sink<T> for NullSink<T> {
    fn write_batches(&mut self, batches: &[Batch<T>]) -> Result<usize, PartialWrite> {
        Ok(batches.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

//! Error types
//!
//! Errors are plain return values. Sink failures travel verbatim behind an
//! `Arc` so a buffered writer can hold on to them and report them again.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Result type for buffering and streaming operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type a sink implementation may report
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Buffering and streaming errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Downstream accepted less than it was handed, without an error
    #[error("short write: {written} of {expected} written")]
    ShortWrite {
        /// Units the sink reported as written
        written: usize,
        /// Units handed to the sink
        expected: usize,
    },

    /// Error reported by the sink itself
    #[error(transparent)]
    Sink(Arc<dyn StdError + Send + Sync>),

    /// Window duration is zero or negative
    #[error("invalid window duration: {0}")]
    InvalidWindow(chrono::TimeDelta),

    /// Timestamp could not be truncated to the window duration
    #[error("cannot truncate timestamp: {0}")]
    Truncate(#[from] chrono::RoundingError),

    /// Streamer was already closed
    #[error("streamer is closed")]
    Closed,
}

impl Error {
    /// Wrap an arbitrary sink error
    pub fn sink<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Sink(Arc::from(err.into()))
    }
}

/// A batch write that failed after part of the input was accepted
#[derive(Debug, Clone, Error)]
#[error("write failed after {accepted} accepted: {source}")]
pub struct PartialWrite {
    /// Units accepted before the failure (batches or reads, per call)
    pub accepted: usize,
    /// Underlying cause
    #[source]
    pub source: Error,
}

impl PartialWrite {
    pub fn new(accepted: usize, source: Error) -> Self {
        Self { accepted, source }
    }
}

impl From<Error> for PartialWrite {
    fn from(source: Error) -> Self {
        Self::new(0, source)
    }
}

impl From<PartialWrite> for Error {
    fn from(partial: PartialWrite) -> Self {
        partial.source
    }
}

/// A reading stream write that stopped at a failed window flush
///
/// The first `consumed` readings of the call were applied. The window that
/// failed to flush is still pending, so resubmitting `&readings[consumed..]`
/// resumes without loss.
#[derive(Debug, Clone, Error)]
#[error("stream interrupted after {consumed} readings: {source}")]
pub struct Interrupted {
    /// Readings of the call applied before the failure
    pub consumed: usize,
    /// Underlying cause
    #[source]
    pub source: Error,
}

impl From<Interrupted> for Error {
    fn from(interrupted: Interrupted) -> Self {
        interrupted.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ShortWrite {
            written: 3,
            expected: 10,
        };
        assert_eq!(err.to_string(), "short write: 3 of 10 written");

        let err = Error::sink("disk full");
        assert_eq!(err.to_string(), "disk full");

        let err = Error::Closed;
        assert!(err.to_string().contains("closed"));

        let err = PartialWrite::new(4, Error::sink("timeout"));
        assert!(err.to_string().contains("after 4 accepted"));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_sink_error_is_verbatim() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::sink(io);

        let Error::Sink(inner) = &err else {
            panic!("expected sink error, got {err:?}");
        };
        let io = inner
            .downcast_ref::<std::io::Error>()
            .expect("should keep the original error");
        assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_sticky_error_clone_shares_source() {
        let err = Error::sink("boom");
        let copy = err.clone();
        match (&err, &copy) {
            (Error::Sink(a), Error::Sink(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected sink errors"),
        }
    }

    #[test]
    fn test_interrupted_into_error() {
        let err: Error = Interrupted {
            consumed: 2,
            source: Error::Closed,
        }
        .into();
        assert!(matches!(err, Error::Closed));
    }
}

//! Seams to the outside world: point sources and label sinks.
//!
//! The engine consumes points through [`PointSource`] and optionally writes
//! cluster ids back through [`LabelSink`]. Both are narrow trait objects so
//! embedders can plug in whatever query layer or visualization channel they
//! have; the in-memory [`SliceSource`] and [`VecSink`] cover tests and
//! callers with fully materialized clouds.

use crate::error::Result;
use crate::types::{PointId, Position};

/// Streaming source of 3D points, consumed in bounded batches.
///
/// The engine calls [`reset`](Self::reset) once per run, then
/// [`next_batch`](Self::next_batch) until it returns `Ok(0)`. Sources must
/// be restartable so multiple runs can scan the same stream.
pub trait PointSource {
  /// Append up to one batch of points to `out`; return the count appended.
  /// `Ok(0)` signals end of iteration.
  fn next_batch(&mut self, out: &mut Vec<Position>) -> Result<usize>;

  /// Rewind to the start of the stream.
  fn reset(&mut self) -> Result<()>;

  /// Total point count, if the source knows it up front.
  fn size_hint(&self) -> Option<usize> {
    None
  }
}

/// Write-only per-point output channel (one byte per point).
///
/// The engine writes each point's cluster id exactly once, after the run
/// completes, and never reads back. Cluster ids above 255 are clamped to
/// 255 by the caller to fit the one-byte contract.
pub trait LabelSink {
  /// Store `label` for point `id`.
  fn write(&mut self, id: PointId, label: u8) -> Result<()>;
}

/// In-memory point source over an owned position buffer.
///
/// Yields points in order, `batch_size` at a time, mimicking the bounded
/// iteration of an external query buffer.
pub struct SliceSource {
  points: Vec<Position>,
  batch_size: usize,
  cursor: usize,
}

impl SliceSource {
  /// Default batch capacity, matching a typical query-buffer size.
  pub const DEFAULT_BATCH_SIZE: usize = 4096;

  /// Source over `points` with the default batch size.
  pub fn new(points: Vec<Position>) -> Self {
    Self::with_batch_size(points, Self::DEFAULT_BATCH_SIZE)
  }

  /// Source over `points` yielding at most `batch_size` per call.
  pub fn with_batch_size(points: Vec<Position>, batch_size: usize) -> Self {
    Self {
      points,
      batch_size: batch_size.max(1),
      cursor: 0,
    }
  }
}

impl PointSource for SliceSource {
  fn next_batch(&mut self, out: &mut Vec<Position>) -> Result<usize> {
    let end = (self.cursor + self.batch_size).min(self.points.len());
    let batch = &self.points[self.cursor..end];
    out.extend_from_slice(batch);
    self.cursor = end;
    Ok(batch.len())
  }

  fn reset(&mut self) -> Result<()> {
    self.cursor = 0;
    Ok(())
  }

  fn size_hint(&self) -> Option<usize> {
    Some(self.points.len())
  }
}

/// In-memory label sink backed by a `Vec<u8>`, grown on demand.
#[derive(Debug, Default)]
pub struct VecSink {
  labels: Vec<u8>,
}

impl VecSink {
  /// Empty sink.
  pub fn new() -> Self {
    Self::default()
  }

  /// Labels written so far, indexed by point id. Unwritten slots are 0.
  pub fn labels(&self) -> &[u8] {
    &self.labels
  }
}

impl LabelSink for VecSink {
  fn write(&mut self, id: PointId, label: u8) -> Result<()> {
    let idx = id as usize;
    if idx >= self.labels.len() {
      self.labels.resize(idx + 1, 0);
    }
    self.labels[idx] = label;
    Ok(())
  }
}

/// Point source that fails after a fixed number of batches.
///
/// Test double for exercising the engine's abort-on-stream-error path.
#[cfg(test)]
pub(crate) struct FailingSource {
  inner: SliceSource,
  batches_before_failure: usize,
  batches_served: usize,
}

#[cfg(test)]
impl FailingSource {
  pub(crate) fn new(points: Vec<Position>, batch_size: usize, batches_before_failure: usize) -> Self {
    Self {
      inner: SliceSource::with_batch_size(points, batch_size),
      batches_before_failure,
      batches_served: 0,
    }
  }
}

#[cfg(test)]
impl PointSource for FailingSource {
  fn next_batch(&mut self, out: &mut Vec<Position>) -> Result<usize> {
    if self.batches_served >= self.batches_before_failure {
      return Err(crate::error::ClusterError::Stream(
        "query buffer read failed".into(),
      ));
    }
    self.batches_served += 1;
    self.inner.next_batch(out)
  }

  fn reset(&mut self) -> Result<()> {
    self.batches_served = 0;
    self.inner.reset()
  }
}

#[cfg(test)]
#[path = "stream_test.rs"]
mod stream_test;

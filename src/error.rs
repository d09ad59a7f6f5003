//! Error types for clustering runs.

use thiserror::Error;

/// Result type alias for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Failure modes of a clustering run.
///
/// A run either completes fully or fails with one of these; a failed run
/// leaves the engine empty (`num_clusters() == 0`, no labels), never with a
/// partial labeling.
#[derive(Error, Debug)]
pub enum ClusterError {
  /// Rejected configuration (non-positive distance, candidate range < 1, ...).
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  /// The point source failed mid-iteration; the run aborts.
  #[error("point source error: {0}")]
  Stream(String),

  /// The label sink rejected a write during emission.
  #[error("label sink error: {0}")]
  Sink(String),

  /// A position maps to a cell coordinate outside the i32 domain.
  ///
  /// Reported explicitly instead of letting the key arithmetic wrap into a
  /// colliding cell.
  #[error("cell coordinate out of range for position ({x}, {y}, {z})")]
  CoordinateOutOfRange {
    /// World-space X of the offending point.
    x: f64,
    /// World-space Y of the offending point.
    y: f64,
    /// World-space Z of the offending point.
    z: f64,
  },

  /// The cancellation flag was observed during load or traversal.
  #[error("clustering run cancelled")]
  Cancelled,

  /// The stream yielded more points than `PointId` can address.
  #[error("point count {count} exceeds the supported maximum")]
  TooManyPoints {
    /// Number of points seen when the limit was hit.
    count: usize,
  },
}

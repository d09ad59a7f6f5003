//! Statistics from a clustering run.
//!
//! Returned by value from the extraction entry points; the engine keeps no
//! process-wide diagnostic state.

/// Counters accumulated over one clustering run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClusterStats {
  /// Points materialized from the source.
  pub points_loaded: usize,
  /// Batches consumed from the source during the load phase.
  pub batches_consumed: usize,
  /// Distinct non-empty clusters produced.
  pub clusters_found: usize,
  /// Worklist cells popped by the site-granularity traversal (counts
  /// repeat visits to already-drained cells).
  pub cells_visited: usize,
  /// Exact squared-distance tests performed by the point-granularity
  /// traversal.
  pub candidates_tested: usize,
}

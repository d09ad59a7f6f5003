//! Core value types for point-cloud clustering.

use glam::DVec3;

/// Index of a point in the input stream.
///
/// Assigned in arrival order starting at 0. The u32 domain caps a single
/// clustering run at ~4.3 billion points; exceeding it is reported as
/// [`ClusterError::TooManyPoints`](crate::ClusterError::TooManyPoints)
/// rather than wrapping.
pub type PointId = u32;

/// Cluster label assigned to a point.
///
/// Real labels start at 1; [`UNASSIGNED`] (0) marks a point no run has
/// labeled yet.
pub type ClusterId = u32;

/// Label value meaning "not yet assigned to any cluster".
pub const UNASSIGNED: ClusterId = 0;

/// World-space point position (double precision, like world coordinates
/// elsewhere in the stack).
pub type Position = DVec3;

/// Squared Euclidean distance between two positions.
///
/// All threshold comparisons in the cluster engine are done on squared
/// distances so no square root is taken on the hot path.
#[inline(always)]
pub fn distance_sq(a: Position, b: Position) -> f64 {
  a.distance_squared(b)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

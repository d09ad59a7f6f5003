//! Point-granularity flood fill with exact distance tests (the exact
//! variant).
//!
//! The front advances one point at a time. Candidates are gathered from the
//! grid within `candidate_range * D` of the front point and admitted by a
//! strict squared-distance comparison; points at exactly the boundary stay
//! out. Both the near branch (`< D²`) and the range branch
//! (`< (candidate_range*D)²`) admit and expand - the traversal therefore
//! finds connected components of the "distance < candidate_range * D"
//! graph, with the near branch guaranteeing the `D`-chained core is never
//! split.

use std::collections::VecDeque;

use crate::error::Result;
use crate::grid::{CellCoord, SpatialHashGrid};
use crate::types::{distance_sq, ClusterId, PointId, Position};

use super::config::ClusterConfig;
use super::engine::CancelCheck;
use super::stats::ClusterStats;

/// Squared thresholds for one exact-variant run.
#[derive(Clone, Copy, Debug)]
pub(super) struct ExactParams {
  /// `D²` - definitive membership.
  pub near_sq: f64,
  /// `(candidate_range * D)²` - candidate admission.
  pub range_sq: f64,
  /// `candidate_range * D` - grid gather radius.
  pub gather_radius: f64,
}

impl ExactParams {
  pub(super) fn from_config(config: &ClusterConfig) -> Self {
    let reach = config.candidate_radius();
    Self {
      near_sq: config.distance * config.distance,
      range_sq: reach * reach,
      gather_radius: reach,
    }
  }
}

/// Label every point in the grid by radius-tested flood fill.
///
/// Consumes the grid destructively. Fills `labels` (1-based) and returns
/// per-cluster point counts in label order (the engine sorts them for
/// emission).
pub(super) fn flood_fill(
  grid: &mut SpatialHashGrid,
  positions: &[Position],
  params: ExactParams,
  labels: &mut [ClusterId],
  cancel: &CancelCheck,
  stats: &mut ClusterStats,
) -> Result<Vec<usize>> {
  let mut sizes = Vec::new();
  let mut worklist: VecDeque<PointId> = VecDeque::new();
  let mut candidates = Vec::new();
  let mut label: ClusterId = 0;

  // Invariant: a point leaves the grid exactly when it is labeled, so
  // every live candidate is unlabeled and each id enters the worklist once
  while let Some((seed, seed_coord)) = grid.next_seed() {
    label += 1;
    let mut count = 0usize;

    grid.remove(seed_coord, seed);
    labels[seed as usize] = label;
    count += 1;
    worklist.push_back(seed);

    while let Some(p) = worklist.pop_front() {
      cancel.check()?;
      let p_pos = positions[p as usize];

      candidates.clear();
      grid.collect_neighborhood(p_pos, params.gather_radius, &mut candidates);

      for &c in &candidates {
        let c_pos = positions[c as usize];
        let d_sq = distance_sq(p_pos, c_pos);
        stats.candidates_tested += 1;

        // Strictly within D: definitively in the cluster. Strictly within
        // the candidate range: joins and keeps expanding the front. Both
        // branches admit; boundary-equal distances stay out.
        let admit = d_sq < params.near_sq || d_sq < params.range_sq;
        if !admit {
          continue;
        }

        let Some(c_coord) = CellCoord::from_position(c_pos, grid.spacing()) else {
          continue;
        };
        if !grid.remove(c_coord, c) {
          // Consumed since the gather; candidate lists can go stale
          continue;
        }
        labels[c as usize] = label;
        count += 1;
        worklist.push_back(c);
      }
    }

    sizes.push(count);
  }

  stats.clusters_found = sizes.len();
  Ok(sizes)
}

#[cfg(test)]
#[path = "exact_test.rs"]
mod exact_test;

//! Site-granularity flood fill (the fast variant).
//!
//! Expands cluster fronts one whole cell at a time: every live point in a
//! popped cell joins the current cluster in one step, and the front grows
//! through the 26-neighborhood of that cell. With `2*D` cells this merges
//! everything reachable through chains of adjacent occupied cells - a
//! deliberate approximation that can co-cluster points farther apart than
//! `D` when they share or bridge a cell, in exchange for skipping all
//! per-point distance tests.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::constants::NEIGHBOR_OFFSETS_26;
use crate::error::Result;
use crate::grid::{CellCoord, SpatialHashGrid};
use crate::types::ClusterId;

use super::engine::CancelCheck;
use super::stats::ClusterStats;

/// Label every point in the grid by cell-adjacency flood fill.
///
/// Consumes the grid destructively. Fills `labels` (1-based) and returns
/// per-cluster point counts in label order.
pub(super) fn flood_fill(
  grid: &mut SpatialHashGrid,
  labels: &mut [ClusterId],
  cancel: &CancelCheck,
  stats: &mut ClusterStats,
) -> Result<Vec<usize>> {
  let mut sizes = Vec::new();
  let mut worklist = VecDeque::new();
  let mut label: ClusterId = 0;

  // Each outer iteration opens one cluster from an arbitrary remaining seed
  while let Some((_, seed_coord)) = grid.next_seed() {
    label += 1;
    let mut count = 0usize;
    worklist.push_back(seed_coord);

    while let Some(coord) = worklist.pop_front() {
      cancel.check()?;
      stats.cells_visited += 1;

      let drained = grid.drain_site(coord);
      if drained.is_empty() {
        // Already consumed by this front; cells can be queued twice
        continue;
      }

      for id in drained {
        labels[id as usize] = label;
        count += 1;
      }

      let occupied: SmallVec<[CellCoord; 26]> = NEIGHBOR_OFFSETS_26
        .iter()
        .filter_map(|&(dx, dy, dz)| coord.offset(dx, dy, dz))
        .filter(|&n| grid.site(n).is_some_and(|site| !site.is_empty()))
        .collect();
      worklist.extend(occupied);
    }

    // The seed itself is always drained, so every opened cluster is
    // non-empty
    sizes.push(count);
  }

  stats.clusters_found = sizes.len();
  Ok(sizes)
}

#[cfg(test)]
#[path = "fast_test.rs"]
mod fast_test;

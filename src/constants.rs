//! Shared constants for grid sizing and flood-fill traversal.

/// Cell width as a multiple of the cluster distance threshold `D`.
///
/// A cell exactly `2*D` wide guarantees that any two points within `D` of
/// each other fall in the same or an immediately adjacent cell, so the
/// flood fill never has to look past the 26-neighborhood.
pub const CELL_SPACING_FACTOR: f64 = 2.0;

/// Default multiplier on the distance threshold used to gather expansion
/// candidates in the exact variant. A wider gather radius reduces repeated
/// boundary queries; the exact squared-distance test still decides
/// membership.
pub const DEFAULT_CANDIDATE_RANGE: f64 = 2.0;

/// Offsets to the 26 face, edge, and corner neighbors of a cell.
///
/// Full 26-connectivity is the traversal contract: with `2*D` cells, two
/// points within `D` can sit in diagonally adjacent cells, so face-only
/// expansion would split valid clusters.
pub const NEIGHBOR_OFFSETS_26: [(i32, i32, i32); 26] = [
  (-1, -1, -1),
  (-1, -1, 0),
  (-1, -1, 1),
  (-1, 0, -1),
  (-1, 0, 0),
  (-1, 0, 1),
  (-1, 1, -1),
  (-1, 1, 0),
  (-1, 1, 1),
  (0, -1, -1),
  (0, -1, 0),
  (0, -1, 1),
  (0, 0, -1),
  (0, 0, 1),
  (0, 1, -1),
  (0, 1, 0),
  (0, 1, 1),
  (1, -1, -1),
  (1, -1, 0),
  (1, -1, 1),
  (1, 0, -1),
  (1, 0, 0),
  (1, 0, 1),
  (1, 1, -1),
  (1, 1, 0),
  (1, 1, 1),
];

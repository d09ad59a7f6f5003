//! CellCoord - immutable value type identifying one cubic grid cell.
//!
//! The coordinate triple is used directly as the hash-map key, so the valid
//! range is the full i32 domain per axis and the "key" is trivially
//! reversible. Offsets use checked arithmetic; stepping off the edge of the
//! domain yields `None` instead of a wrapped, colliding coordinate.

use glam::DVec3;

use crate::types::Position;

/// Grid cell coordinate - immutable value type.
///
/// Obtained by dividing a world position by the per-axis cell spacing and
/// flooring. Two positions with equal floored quotients always map to the
/// same coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CellCoord {
  /// Cell X index.
  pub x: i32,
  /// Cell Y index.
  pub y: i32,
  /// Cell Z index.
  pub z: i32,
}

impl CellCoord {
  /// Create a coordinate from explicit cell indices.
  pub fn new(x: i32, y: i32, z: i32) -> Self {
    Self { x, y, z }
  }

  /// Map a world position into the grid.
  ///
  /// Returns `None` when any floored quotient falls outside the i32 domain
  /// (callers surface this as a hard error rather than clustering into a
  /// wrong cell).
  pub fn from_position(pos: Position, spacing: DVec3) -> Option<Self> {
    let cell = (pos / spacing).floor();

    let in_range =
      |v: f64| -> bool { v >= i32::MIN as f64 && v <= i32::MAX as f64 };
    if !in_range(cell.x) || !in_range(cell.y) || !in_range(cell.z) {
      return None;
    }

    Some(Self {
      x: cell.x as i32,
      y: cell.y as i32,
      z: cell.z as i32,
    })
  }

  /// Neighbor coordinate at the given offset, or `None` on overflow.
  pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
    Some(Self {
      x: self.x.checked_add(dx)?,
      y: self.y.checked_add(dy)?,
      z: self.z.checked_add(dz)?,
    })
  }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;

//! Uniform spatial hash grid over 3D points.
//!
//! Points are bucketed into cubic cells keyed by [`CellCoord`]; each
//! non-empty cell owns a [`Site`] holding the ids currently resident there.
//! The grid is built once per clustering run and then consumed
//! destructively: flood fill removes ids as it labels them, which doubles
//! as the "visited" set.
//!
//! # Module Structure
//!
//! - [`cell`]: `CellCoord` - cell coordinate used directly as the map key
//! - [`site`]: `Site` - dense live set of point ids per cell

use std::collections::HashMap;

use glam::DVec3;

use crate::error::{ClusterError, Result};
use crate::types::{PointId, Position};

pub mod cell;
pub mod site;

pub use cell::CellCoord;
pub use site::Site;

/// Spatial hash grid - exclusive owner of all `Site`s.
///
/// Removal is immediately visible grid-wide: once `remove` returns true for
/// an id, no seed scan or neighborhood query surfaces that id again.
#[derive(Debug)]
pub struct SpatialHashGrid {
  sites: HashMap<CellCoord, Site>,
  spacing: DVec3,
  /// Live ids across all sites.
  len: usize,
}

impl SpatialHashGrid {
  /// Create an empty grid with the given per-axis cell spacing.
  ///
  /// Spacing must be finite and strictly positive on every axis.
  pub fn new(spacing: DVec3) -> Result<Self> {
    if !spacing.is_finite() || spacing.min_element() <= 0.0 {
      return Err(ClusterError::InvalidConfig(format!(
        "cell spacing must be finite and positive, got {spacing}"
      )));
    }
    Ok(Self {
      sites: HashMap::new(),
      spacing,
      len: 0,
    })
  }

  /// Per-axis cell spacing.
  pub fn spacing(&self) -> DVec3 {
    self.spacing
  }

  /// Number of live points across all sites.
  pub fn len(&self) -> usize {
    self.len
  }

  /// Check if no live points remain.
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Number of sites (cells that have ever held a point this run).
  pub fn cell_count(&self) -> usize {
    self.sites.len()
  }

  /// Insert a point, creating its site on demand.
  ///
  /// Returns the coordinate of the cell the point landed in.
  pub fn insert(&mut self, pos: Position, id: PointId) -> Result<CellCoord> {
    let coord = CellCoord::from_position(pos, self.spacing).ok_or(
      ClusterError::CoordinateOutOfRange {
        x: pos.x,
        y: pos.y,
        z: pos.z,
      },
    )?;

    let site = self.sites.entry(coord).or_default();
    let before = site.len();
    site.insert(id);
    self.len += site.len() - before;
    Ok(coord)
  }

  /// Site at a coordinate, if one exists.
  pub fn site(&self, coord: CellCoord) -> Option<&Site> {
    self.sites.get(&coord)
  }

  /// Mutable site access. Callers that remove ids through this handle must
  /// go through [`remove`](Self::remove) or [`drain_site`](Self::drain_site)
  /// instead so the live count stays accurate.
  fn site_mut(&mut self, coord: CellCoord) -> Option<&mut Site> {
    self.sites.get_mut(&coord)
  }

  /// Site of the cell at `coord + (dx, dy, dz)`, non-creating.
  ///
  /// `None` if the neighbor cell has no site or the offset overflows the
  /// coordinate domain.
  pub fn neighbor_site(&self, coord: CellCoord, dx: i32, dy: i32, dz: i32) -> Option<&Site> {
    self.site(coord.offset(dx, dy, dz)?)
  }

  /// Remove one id from the cell at `coord`. Returns false if it was not
  /// live there.
  pub fn remove(&mut self, coord: CellCoord, id: PointId) -> bool {
    let Some(site) = self.site_mut(coord) else {
      return false;
    };
    let removed = site.remove(id);
    if removed {
      self.len -= 1;
    }
    removed
  }

  /// Take every live id out of the cell at `coord`.
  ///
  /// The emptied site stays in the map; re-checking it later is cheap and
  /// repeated physical erasure during traversal is not.
  pub fn drain_site(&mut self, coord: CellCoord) -> Vec<PointId> {
    let Some(site) = self.site_mut(coord) else {
      return Vec::new();
    };
    let drained = site.drain_all();
    self.len -= drained.len();
    drained
  }

  /// Append every live id within `radius` of `pos` (cell granularity) to
  /// `out`. Returns the count appended.
  ///
  /// Over-approximation by contract: the span covers every cell that could
  /// hold a point within `radius`, so callers must still apply an exact
  /// distance test to the returned ids.
  pub fn collect_neighborhood(
    &self,
    pos: Position,
    radius: f64,
    out: &mut Vec<PointId>,
  ) -> usize {
    let Some(center) = CellCoord::from_position(pos, self.spacing) else {
      return 0;
    };

    // Cells needed per axis to cover the radius
    let span = (DVec3::splat(radius) / self.spacing).ceil();
    let sx = span.x as i32;
    let sy = span.y as i32;
    let sz = span.z as i32;

    let before = out.len();
    for dx in -sx..=sx {
      for dy in -sy..=sy {
        for dz in -sz..=sz {
          let Some(coord) = center.offset(dx, dy, dz) else {
            continue;
          };
          if let Some(site) = self.site(coord) {
            out.extend(site.iter());
          }
        }
      }
    }
    out.len() - before
  }

  /// First live point anywhere in the grid, with the coordinate of its
  /// cell. Seed-selection primitive for flood fill.
  ///
  /// Iteration follows the map's order: deterministic within one process
  /// run, not spatially local.
  pub fn next_seed(&self) -> Option<(PointId, CellCoord)> {
    self
      .sites
      .iter()
      .find_map(|(coord, site)| site.first().map(|id| (id, *coord)))
  }

  /// Drop all sites and reset the live count.
  pub fn clear(&mut self) {
    self.sites.clear();
    self.len = 0;
  }
}

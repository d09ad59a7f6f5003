//! Site - the per-cell bucket of live point indices.
//!
//! Removal during flood fill is the hot operation, so a `Site` stores its
//! ids as a dense vector with a slot map for O(1) swap-remove. Removed ids
//! are physically compacted; there is no tombstone state to leak on long
//! traversals.

use std::collections::HashMap;

use crate::types::PointId;

/// Live set of point ids resident in one grid cell.
///
/// Invariant: `len()` equals the number of ids that have been inserted and
/// not removed; a removed id is never surfaced again by `first()` or
/// `iter()`.
#[derive(Debug, Default)]
pub struct Site {
  /// Dense list of live ids; order is insertion order perturbed by
  /// swap-removes.
  ids: Vec<PointId>,
  /// Position of each live id inside `ids`.
  slots: HashMap<PointId, usize>,
}

impl Site {
  /// Create an empty site.
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live ids.
  pub fn len(&self) -> usize {
    self.ids.len()
  }

  /// Check if no live ids remain.
  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  /// Insert an id. Idempotent: re-inserting a live id is a no-op.
  pub fn insert(&mut self, id: PointId) {
    if self.slots.contains_key(&id) {
      return;
    }
    self.slots.insert(id, self.ids.len());
    self.ids.push(id);
  }

  /// Check if an id is live in this site.
  pub fn contains(&self, id: PointId) -> bool {
    self.slots.contains_key(&id)
  }

  /// Remove an id via swap-remove. Returns false if it was not live.
  pub fn remove(&mut self, id: PointId) -> bool {
    let Some(slot) = self.slots.remove(&id) else {
      return false;
    };

    let last = self.ids.len() - 1;
    self.ids.swap_remove(slot);
    if slot != last {
      // The former tail id now lives in the vacated slot
      self.slots.insert(self.ids[slot], slot);
    }
    true
  }

  /// Any live id, if one exists.
  pub fn first(&self) -> Option<PointId> {
    self.ids.first().copied()
  }

  /// Iterate over live ids.
  pub fn iter(&self) -> impl Iterator<Item = PointId> + '_ {
    self.ids.iter().copied()
  }

  /// Take every live id out of the site, leaving it empty.
  ///
  /// Bulk-consumption primitive for site-granularity flood fill: one call
  /// replaces a loop of per-id removals.
  pub fn drain_all(&mut self) -> Vec<PointId> {
    self.slots.clear();
    std::mem::take(&mut self.ids)
  }

  /// Remove all live ids.
  pub fn clear(&mut self) {
    self.ids.clear();
    self.slots.clear();
  }
}

#[cfg(test)]
#[path = "site_test.rs"]
mod site_test;

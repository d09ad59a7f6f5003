//! Configuration for a clustering run.

use glam::DVec3;

use crate::constants::{CELL_SPACING_FACTOR, DEFAULT_CANDIDATE_RANGE};
use crate::error::{ClusterError, Result};

/// Tunables for cluster extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterConfig {
  /// Maximum intra-cluster point separation `D` (world units).
  pub distance: f64,
  /// Multiplier on `distance` for the exact variant's candidate gather
  /// radius. Must be >= 1.0; 1.0 degenerates to the plain threshold.
  pub candidate_range: f64,
}

impl ClusterConfig {
  /// Default configuration: unit distance, 2x candidate range.
  pub const DEFAULT: Self = Self {
    distance: 1.0,
    candidate_range: DEFAULT_CANDIDATE_RANGE,
  };

  /// Configuration with the given distance threshold and default range.
  pub fn with_distance(distance: f64) -> Self {
    Self {
      distance,
      ..Self::DEFAULT
    }
  }

  /// Validate the configuration.
  pub fn validate(&self) -> Result<()> {
    if !self.distance.is_finite() || self.distance <= 0.0 {
      return Err(ClusterError::InvalidConfig(format!(
        "distance must be finite and positive, got {}",
        self.distance
      )));
    }
    if !self.candidate_range.is_finite() || self.candidate_range < 1.0 {
      return Err(ClusterError::InvalidConfig(format!(
        "candidate range must be finite and >= 1.0, got {}",
        self.candidate_range
      )));
    }
    Ok(())
  }

  /// Per-axis grid cell spacing: `2 * D` on every axis.
  #[inline]
  pub fn cell_spacing(&self) -> DVec3 {
    DVec3::splat(self.distance * CELL_SPACING_FACTOR)
  }

  /// Candidate gather radius for the exact variant.
  #[inline]
  pub fn candidate_radius(&self) -> f64 {
    self.distance * self.candidate_range
  }
}

impl Default for ClusterConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

//! ClusterEngine - owns one clustering run end to end.
//!
//! A run has three phases:
//! 1. **Load**: drain the point source into the position buffer and build
//!    the spatial hash grid with `2*D` cells.
//! 2. **Traverse**: strategy-specific flood fill (the `fast` or `exact`
//!    module) that labels every point and consumes the grid.
//! 3. **Emit**: compact per-cluster position buffers, optionally writing
//!    each point's label to the caller's sink.
//!
//! Errors abort the run and reset the engine to the empty state; a caller
//! never observes a partial labeling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ClusterError, Result};
use crate::grid::SpatialHashGrid;
use crate::stream::{LabelSink, PointSource};
use crate::types::{ClusterId, PointId, Position, UNASSIGNED};

use super::config::ClusterConfig;
use super::stats::ClusterStats;
use super::{exact, fast};

/// Flood-fill strategy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
  /// Whole-cell expansion through the 26-neighborhood (fast, approximate).
  SiteGranularity,
  /// Per-point expansion with exact squared-distance tests.
  PointExact,
}

/// Cooperative cancellation handle checked once per worklist pop.
pub(super) struct CancelCheck {
  flag: Option<Arc<AtomicBool>>,
}

impl CancelCheck {
  pub(super) fn new(flag: Option<Arc<AtomicBool>>) -> Self {
    Self { flag }
  }

  /// Err([`ClusterError::Cancelled`]) once the flag is raised.
  #[inline]
  pub(super) fn check(&self) -> Result<()> {
    match &self.flag {
      Some(flag) if flag.load(Ordering::Relaxed) => Err(ClusterError::Cancelled),
      _ => Ok(()),
    }
  }
}

/// Spatial clustering engine over a streamed point cloud.
///
/// Created fresh or reused across runs; each extraction call discards the
/// previous run's output first. Output accessors borrow from the engine and
/// are invalidated by the next run.
pub struct ClusterEngine {
  config: ClusterConfig,
  cancel: Option<Arc<AtomicBool>>,
  positions: Vec<Position>,
  labels: Vec<ClusterId>,
  cluster_points: Vec<Vec<Position>>,
  cluster_sizes: Vec<usize>,
}

impl ClusterEngine {
  /// Create an engine with a validated configuration.
  pub fn new(config: ClusterConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self {
      config,
      cancel: None,
      positions: Vec::new(),
      labels: Vec::new(),
      cluster_points: Vec::new(),
      cluster_sizes: Vec::new(),
    })
  }

  /// Attach a cancellation flag. Raising the flag from any thread makes the
  /// running extraction return [`ClusterError::Cancelled`] at the next
  /// worklist pop.
  pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
    self.cancel = Some(flag);
    self
  }

  /// The engine's configuration.
  pub fn config(&self) -> &ClusterConfig {
    &self.config
  }

  /// Extract clusters with the site-granularity (fast) strategy.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "cluster::extract_fast_clusters")
  )]
  pub fn extract_fast_clusters(
    &mut self,
    source: &mut dyn PointSource,
    sink: Option<&mut dyn LabelSink>,
  ) -> Result<ClusterStats> {
    self.run(source, sink, Strategy::SiteGranularity)
  }

  /// Extract clusters with the point-exact strategy.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "cluster::extract_clusters")
  )]
  pub fn extract_clusters(
    &mut self,
    source: &mut dyn PointSource,
    sink: Option<&mut dyn LabelSink>,
  ) -> Result<ClusterStats> {
    self.run(source, sink, Strategy::PointExact)
  }

  /// Extract clusters with an explicit [`Strategy`].
  pub fn extract_with(
    &mut self,
    source: &mut dyn PointSource,
    sink: Option<&mut dyn LabelSink>,
    strategy: Strategy,
  ) -> Result<ClusterStats> {
    self.run(source, sink, strategy)
  }

  /// Number of clusters produced by the most recent successful run.
  pub fn num_clusters(&self) -> usize {
    self.cluster_points.len()
  }

  /// Positions belonging to cluster `index`, or `None` out of range.
  ///
  /// The borrow is invalidated by the next extraction or by dropping the
  /// engine.
  pub fn cluster_points(&self, index: usize) -> Option<&[Position]> {
    self.cluster_points.get(index).map(Vec::as_slice)
  }

  /// Per-cluster point counts. For the exact strategy these are sorted
  /// ascending; for the fast strategy they follow discovery order.
  pub fn cluster_sizes(&self) -> &[usize] {
    &self.cluster_sizes
  }

  /// Per-point cluster labels in input order (1-based; cluster `i` in the
  /// output accessors carries label `i + 1`).
  pub fn labels(&self) -> &[ClusterId] {
    &self.labels
  }

  /// Shared run skeleton: load, traverse, emit.
  fn run(
    &mut self,
    source: &mut dyn PointSource,
    sink: Option<&mut dyn LabelSink>,
    strategy: Strategy,
  ) -> Result<ClusterStats> {
    self.reset_outputs();

    let result = self.run_inner(source, sink, strategy);
    if result.is_err() {
      // A failed run must not leave partial output observable
      self.reset_outputs();
    }
    result
  }

  fn run_inner(
    &mut self,
    source: &mut dyn PointSource,
    sink: Option<&mut dyn LabelSink>,
    strategy: Strategy,
  ) -> Result<ClusterStats> {
    let mut stats = ClusterStats::default();
    let cancel = CancelCheck::new(self.cancel.clone());

    let mut grid = self.load(source, &cancel, &mut stats)?;
    if self.positions.is_empty() {
      return Ok(stats);
    }

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("traverse").entered();

      self.labels = vec![UNASSIGNED; self.positions.len()];
      self.cluster_sizes = match strategy {
        Strategy::SiteGranularity => {
          fast::flood_fill(&mut grid, &mut self.labels, &cancel, &mut stats)?
        }
        Strategy::PointExact => {
          let params = exact::ExactParams::from_config(&self.config);
          exact::flood_fill(
            &mut grid,
            &self.positions,
            params,
            &mut self.labels,
            &cancel,
            &mut stats,
          )?
        }
      };
    }

    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("emit").entered();

      if strategy == Strategy::PointExact {
        self.sort_clusters_ascending();
      }
      self.build_cluster_buffers();
      if let Some(sink) = sink {
        self.write_labels(sink)?;
      }
    }

    Ok(stats)
  }

  /// Load phase: materialize the stream and populate the grid.
  fn load(
    &mut self,
    source: &mut dyn PointSource,
    cancel: &CancelCheck,
    stats: &mut ClusterStats,
  ) -> Result<SpatialHashGrid> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("load").entered();

    source.reset()?;
    if let Some(hint) = source.size_hint() {
      self.positions.reserve(hint);
    }

    loop {
      cancel.check()?;
      let appended = source.next_batch(&mut self.positions)?;
      if appended == 0 {
        break;
      }
      stats.batches_consumed += 1;
      if self.positions.len() > PointId::MAX as usize {
        return Err(ClusterError::TooManyPoints {
          count: self.positions.len(),
        });
      }
    }
    stats.points_loaded = self.positions.len();

    let mut grid = SpatialHashGrid::new(self.config.cell_spacing())?;
    for (i, &pos) in self.positions.iter().enumerate() {
      grid.insert(pos, i as PointId)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
      points = self.positions.len(),
      cells = grid.cell_count(),
      "grid loaded"
    );

    Ok(grid)
  }

  /// Reorder cluster indices so sizes come out ascending, relabeling the
  /// per-point array to match (label `i + 1` <-> output cluster `i`).
  fn sort_clusters_ascending(&mut self) {
    let mut order: Vec<usize> = (0..self.cluster_sizes.len()).collect();
    order.sort_by_key(|&i| self.cluster_sizes[i]);

    // old label - 1 -> new label
    let mut relabel = vec![UNASSIGNED; self.cluster_sizes.len()];
    for (new_index, &old_index) in order.iter().enumerate() {
      relabel[old_index] = new_index as ClusterId + 1;
    }

    for label in &mut self.labels {
      debug_assert_ne!(*label, UNASSIGNED);
      *label = relabel[(*label - 1) as usize];
    }
    self.cluster_sizes = order.iter().map(|&i| self.cluster_sizes[i]).collect();
  }

  /// Copy positions out into compact per-cluster buffers.
  fn build_cluster_buffers(&mut self) {
    self.cluster_points = self
      .cluster_sizes
      .iter()
      .map(|&size| Vec::with_capacity(size))
      .collect();
    for (i, &label) in self.labels.iter().enumerate() {
      debug_assert_ne!(label, UNASSIGNED);
      self.cluster_points[(label - 1) as usize].push(self.positions[i]);
    }
  }

  /// Write each point's label to the sink, clamped to the one-byte channel.
  fn write_labels(&self, sink: &mut dyn LabelSink) -> Result<()> {
    for (i, &label) in self.labels.iter().enumerate() {
      let byte = u8::try_from(label).unwrap_or(u8::MAX);
      sink.write(i as PointId, byte)?;
    }
    Ok(())
  }

  fn reset_outputs(&mut self) {
    self.positions.clear();
    self.labels.clear();
    self.cluster_points.clear();
    self.cluster_sizes.clear();
  }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

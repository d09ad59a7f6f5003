//! point_cluster - spatial hash grid and flood-fill cluster extraction for
//! 3D point clouds.
//!
//! Points streamed from a [`PointSource`] are bucketed into a uniform
//! [`SpatialHashGrid`] with cells `2*D` wide (`D` = the cluster distance
//! threshold), then grouped into connected components by front-propagation
//! flood fill. Two strategies are available:
//!
//! - **Site granularity** (fast): expands whole cells through the
//!   26-neighborhood; points sharing a cell always co-cluster
//! - **Point exact**: expands point by point, admitting neighbors by exact
//!   squared-distance tests within a tunable candidate range
//!
//! # Example
//!
//! ```
//! use point_cluster::{ClusterConfig, ClusterEngine, Position, SliceSource};
//!
//! let points = vec![
//!     Position::new(0.0, 0.0, 0.0),
//!     Position::new(0.5, 0.0, 0.0),
//!     Position::new(10.0, 0.0, 0.0),
//! ];
//! let mut source = SliceSource::new(points);
//! let mut engine = ClusterEngine::new(ClusterConfig::with_distance(1.0)).unwrap();
//!
//! let stats = engine.extract_clusters(&mut source, None).unwrap();
//! assert_eq!(stats.clusters_found, 2);
//! assert_eq!(engine.num_clusters(), 2);
//! ```

pub mod cluster;
pub mod constants;
pub mod error;
pub mod grid;
pub mod stream;
pub mod types;

// Re-export commonly used items
pub use cluster::{ClusterConfig, ClusterEngine, ClusterStats, Strategy};
pub use error::{ClusterError, Result};
pub use grid::{CellCoord, Site, SpatialHashGrid};
pub use stream::{LabelSink, PointSource, SliceSource, VecSink};
pub use types::{distance_sq, ClusterId, PointId, Position, UNASSIGNED};

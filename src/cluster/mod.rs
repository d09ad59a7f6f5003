//! Flood-fill cluster extraction over the spatial hash grid.
//!
//! Two strategies share one engine and one grid-removal discipline:
//!
//! - [`Strategy::SiteGranularity`]: whole-cell expansion through the
//!   26-neighborhood - fast, cell-granular approximation
//! - [`Strategy::PointExact`]: per-point expansion gated by exact squared
//!   distance tests within the candidate range
//!
//! # Module Structure
//!
//! - [`config`]: `ClusterConfig` - distance threshold and candidate range
//! - [`engine`]: `ClusterEngine` - run lifecycle, output accessors
//! - [`stats`]: `ClusterStats` - per-run counters, returned by value
//! - `fast` / `exact`: the two traversal strategies

pub mod config;
pub mod engine;
pub mod stats;

mod exact;
mod fast;

pub use config::ClusterConfig;
pub use engine::{ClusterEngine, Strategy};
pub use stats::ClusterStats;

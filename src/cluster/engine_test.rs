use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::stream::{FailingSource, SliceSource, VecSink};
use crate::types::{ClusterId, Position};
use crate::ClusterError;

use super::*;

fn engine(distance: f64) -> ClusterEngine {
  ClusterEngine::new(ClusterConfig::with_distance(distance)).unwrap()
}

/// Label-renaming-invariant view of a labeling: sorted groups of point ids.
fn partition(labels: &[ClusterId]) -> Vec<Vec<u32>> {
  let mut groups: HashMap<ClusterId, Vec<u32>> = HashMap::new();
  for (i, &label) in labels.iter().enumerate() {
    groups.entry(label).or_default().push(i as u32);
  }
  let mut out: Vec<Vec<u32>> = groups.into_values().collect();
  for group in &mut out {
    group.sort_unstable();
  }
  out.sort();
  out
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
  assert!(ClusterEngine::new(ClusterConfig::with_distance(-1.0)).is_err());
}

#[test]
fn test_zero_points_zero_clusters() {
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(Vec::new());

  let stats = engine.extract_clusters(&mut source, None).unwrap();
  assert_eq!(stats.clusters_found, 0);
  assert_eq!(engine.num_clusters(), 0);
  assert!(engine.labels().is_empty());

  let stats = engine.extract_fast_clusters(&mut source, None).unwrap();
  assert_eq!(stats.clusters_found, 0);
}

#[test]
fn test_single_point_is_one_singleton_cluster() {
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(vec![Position::ZERO]);

  engine.extract_clusters(&mut source, None).unwrap();
  assert_eq!(engine.num_clusters(), 1);
  assert_eq!(engine.cluster_points(0).unwrap(), &[Position::ZERO]);
  assert_eq!(engine.cluster_sizes(), &[1]);
}

#[test]
fn test_close_pair_one_cluster_far_pair_two() {
  let mut engine = engine(1.0);

  let mut close = SliceSource::new(vec![Position::ZERO, Position::new(0.5, 0.0, 0.0)]);
  engine.extract_clusters(&mut close, None).unwrap();
  assert_eq!(engine.num_clusters(), 1);
  assert_eq!(engine.cluster_sizes(), &[2]);

  let mut far = SliceSource::new(vec![Position::ZERO, Position::new(10.0, 0.0, 0.0)]);
  engine.extract_clusters(&mut far, None).unwrap();
  assert_eq!(engine.num_clusters(), 2);
  assert_eq!(engine.cluster_sizes(), &[1, 1]);
}

#[test]
fn test_labels_match_cluster_buffers() {
  let points = vec![
    Position::ZERO,
    Position::new(0.5, 0.0, 0.0),
    Position::new(20.0, 0.0, 0.0),
    Position::new(20.4, 0.0, 0.0),
    Position::new(-30.0, 5.0, 1.0),
  ];
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(points.clone());
  engine.extract_clusters(&mut source, None).unwrap();

  // Cluster i holds exactly the points labeled i + 1, in input order
  for (i, &label) in engine.labels().iter().enumerate() {
    let cluster = engine.cluster_points((label - 1) as usize).unwrap();
    assert!(cluster.contains(&points[i]));
  }
  let total: usize = engine.cluster_sizes().iter().sum();
  assert_eq!(total, points.len());
  for (i, &size) in engine.cluster_sizes().iter().enumerate() {
    assert_eq!(engine.cluster_points(i).unwrap().len(), size);
  }
}

#[test]
fn test_cluster_points_out_of_range_is_none() {
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(vec![Position::ZERO]);
  engine.extract_clusters(&mut source, None).unwrap();
  assert!(engine.cluster_points(1).is_none());
}

#[test]
fn test_exact_sizes_are_ascending() {
  // Three clusters of sizes 3, 1, 2 in scattered input order
  let points = vec![
    Position::new(0.0, 0.0, 0.0),
    Position::new(50.0, 0.0, 0.0),
    Position::new(0.4, 0.0, 0.0),
    Position::new(-50.0, 0.0, 0.0),
    Position::new(0.8, 0.0, 0.0),
    Position::new(-50.4, 0.0, 0.0),
  ];
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(points);
  engine.extract_clusters(&mut source, None).unwrap();

  assert_eq!(engine.cluster_sizes(), &[1, 2, 3]);
  // Relabeling kept the label/buffer correspondence intact
  assert_eq!(engine.cluster_points(2).unwrap().len(), 3);
}

#[test]
fn test_rerun_produces_the_same_partition() {
  let mut rng = StdRng::seed_from_u64(7);
  let points: Vec<Position> = (0..500)
    .map(|_| {
      Position::new(
        rng.gen_range(0.0..30.0),
        rng.gen_range(0.0..30.0),
        rng.gen_range(0.0..30.0),
      )
    })
    .collect();

  let mut engine = engine(1.0);
  let mut source = SliceSource::new(points);

  engine.extract_clusters(&mut source, None).unwrap();
  let first = partition(engine.labels());

  engine.extract_clusters(&mut source, None).unwrap();
  let second = partition(engine.labels());

  assert_eq!(first, second, "same input and config must re-partition identically");
}

#[test]
fn test_sink_receives_every_label_clamped_to_a_byte() {
  // 300 isolated points -> 300 singleton clusters; labels above 255
  // saturate in the one-byte channel
  let points: Vec<Position> = (0..300)
    .map(|i| Position::new(i as f64 * 10.0, 0.0, 0.0))
    .collect();
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(points);
  let mut sink = VecSink::new();

  engine.extract_clusters(&mut source, Some(&mut sink)).unwrap();
  assert_eq!(engine.num_clusters(), 300);
  assert_eq!(sink.labels().len(), 300);

  for (i, &label) in engine.labels().iter().enumerate() {
    let expected = u8::try_from(label).unwrap_or(u8::MAX);
    assert_eq!(sink.labels()[i], expected);
  }
  assert!(sink.labels().contains(&u8::MAX));
}

#[test]
fn test_stream_failure_aborts_with_no_partial_output() {
  let points: Vec<Position> = (0..100)
    .map(|i| Position::new(i as f64, 0.0, 0.0))
    .collect();
  let mut engine = engine(1.0);
  let mut source = FailingSource::new(points, 16, 2);

  let result = engine.extract_clusters(&mut source, None);
  assert!(matches!(result, Err(ClusterError::Stream(_))));
  assert_eq!(engine.num_clusters(), 0);
  assert!(engine.labels().is_empty());
  assert!(engine.cluster_sizes().is_empty());
}

#[test]
fn test_cancelled_run_leaves_the_engine_empty() {
  let flag = Arc::new(AtomicBool::new(true));
  let mut engine = ClusterEngine::new(ClusterConfig::with_distance(1.0))
    .unwrap()
    .with_cancel_flag(Arc::clone(&flag));
  let mut source = SliceSource::new(vec![Position::ZERO]);

  let result = engine.extract_clusters(&mut source, None);
  assert!(matches!(result, Err(ClusterError::Cancelled)));
  assert_eq!(engine.num_clusters(), 0);
}

#[test]
fn test_engine_is_reusable_across_strategies() {
  let points = vec![Position::ZERO, Position::new(0.5, 0.0, 0.0)];
  let mut engine = engine(1.0);
  let mut source = SliceSource::new(points);

  engine.extract_fast_clusters(&mut source, None).unwrap();
  assert_eq!(engine.num_clusters(), 1);

  engine.extract_clusters(&mut source, None).unwrap();
  assert_eq!(engine.num_clusters(), 1);
}

#[test]
fn test_extract_with_selects_the_strategy() {
  // Two points sharing a 2*D cell but farther apart than the candidate
  // reach: the strategies disagree by construction
  let points = vec![Position::ZERO, Position::new(1.9, 1.9, 0.0)];
  let mut engine = ClusterEngine::new(ClusterConfig {
    distance: 1.0,
    candidate_range: 1.0,
  })
  .unwrap();
  let mut source = SliceSource::new(points);

  engine
    .extract_with(&mut source, None, Strategy::SiteGranularity)
    .unwrap();
  assert_eq!(engine.num_clusters(), 1);

  engine
    .extract_with(&mut source, None, Strategy::PointExact)
    .unwrap();
  assert_eq!(engine.num_clusters(), 2);
}

#[test]
fn test_batched_load_equals_single_batch_load() {
  let points: Vec<Position> = (0..40)
    .map(|i| Position::new(i as f64 * 0.6, 0.0, 0.0))
    .collect();
  let mut engine_a = engine(1.0);
  let mut engine_b = engine(1.0);

  let mut batched = SliceSource::with_batch_size(points.clone(), 7);
  let mut whole = SliceSource::with_batch_size(points, 1000);

  let stats_a = engine_a.extract_clusters(&mut batched, None).unwrap();
  let stats_b = engine_b.extract_clusters(&mut whole, None).unwrap();

  assert!(stats_a.batches_consumed > stats_b.batches_consumed);
  assert_eq!(partition(engine_a.labels()), partition(engine_b.labels()));
}

#[test]
fn test_fast_variant_merges_at_most_as_many_clusters_as_exact() {
  // 10k uniform points in a 100^3 cube: any pair within the exact reach
  // shares or straddles adjacent 2*D cells, so every exact cluster is
  // contained in a fast cluster
  let mut rng = StdRng::seed_from_u64(42);
  let points: Vec<Position> = (0..10_000)
    .map(|_| {
      Position::new(
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
        rng.gen_range(0.0..100.0),
      )
    })
    .collect();

  let mut engine = engine(1.0);
  let mut source = SliceSource::new(points);

  let exact_stats = engine.extract_clusters(&mut source, None).unwrap();
  let exact_count = engine.num_clusters();

  let fast_stats = engine.extract_fast_clusters(&mut source, None).unwrap();
  let fast_count = engine.num_clusters();

  assert!(exact_count > 0);
  assert!(fast_count > 0);
  assert!(
    fast_count <= exact_count,
    "fast variant may merge but never split: fast={fast_count} exact={exact_count}"
  );
  assert_eq!(exact_stats.points_loaded, 10_000);
  assert_eq!(fast_stats.points_loaded, 10_000);
}

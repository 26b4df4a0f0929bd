use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

extern crate relocalization;
use relocalization::geometry::{planar_pose, Pose};
use relocalization::lifecycle::{InMemoryLifecycle, TrajectoryConfiguration};
use relocalization::mapping::{
    InMemoryPoseGraph, PoseGraphQuery, SubmapEntry, SubmapId, TrajectoryId, TrajectoryNode,
    REFERENCE_TRAJECTORY_ID,
};
use relocalization::{compute_initial_pose, Relocalizer, UserPoseEstimate};

// 10 trajectories x 1000 submaps on a spiral
fn large_graph() -> InMemoryPoseGraph {
    let mut graph = InMemoryPoseGraph::new();
    for index in 0..1000 {
        let t = index as f64 * 0.1;
        graph.add_node(
            REFERENCE_TRAJECTORY_ID,
            TrajectoryNode {
                index,
                timestamp: t,
                global_pose: planar_pose(t * t.cos(), t * t.sin(), 0.01 * t, t),
            },
        );
    }
    for trajectory in 0..10 {
        for index in 0..1000 {
            let t = index as f64 * 0.1 + trajectory as f64;
            graph.add_submap(SubmapEntry {
                id: SubmapId::new(TrajectoryId(trajectory), index),
                global_pose: planar_pose(t * t.cos(), t * t.sin(), 0.01 * t, 0.0),
            });
        }
    }
    graph
}

fn initial_pose(b: &mut Criterion) {
    let graph = large_graph();
    let submaps = graph.all_submap_poses();
    let estimate = UserPoseEstimate::new(12.0, -3.0, 0.7).unwrap();
    let reference = Pose::identity();

    b.bench_function("compute_initial_pose_10k_submaps", |b| {
        b.iter(|| compute_initial_pose(&reference, &submaps, estimate))
    });
}

fn relocalize(b: &mut Criterion) {
    let mut relocalizer = Relocalizer::new(
        Arc::new(large_graph()),
        Box::new(InMemoryLifecycle::new()),
        TrajectoryConfiguration {
            configuration_directory: "configuration_files".to_owned(),
            configuration_basename: "localization.lua".to_owned(),
        },
    );
    let estimate = UserPoseEstimate::new(12.0, -3.0, 0.7).unwrap();

    b.bench_function("relocalize_10k_submaps", |b| {
        b.iter(|| relocalizer.relocalize(estimate))
    });
}

criterion_group!(benches, initial_pose, relocalize);
criterion_main!(benches);

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::geometry::iso3;
use crate::mapping::pose_graph::{
    InMemoryPoseGraph, SubmapEntry, SubmapId, TrajectoryId, TrajectoryNode,
};

pub const TRAJECTORY_NODES_FILENAME: &str = "trajectory_nodes.csv";
pub const SUBMAPS_FILENAME: &str = "submaps.csv";

#[derive(Error, Debug)]
pub enum StateLoadError {
    #[error("state directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}, record {record}: quaternion has zero norm", .path.display())]
    DegenerateRotation { path: PathBuf, record: usize },

    #[error("{}, record {record}: non-finite pose value", .path.display())]
    NonFinite { path: PathBuf, record: usize },
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    trajectory_id: u32,
    node_index: u32,
    timestamp: f64,
    x: f64,
    y: f64,
    z: f64,
    qx: f64,
    qy: f64,
    qz: f64,
    qw: f64,
}

#[derive(Debug, Deserialize)]
struct SubmapRecord {
    trajectory_id: u32,
    submap_index: u32,
    x: f64,
    y: f64,
    z: f64,
    qx: f64,
    qy: f64,
    qz: f64,
    qw: f64,
}

fn is_degenerate(qx: f64, qy: f64, qz: f64, qw: f64) -> bool {
    qx * qx + qy * qy + qz * qz + qw * qw < f64::EPSILON
}

/// `pose` is `[x, y, z, qx, qy, qz, qw]`.
fn check_pose(path: &Path, record: usize, pose: [f64; 7]) -> Result<(), StateLoadError> {
    if !pose.iter().all(|v| v.is_finite()) {
        return Err(StateLoadError::NonFinite {
            path: path.to_path_buf(),
            record,
        });
    }
    let [_, _, _, qx, qy, qz, qw] = pose;
    if is_degenerate(qx, qy, qz, qw) {
        return Err(StateLoadError::DegenerateRotation {
            path: path.to_path_buf(),
            record,
        });
    }
    Ok(())
}

fn read_records<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, StateLoadError> {
    let csv_error = |source: csv::Error| StateLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(csv_error)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_error)
}

/// Loads a pose graph snapshot from `trajectory_nodes.csv` and `submaps.csv` in `directory`.
pub fn load_state<P: AsRef<Path>>(directory: P) -> Result<InMemoryPoseGraph, StateLoadError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(StateLoadError::MissingDirectory(directory.to_path_buf()));
    }

    let mut graph = InMemoryPoseGraph::new();

    let nodes_path = directory.join(TRAJECTORY_NODES_FILENAME);
    for (record, r) in read_records::<NodeRecord>(&nodes_path)?.into_iter().enumerate() {
        check_pose(&nodes_path, record, [r.x, r.y, r.z, r.qx, r.qy, r.qz, r.qw])?;
        if !r.timestamp.is_finite() {
            return Err(StateLoadError::NonFinite {
                path: nodes_path,
                record,
            });
        }
        graph.add_node(
            TrajectoryId(r.trajectory_id),
            TrajectoryNode {
                index: r.node_index,
                timestamp: r.timestamp,
                global_pose: iso3(r.x, r.y, r.z, r.qx, r.qy, r.qz, r.qw),
            },
        );
    }

    let submaps_path = directory.join(SUBMAPS_FILENAME);
    for (record, r) in read_records::<SubmapRecord>(&submaps_path)?.into_iter().enumerate() {
        check_pose(&submaps_path, record, [r.x, r.y, r.z, r.qx, r.qy, r.qz, r.qw])?;
        graph.add_submap(SubmapEntry {
            id: SubmapId::new(TrajectoryId(r.trajectory_id), r.submap_index),
            global_pose: iso3(r.x, r.y, r.z, r.qx, r.qy, r.qz, r.qw),
        });
    }

    log::info!(
        "Loaded state from {} : {} trajectories, {} nodes, {} submaps",
        directory.display(),
        graph.num_trajectories(),
        graph.num_nodes(),
        graph.num_submaps()
    );
    Ok(graph)
}

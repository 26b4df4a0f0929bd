mod pose_graph;
mod state;

pub use pose_graph::{
    InMemoryPoseGraph, PoseGraphQuery, SubmapEntry, SubmapId, TrajectoryId, TrajectoryNode,
    REFERENCE_TRAJECTORY_ID,
};
pub use state::{load_state, StateLoadError, SUBMAPS_FILENAME, TRAJECTORY_NODES_FILENAME};

use rustc_hash::FxHashMap;
use std::fmt;

use crate::geometry::Pose;

/// Trajectory whose first node anchors every relocalized trajectory.
pub const REFERENCE_TRAJECTORY_ID: TrajectoryId = TrajectoryId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrajectoryId(pub u32);

impl fmt::Display for TrajectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Submaps are numbered per trajectory, ids sort by (trajectory, index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubmapId {
    pub trajectory_id: TrajectoryId,
    pub submap_index: u32,
}

impl SubmapId {
    pub fn new(trajectory_id: TrajectoryId, submap_index: u32) -> SubmapId {
        SubmapId {
            trajectory_id,
            submap_index,
        }
    }
}

impl fmt::Display for SubmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.trajectory_id, self.submap_index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryNode {
    pub index: u32,
    /// Seconds, as recorded by the back end.
    pub timestamp: f64,
    pub global_pose: Pose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmapEntry {
    pub id: SubmapId,
    pub global_pose: Pose,
}

/// Read-only view of the optimized pose graph.
pub trait PoseGraphQuery {
    /// Nodes of `trajectory_id` ordered by node index, empty if the trajectory is unknown.
    fn trajectory_node_poses(&self, trajectory_id: TrajectoryId) -> Vec<TrajectoryNode>;

    /// Every submap of every trajectory, ordered by [`SubmapId`].
    fn all_submap_poses(&self) -> Vec<SubmapEntry>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPoseGraph {
    trajectories: FxHashMap<TrajectoryId, Vec<TrajectoryNode>>,
    submaps: Vec<SubmapEntry>,
}

impl InMemoryPoseGraph {
    pub fn new() -> InMemoryPoseGraph {
        InMemoryPoseGraph::default()
    }

    /// Inserts a node, keeping the trajectory sorted by node index.
    /// A node with an existing index replaces the old one.
    pub fn add_node(&mut self, trajectory_id: TrajectoryId, node: TrajectoryNode) {
        let nodes = self.trajectories.entry(trajectory_id).or_default();
        match nodes.binary_search_by_key(&node.index, |n| n.index) {
            Ok(i) => nodes[i] = node,
            Err(i) => nodes.insert(i, node),
        }
    }

    /// Inserts a submap, keeping the list sorted by id.
    pub fn add_submap(&mut self, submap: SubmapEntry) {
        match self.submaps.binary_search_by_key(&submap.id, |s| s.id) {
            Ok(i) => self.submaps[i] = submap,
            Err(i) => self.submaps.insert(i, submap),
        }
    }

    pub fn num_trajectories(&self) -> usize {
        self.trajectories.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.trajectories.values().map(Vec::len).sum()
    }

    pub fn num_submaps(&self) -> usize {
        self.submaps.len()
    }
}

impl PoseGraphQuery for InMemoryPoseGraph {
    fn trajectory_node_poses(&self, trajectory_id: TrajectoryId) -> Vec<TrajectoryNode> {
        self.trajectories
            .get(&trajectory_id)
            .cloned()
            .unwrap_or_default()
    }

    fn all_submap_poses(&self) -> Vec<SubmapEntry> {
        self.submaps.clone()
    }
}

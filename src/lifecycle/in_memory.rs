use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::geometry::Pose;
use crate::lifecycle::service::{
    StartTrajectoryRequest, TrajectoryLifecycle, TransportError, FINISH_TRAJECTORY_SERVICE_NAME,
    START_TRAJECTORY_SERVICE_NAME,
};
use crate::lifecycle::status::{Status, StatusCode};
use crate::mapping::{TrajectoryId, REFERENCE_TRAJECTORY_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryState {
    Active,
    Finished,
    Frozen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartedTrajectory {
    pub trajectory_id: TrajectoryId,
    pub relative_to_trajectory_id: TrajectoryId,
    pub initial_pose: Option<Pose>,
}

#[derive(Debug)]
struct Inner {
    states: FxHashMap<TrajectoryId, TrajectoryState>,
    next_trajectory_id: u32,
    started: Vec<StartedTrajectory>,
    finish_calls: Vec<TrajectoryId>,
    available: bool,
}

/// Local stand-in for the SLAM node's lifecycle services.
///
/// Starts with the frozen reference trajectory 0 and an active trajectory 1.
/// Clones share state, so a handle kept by the caller sees what the worker did.
#[derive(Debug, Clone)]
pub struct InMemoryLifecycle {
    inner: Arc<Mutex<Inner>>,
}

impl Default for InMemoryLifecycle {
    fn default() -> Self {
        InMemoryLifecycle::new()
    }
}

impl InMemoryLifecycle {
    pub fn new() -> InMemoryLifecycle {
        let mut states = FxHashMap::default();
        states.insert(REFERENCE_TRAJECTORY_ID, TrajectoryState::Frozen);
        states.insert(TrajectoryId(1), TrajectoryState::Active);
        InMemoryLifecycle {
            inner: Arc::new(Mutex::new(Inner {
                states,
                next_trajectory_id: 2,
                started: Vec::new(),
                finish_calls: Vec::new(),
                available: true,
            })),
        }
    }

    /// While unavailable every call fails before a status is produced.
    pub fn set_available(&self, available: bool) {
        self.inner.lock().available = available;
    }

    pub fn state(&self, trajectory_id: TrajectoryId) -> Option<TrajectoryState> {
        self.inner.lock().states.get(&trajectory_id).copied()
    }

    pub fn active_trajectories(&self) -> Vec<TrajectoryId> {
        let inner = self.inner.lock();
        let mut active: Vec<TrajectoryId> = inner
            .states
            .iter()
            .filter(|(_, state)| **state == TrajectoryState::Active)
            .map(|(id, _)| *id)
            .collect();
        active.sort();
        active
    }

    pub fn started(&self) -> Vec<StartedTrajectory> {
        self.inner.lock().started.clone()
    }

    pub fn finish_calls(&self) -> Vec<TrajectoryId> {
        self.inner.lock().finish_calls.clone()
    }
}

impl TrajectoryLifecycle for InMemoryLifecycle {
    fn finish_trajectory(&mut self, trajectory_id: TrajectoryId) -> Result<Status, TransportError> {
        let mut inner = self.inner.lock();
        if !inner.available {
            return Err(TransportError::new(
                FINISH_TRAJECTORY_SERVICE_NAME,
                "service unavailable",
            ));
        }
        inner.finish_calls.push(trajectory_id);

        let status = match inner.states.get(&trajectory_id).copied() {
            None => Status::new(
                StatusCode::NotFound,
                format!("Trajectory {trajectory_id} doesn't exist."),
            ),
            Some(TrajectoryState::Frozen) => Status::new(
                StatusCode::InvalidArgument,
                format!("Trajectory {trajectory_id} is frozen."),
            ),
            Some(TrajectoryState::Finished) => Status::new(
                StatusCode::InvalidArgument,
                format!("Trajectory {trajectory_id} has already been finished."),
            ),
            Some(TrajectoryState::Active) => {
                inner.states.insert(trajectory_id, TrajectoryState::Finished);
                Status::ok(format!("Finished trajectory {trajectory_id}."))
            }
        };
        Ok(status)
    }

    fn start_trajectory(
        &mut self,
        request: &StartTrajectoryRequest,
    ) -> Result<Status, TransportError> {
        let mut inner = self.inner.lock();
        if !inner.available {
            return Err(TransportError::new(
                START_TRAJECTORY_SERVICE_NAME,
                "service unavailable",
            ));
        }

        if request.configuration_directory.is_empty() || request.configuration_basename.is_empty()
        {
            return Ok(Status::new(
                StatusCode::InvalidArgument,
                "Error loading configuration: empty configuration path.",
            ));
        }
        if request.use_initial_pose
            && !inner.states.contains_key(&request.relative_to_trajectory_id)
        {
            return Ok(Status::new(
                StatusCode::InvalidArgument,
                format!(
                    "Trajectory {} doesn't exist.",
                    request.relative_to_trajectory_id
                ),
            ));
        }

        let trajectory_id = TrajectoryId(inner.next_trajectory_id);
        inner.next_trajectory_id += 1;
        inner.states.insert(trajectory_id, TrajectoryState::Active);
        inner.started.push(StartedTrajectory {
            trajectory_id,
            relative_to_trajectory_id: request.relative_to_trajectory_id,
            initial_pose: request.use_initial_pose.then_some(request.initial_pose),
        });
        Ok(Status::ok(format!("Started trajectory {trajectory_id}.")))
    }
}

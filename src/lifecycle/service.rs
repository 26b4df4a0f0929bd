use thiserror::Error;

use crate::geometry::Pose;
use crate::lifecycle::status::Status;
use crate::mapping::TrajectoryId;

pub const FINISH_TRAJECTORY_SERVICE_NAME: &str = "finish_trajectory";
pub const START_TRAJECTORY_SERVICE_NAME: &str = "start_trajectory";

/// The call did not complete, so no status was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to call {service}: {reason}")]
pub struct TransportError {
    pub service: &'static str,
    pub reason: String,
}

impl TransportError {
    pub fn new(service: &'static str, reason: impl Into<String>) -> TransportError {
        TransportError {
            service,
            reason: reason.into(),
        }
    }
}

/// Configuration the SLAM node loads for a new trajectory, forwarded as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrajectoryConfiguration {
    pub configuration_directory: String,
    pub configuration_basename: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartTrajectoryRequest {
    pub configuration_directory: String,
    pub configuration_basename: String,
    pub relative_to_trajectory_id: TrajectoryId,
    pub use_initial_pose: bool,
    pub initial_pose: Pose,
}

/// Synchronous request/response access to the SLAM node's trajectory services.
pub trait TrajectoryLifecycle {
    fn finish_trajectory(&mut self, trajectory_id: TrajectoryId) -> Result<Status, TransportError>;

    fn start_trajectory(
        &mut self,
        request: &StartTrajectoryRequest,
    ) -> Result<Status, TransportError>;
}

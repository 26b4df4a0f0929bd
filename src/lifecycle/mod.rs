mod in_memory;
mod service;
mod status;

pub use in_memory::{InMemoryLifecycle, StartedTrajectory, TrajectoryState};
pub use service::{
    StartTrajectoryRequest, TrajectoryConfiguration, TrajectoryLifecycle, TransportError,
    FINISH_TRAJECTORY_SERVICE_NAME, START_TRAJECTORY_SERVICE_NAME,
};
pub use status::{Status, StatusCode};

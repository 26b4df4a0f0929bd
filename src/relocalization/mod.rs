mod counter;
mod error;
mod estimate;
mod nearest_submap;
mod relocalizer;
mod worker;

pub use counter::TrajectoryCounter;
pub use error::RelocalizationError;
pub use estimate::{parse_estimate, ParseEstimateError, UserPoseEstimate};
pub use nearest_submap::nearest_submap;
pub use relocalizer::{compute_initial_pose, InitialPose, RelocalizationOutcome, Relocalizer};
pub use worker::{EstimateSender, RelocalizationResult, RelocalizationWorker};

pub mod config;
pub mod geometry;
pub mod lifecycle;
pub mod mapping;
pub mod plot;
pub mod relocalization;

pub use crate::relocalization::{
    compute_initial_pose, parse_estimate, InitialPose, ParseEstimateError, RelocalizationError,
    RelocalizationOutcome, RelocalizationResult, RelocalizationWorker, Relocalizer,
    UserPoseEstimate,
};

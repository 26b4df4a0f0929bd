mod pose;

pub use pose::{iso3, planar_distance, planar_pose, relative_pose, yaw, Pose};

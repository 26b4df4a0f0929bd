use std::str::FromStr;
use thiserror::Error;

use crate::geometry::{planar_pose, yaw, Pose};

/// Operator supplied planar pose. `z` is whatever the source sent and is not trusted.
///
/// Every field is finite, so the pose built from it has a normalized rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserPoseEstimate {
    x: f64,
    y: f64,
    z: f64,
    /// Radians, counter-clockwise from +X.
    heading: f64,
}

impl UserPoseEstimate {
    pub fn new(x: f64, y: f64, heading: f64) -> Result<UserPoseEstimate, ParseEstimateError> {
        UserPoseEstimate::checked(x, y, 0.0, heading)
    }

    /// Keeps position and yaw of a full pose, roll and pitch are dropped.
    pub fn from_pose(pose: &Pose) -> Result<UserPoseEstimate, ParseEstimateError> {
        let t = &pose.translation;
        UserPoseEstimate::checked(t.x, t.y, t.z, yaw(pose))
    }

    fn checked(
        x: f64,
        y: f64,
        z: f64,
        heading: f64,
    ) -> Result<UserPoseEstimate, ParseEstimateError> {
        if !(x.is_finite() && y.is_finite() && z.is_finite() && heading.is_finite()) {
            return Err(ParseEstimateError::NonFinite(format!("{x} {y} {z} {heading}")));
        }
        Ok(UserPoseEstimate { x, y, z, heading })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Replaces the height; callers pass a finite submap height.
    pub(crate) fn with_z(self, z: f64) -> UserPoseEstimate {
        debug_assert!(z.is_finite());
        UserPoseEstimate { z, ..self }
    }

    pub fn to_pose(&self) -> Pose {
        planar_pose(self.x, self.y, self.z, self.heading)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseEstimateError {
    #[error("expected 3 values `x y heading`, got {0}")]
    WrongArity(usize),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("non-finite value in '{0}'")]
    NonFinite(String),
}

/// Parses `x y heading`, separated by whitespace and/or commas. Heading in radians.
impl FromStr for UserPoseEstimate {
    type Err = ParseEstimateError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|x| !x.is_empty())
            .collect();
        let values = fields
            .iter()
            .map(|x| {
                x.parse::<f64>()
                    .map_err(|_| ParseEstimateError::InvalidNumber((*x).to_owned()))
            })
            .collect::<Result<Vec<f64>, _>>()?;
        let [x, y, heading] = values[..] else {
            return Err(ParseEstimateError::WrongArity(values.len()));
        };
        UserPoseEstimate::new(x, y, heading)
            .map_err(|_| ParseEstimateError::NonFinite(line.trim().to_owned()))
    }
}

/// Same as [`FromStr`], with the heading given in degrees when `degrees` is set.
pub fn parse_estimate(line: &str, degrees: bool) -> Result<UserPoseEstimate, ParseEstimateError> {
    let estimate: UserPoseEstimate = line.parse()?;
    if degrees {
        UserPoseEstimate::new(estimate.x, estimate.y, estimate.heading.to_radians())
    } else {
        Ok(estimate)
    }
}

use thiserror::Error;

use crate::lifecycle::{Status, StatusCode, TransportError};
use crate::mapping::TrajectoryId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelocalizationError {
    /// Non-fatal: the new trajectory is still attempted.
    #[error("Error finishing trajectory {trajectory_id} - message: '{message}' (status code: {code}).")]
    FinishFailed {
        trajectory_id: TrajectoryId,
        code: StatusCode,
        message: String,
    },

    #[error("Reference trajectory {0} has no nodes, nothing to anchor the initial pose to.")]
    NoReferenceTrajectory(TrajectoryId),

    #[error("Pose graph has no submaps, cannot resolve the height of the initial pose.")]
    NoSubmaps,

    #[error("Trajectory ids exhausted, cannot move past trajectory {0}.")]
    TrajectoryIdsExhausted(TrajectoryId),

    #[error("Error starting trajectory - message: '{message}' (status code: {code}).")]
    StartFailed { code: StatusCode, message: String },
}

/// Folds a transport failure and a non-OK status into one `(code, message)` failure.
///
/// Transport failures are reported as `Unavailable`.
pub(crate) fn check_call(
    response: Result<Status, TransportError>,
) -> Result<Status, (StatusCode, String)> {
    match response {
        Ok(status) if status.is_ok() => Ok(status),
        Ok(status) => Err((status.code, status.message)),
        Err(err) => Err((StatusCode::Unavailable, err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::FINISH_TRAJECTORY_SERVICE_NAME;

    #[test]
    fn check_call_variants() {
        assert!(check_call(Ok(Status::ok("done"))).is_ok());

        let (code, message) =
            check_call(Ok(Status::new(StatusCode::NotFound, "gone"))).unwrap_err();
        assert_eq!(StatusCode::NotFound, code);
        assert_eq!("gone", message);

        let (code, message) = check_call(Err(TransportError::new(
            FINISH_TRAJECTORY_SERVICE_NAME,
            "connection refused",
        )))
        .unwrap_err();
        assert_eq!(StatusCode::Unavailable, code);
        assert_eq!(
            "failed to call finish_trajectory: connection refused",
            message
        );
    }

    #[test]
    fn finish_failed_message() {
        let err = RelocalizationError::FinishFailed {
            trajectory_id: TrajectoryId(3),
            code: StatusCode::InvalidArgument,
            message: "Trajectory 3 has already been finished.".to_owned(),
        };
        assert_eq!(
            "Error finishing trajectory 3 - message: 'Trajectory 3 has already been finished.' (status code: 3).",
            err.to_string()
        );
    }
}

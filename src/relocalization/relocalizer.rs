use std::sync::Arc;

use crate::geometry::{relative_pose, yaw, Pose};
use crate::lifecycle::{
    StartTrajectoryRequest, Status, TrajectoryConfiguration, TrajectoryLifecycle,
};
use crate::mapping::{
    PoseGraphQuery, SubmapEntry, SubmapId, TrajectoryId, REFERENCE_TRAJECTORY_ID,
};
use crate::relocalization::counter::TrajectoryCounter;
use crate::relocalization::error::{check_call, RelocalizationError};
use crate::relocalization::estimate::UserPoseEstimate;
use crate::relocalization::nearest_submap::nearest_submap;

/// Start pose of the new trajectory, in both frames.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialPose {
    /// Submap that provided the height.
    pub submap_id: SubmapId,
    pub corrected_z: f64,
    /// Estimate with corrected height, in the map frame.
    pub global_pose: Pose,
    /// `global_pose` in the frame of the first reference trajectory node.
    pub relative_pose: Pose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelocalizationOutcome {
    pub finished_trajectory_id: TrajectoryId,
    /// Set when finishing the previous trajectory failed; the start went ahead anyway.
    pub finish_error: Option<RelocalizationError>,
    pub initial_pose: InitialPose,
    pub start_status: Status,
}

/// Lifts a planar estimate to 3D using the height of the nearest submap and
/// expresses it relative to `reference`.
pub fn compute_initial_pose(
    reference: &Pose,
    submaps: &[SubmapEntry],
    estimate: UserPoseEstimate,
) -> Result<InitialPose, RelocalizationError> {
    let position = estimate.to_pose().translation.vector;
    let submap = nearest_submap(submaps, &position).ok_or(RelocalizationError::NoSubmaps)?;
    let corrected_z = submap.global_pose.translation.z;

    let global_pose = estimate.with_z(corrected_z).to_pose();
    Ok(InitialPose {
        submap_id: submap.id,
        corrected_z,
        relative_pose: relative_pose(reference, &global_pose),
        global_pose,
    })
}

fn report(err: RelocalizationError) -> RelocalizationError {
    log::error!("{err}");
    err
}

/// Ends the running trajectory and restarts it from an operator pose estimate.
///
/// `relocalize` takes `&mut self`: callers that receive estimates concurrently
/// have to funnel them through one owner, see
/// [`RelocalizationWorker`](crate::relocalization::RelocalizationWorker).
pub struct Relocalizer {
    counter: TrajectoryCounter,
    pose_graph: Arc<dyn PoseGraphQuery + Send + Sync>,
    lifecycle: Box<dyn TrajectoryLifecycle + Send>,
    configuration: TrajectoryConfiguration,
}

impl Relocalizer {
    pub fn new(
        pose_graph: Arc<dyn PoseGraphQuery + Send + Sync>,
        lifecycle: Box<dyn TrajectoryLifecycle + Send>,
        configuration: TrajectoryConfiguration,
    ) -> Relocalizer {
        Relocalizer::with_counter(
            TrajectoryCounter::default(),
            pose_graph,
            lifecycle,
            configuration,
        )
    }

    pub fn with_counter(
        counter: TrajectoryCounter,
        pose_graph: Arc<dyn PoseGraphQuery + Send + Sync>,
        lifecycle: Box<dyn TrajectoryLifecycle + Send>,
        configuration: TrajectoryConfiguration,
    ) -> Relocalizer {
        Relocalizer {
            counter,
            pose_graph,
            lifecycle,
            configuration,
        }
    }

    pub fn counter(&self) -> TrajectoryCounter {
        self.counter
    }

    pub fn configuration(&self) -> &TrajectoryConfiguration {
        &self.configuration
    }

    pub fn relocalize(
        &mut self,
        estimate: UserPoseEstimate,
    ) -> Result<RelocalizationOutcome, RelocalizationError> {
        log::info!(
            "Relocalizing at x = {:.3}, y = {:.3}, heading = {:.3}",
            estimate.x(),
            estimate.y(),
            estimate.heading()
        );

        // stop the old trajectory, a failure here must not block the new one
        let finished_trajectory_id = self.counter.advance().map_err(report)?;
        let finish_response = self.lifecycle.finish_trajectory(finished_trajectory_id);
        let finish_error = match check_call(finish_response) {
            Ok(status) => {
                log::info!("{}", status.message);
                None
            }
            Err((code, message)) => Some(report(RelocalizationError::FinishFailed {
                trajectory_id: finished_trajectory_id,
                code,
                message,
            })),
        };

        let reference = self
            .pose_graph
            .trajectory_node_poses(REFERENCE_TRAJECTORY_ID)
            .first()
            .map(|node| node.global_pose)
            .ok_or_else(|| {
                report(RelocalizationError::NoReferenceTrajectory(
                    REFERENCE_TRAJECTORY_ID,
                ))
            })?;

        let submaps = self.pose_graph.all_submap_poses();
        let initial_pose = compute_initial_pose(&reference, &submaps, estimate).map_err(report)?;
        log::debug!(
            "Height {:.3} taken from submap {}",
            initial_pose.corrected_z,
            initial_pose.submap_id
        );

        let request = StartTrajectoryRequest {
            configuration_directory: self.configuration.configuration_directory.clone(),
            configuration_basename: self.configuration.configuration_basename.clone(),
            relative_to_trajectory_id: REFERENCE_TRAJECTORY_ID,
            use_initial_pose: true,
            initial_pose: initial_pose.relative_pose,
        };
        let start_status = check_call(self.lifecycle.start_trajectory(&request))
            .map_err(|(code, message)| {
                report(RelocalizationError::StartFailed { code, message })
            })?;

        let t = &initial_pose.relative_pose.translation;
        log::info!(
            "{} Initial pose relative to trajectory {}: [{:.3}, {:.3}, {:.3}], yaw {:.3}",
            start_status.message,
            REFERENCE_TRAJECTORY_ID,
            t.x,
            t.y,
            t.z,
            yaw(&initial_pose.relative_pose)
        );

        Ok(RelocalizationOutcome {
            finished_trajectory_id,
            finish_error,
            initial_pose,
            start_status,
        })
    }
}

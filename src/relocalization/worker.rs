//! Dedicated thread that owns the [`Relocalizer`].
//!
//! Pose estimates may arrive from any number of producers; they are queued on
//! a channel and handled one at a time, so a finish/start pair never
//! interleaves with another one.

use crossbeam_channel::{unbounded, Receiver, SendError, Sender};
use std::io;
use std::thread::{self, JoinHandle};

use crate::relocalization::error::RelocalizationError;
use crate::relocalization::estimate::UserPoseEstimate;
use crate::relocalization::relocalizer::{RelocalizationOutcome, Relocalizer};

pub type RelocalizationResult = Result<RelocalizationOutcome, RelocalizationError>;

/// Cloneable producer side of the worker queue.
#[derive(Debug, Clone)]
pub struct EstimateSender {
    sender: Sender<UserPoseEstimate>,
}

impl EstimateSender {
    /// Fails only once the worker has stopped.
    pub fn submit(&self, estimate: UserPoseEstimate) -> Result<(), SendError<UserPoseEstimate>> {
        self.sender.send(estimate)
    }
}

pub struct RelocalizationWorker {
    sender: EstimateSender,
    results: Receiver<RelocalizationResult>,
    handle: JoinHandle<Relocalizer>,
}

impl RelocalizationWorker {
    /// Spawn the worker thread, which takes ownership of `relocalizer`.
    pub fn spawn(relocalizer: Relocalizer) -> io::Result<RelocalizationWorker> {
        let (estimate_tx, estimate_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("relocalization".into())
            .spawn(move || run_worker_loop(relocalizer, estimate_rx, result_tx))?;

        Ok(RelocalizationWorker {
            sender: EstimateSender {
                sender: estimate_tx,
            },
            results: result_rx,
            handle,
        })
    }

    pub fn sender(&self) -> EstimateSender {
        self.sender.clone()
    }

    pub fn submit(&self, estimate: UserPoseEstimate) -> Result<(), SendError<UserPoseEstimate>> {
        self.sender.submit(estimate)
    }

    /// Results in submission order, as they complete.
    pub fn results(&self) -> &Receiver<RelocalizationResult> {
        &self.results
    }

    /// Stops accepting estimates, handles everything already queued and joins the thread.
    ///
    /// Returns the relocalizer with its final counter and the results nobody received yet.
    /// Clones of [`EstimateSender`] keep the worker alive until they are dropped.
    pub fn shutdown(self) -> thread::Result<(Relocalizer, Vec<RelocalizationResult>)> {
        let RelocalizationWorker {
            sender,
            results,
            handle,
        } = self;
        drop(sender);
        let relocalizer = handle.join()?;
        Ok((relocalizer, results.try_iter().collect()))
    }
}

fn run_worker_loop(
    mut relocalizer: Relocalizer,
    estimates: Receiver<UserPoseEstimate>,
    results: Sender<RelocalizationResult>,
) -> Relocalizer {
    log::info!("Relocalization worker starting");
    for estimate in estimates.iter() {
        let result = relocalizer.relocalize(estimate);
        // the receiver lives as long as the worker handle
        results.send(result).ok();
    }
    log::info!(
        "Relocalization worker stopping, next trajectory to finish is {}",
        relocalizer.counter().current()
    );
    relocalizer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{planar_pose, Pose};
    use crate::lifecycle::{InMemoryLifecycle, TrajectoryConfiguration, TrajectoryState};
    use crate::mapping::{
        InMemoryPoseGraph, SubmapEntry, SubmapId, TrajectoryId, TrajectoryNode,
        REFERENCE_TRAJECTORY_ID,
    };
    use std::sync::Arc;

    fn relocalizer(lifecycle: &InMemoryLifecycle) -> Relocalizer {
        let mut graph = InMemoryPoseGraph::new();
        graph.add_node(
            REFERENCE_TRAJECTORY_ID,
            TrajectoryNode {
                index: 0,
                timestamp: 0.0,
                global_pose: Pose::identity(),
            },
        );
        graph.add_submap(SubmapEntry {
            id: SubmapId::new(REFERENCE_TRAJECTORY_ID, 0),
            global_pose: planar_pose(0.0, 0.0, 1.5, 0.0),
        });
        Relocalizer::new(
            Arc::new(graph),
            Box::new(lifecycle.clone()),
            TrajectoryConfiguration {
                configuration_directory: "configuration_files".to_owned(),
                configuration_basename: "localization.lua".to_owned(),
            },
        )
    }

    #[test]
    fn handles_estimates_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let lifecycle = InMemoryLifecycle::new();
        let worker = RelocalizationWorker::spawn(relocalizer(&lifecycle))?;
        for i in 0..5 {
            worker.submit(UserPoseEstimate::new(i as f64, 0.0, 0.0)?)?;
        }
        let (relocalizer, results) = worker.shutdown().map_err(|_| "worker panicked")?;

        assert_eq!(TrajectoryId(6), relocalizer.counter().current());
        assert_eq!(5, results.len());
        for (i, result) in results.iter().enumerate() {
            let Ok(outcome) = result else {
                panic!("relocalization {i} failed: {result:?}")
            };
            assert_eq!(TrajectoryId(i as u32 + 1), outcome.finished_trajectory_id);
            assert_eq!(None, outcome.finish_error);
            let translation = &outcome.initial_pose.relative_pose.translation;
            approx::assert_abs_diff_eq!(i as f64, translation.x);
        }
        assert_eq!(vec![TrajectoryId(6)], lifecycle.active_trajectories());
        Ok(())
    }

    #[test]
    fn concurrent_producers_are_serialized() -> Result<(), Box<dyn std::error::Error>> {
        let lifecycle = InMemoryLifecycle::new();
        let worker = RelocalizationWorker::spawn(relocalizer(&lifecycle))?;

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let sender = worker.sender();
                thread::spawn(move || {
                    for i in 0..5 {
                        let estimate = UserPoseEstimate::new(p as f64, i as f64, 0.0).unwrap();
                        sender.submit(estimate).ok();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().map_err(|_| "producer panicked")?;
        }
        let (relocalizer, results) = worker.shutdown().map_err(|_| "worker panicked")?;

        assert_eq!(TrajectoryId(21), relocalizer.counter().current());
        assert_eq!(20, results.len());
        // every finish hit the trajectory the previous event started
        assert!(results
            .iter()
            .all(|r| matches!(r, Ok(outcome) if outcome.finish_error.is_none())));
        assert_eq!(20, lifecycle.started().len());
        assert_eq!(Some(TrajectoryState::Finished), lifecycle.state(TrajectoryId(20)));
        assert_eq!(vec![TrajectoryId(21)], lifecycle.active_trajectories());
        Ok(())
    }

    #[test]
    fn results_can_be_read_while_running() -> Result<(), Box<dyn std::error::Error>> {
        let lifecycle = InMemoryLifecycle::new();
        let worker = RelocalizationWorker::spawn(relocalizer(&lifecycle))?;
        worker.submit(UserPoseEstimate::new(1.0, 2.0, 0.0)?)?;

        let result = worker
            .results()
            .recv_timeout(std::time::Duration::from_secs(5))?;
        let outcome = result?;
        approx::assert_abs_diff_eq!(1.5, outcome.initial_pose.corrected_z);

        let (_, remaining) = worker.shutdown().map_err(|_| "worker panicked")?;
        assert!(remaining.is_empty());
        Ok(())
    }
}

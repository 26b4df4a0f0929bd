use clap::Parser;
use std::error::Error;
use std::io::{BufRead, Write};
use std::sync::Arc;

use relocalization::config::{Args, Settings};
use relocalization::geometry::Pose;
use relocalization::lifecycle::InMemoryLifecycle;
use relocalization::mapping::{load_state, PoseGraphQuery, REFERENCE_TRAJECTORY_ID};
use relocalization::plot::plot_relocalization;
use relocalization::{parse_estimate, RelocalizationResult, RelocalizationWorker, Relocalizer};

// failures were already logged by the relocalizer
fn collect_start(result: &RelocalizationResult, starts: &mut Vec<Pose>) {
    if let Ok(outcome) = result {
        starts.push(outcome.initial_pose.global_pose);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let settings = Settings::from_args(Args::parse())?;
    log::info!(
        "Configuration: {}/{}",
        settings.trajectory.configuration_directory,
        settings.trajectory.configuration_basename
    );

    let pose_graph = Arc::new(load_state(&settings.load_state_directory)?);
    let lifecycle = InMemoryLifecycle::new();
    let relocalizer = Relocalizer::new(
        pose_graph.clone(),
        Box::new(lifecycle.clone()),
        settings.trajectory.clone(),
    );
    let worker = RelocalizationWorker::spawn(relocalizer)?;

    log::info!("Reading pose estimates `x y heading` from stdin");
    let mut starts = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        match parse_estimate(&line, settings.degrees) {
            Ok(estimate) => worker.submit(estimate)?,
            Err(err) => log::error!("Skipping '{}': {err}", line.trim()),
        }
        for result in worker.results().try_iter() {
            collect_start(&result, &mut starts);
        }
    }

    let (relocalizer, remaining) = worker
        .shutdown()
        .map_err(|_| "relocalization worker panicked")?;
    for result in &remaining {
        collect_start(result, &mut starts);
    }
    log::info!(
        "Done, active trajectories: {:?}, next trajectory to finish: {}",
        lifecycle.active_trajectories(),
        relocalizer.counter().current()
    );

    if let Some(path) = &settings.plot {
        plot_relocalization(
            path,
            &pose_graph.trajectory_node_poses(REFERENCE_TRAJECTORY_ID),
            &pose_graph.all_submap_poses(),
            &starts,
        )?;
        log::info!("Plot written to {}", path.display());
    }
    Ok(())
}

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::geometry::{yaw, Pose};
use crate::mapping::{SubmapEntry, TrajectoryNode};

const MARGIN: f64 = 1.0;
const HEADING_LENGTH: f64 = 0.5;

/// Axis ranges covering every point, padded by a margin.
pub fn plot_bounds<I: IntoIterator<Item = (f64, f64)>>(points: I) -> (f64, f64, f64, f64) {
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    );
    for (x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_x > max_x || min_y > max_y {
        return (-MARGIN, MARGIN, -MARGIN, MARGIN);
    }
    (min_x - MARGIN, max_x + MARGIN, min_y - MARGIN, max_y + MARGIN)
}

fn xy(pose: &Pose) -> (f64, f64) {
    (pose.translation.x, pose.translation.y)
}

/// Top view of the reference trajectory, the submap origins and the start
/// poses (map frame) of the relocalized trajectories.
pub fn plot_relocalization(
    path: &Path,
    reference: &[TrajectoryNode],
    submaps: &[SubmapEntry],
    starts: &[Pose],
) -> Result<(), Box<dyn Error>> {
    let (min_x, max_x, min_y, max_y) = plot_bounds(
        reference
            .iter()
            .map(|n| xy(&n.global_pose))
            .chain(submaps.iter().map(|s| xy(&s.global_pose)))
            .chain(starts.iter().map(xy)),
    );

    let root = SVGBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Relocalization", ("sans-serif", 30))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)?;

    chart.configure_mesh().draw()?;

    chart
        .draw_series(LineSeries::new(
            reference.iter().map(|n| xy(&n.global_pose)),
            &BLUE,
        ))?
        .label("Reference trajectory")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(
            submaps
                .iter()
                .map(|s| Circle::new(xy(&s.global_pose), 4, RED.filled())),
        )?
        .label("Submaps")
        .legend(|(x, y)| Circle::new((x, y), 4, RED.filled()));

    chart
        .draw_series(starts.iter().map(|pose| {
            let (x, y) = xy(pose);
            let heading = yaw(pose);
            PathElement::new(
                vec![
                    (x, y),
                    (
                        x + HEADING_LENGTH * heading.cos(),
                        y + HEADING_LENGTH * heading.sin(),
                    ),
                ],
                GREEN.stroke_width(2),
            )
        }))?
        .label("Initial poses")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

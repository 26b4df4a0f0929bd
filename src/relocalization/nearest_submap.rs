use nalgebra::Vector3;

use crate::geometry::planar_distance;
use crate::mapping::SubmapEntry;

/// Submap whose origin is horizontally closest to `position`.
///
/// Ties keep the first submap in iteration order; with ordered pose graph
/// output that is the lowest [`SubmapId`](crate::mapping::SubmapId).
/// Submaps with a non-finite distance or height are skipped.
pub fn nearest_submap<'a>(
    submaps: &'a [SubmapEntry],
    position: &Vector3<f64>,
) -> Option<&'a SubmapEntry> {
    let mut best: Option<(&SubmapEntry, f64)> = None;
    for submap in submaps {
        let distance = planar_distance(&submap.global_pose.translation.vector, position);
        if !(distance.is_finite() && submap.global_pose.translation.z.is_finite()) {
            continue;
        }
        if best.map_or(true, |(_, min_distance)| distance < min_distance) {
            best = Some((submap, distance));
        }
    }
    best.map(|(submap, _)| submap)
}

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};

/// Rigid 3D transform: translation + unit quaternion.
pub type Pose = Isometry3<f64>;

/// Pose from a translation and an `x, y, z, w` quaternion (ROS message order).
///
/// The quaternion is normalized, so slightly denormalized values read from disk are accepted.
pub fn iso3(x: f64, y: f64, z: f64, qx: f64, qy: f64, qz: f64, qw: f64) -> Pose {
    let translation = Translation3::new(x, y, z);
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(qw, qx, qy, qz));
    Isometry3::from_parts(translation, rotation)
}

/// Pose with roll = pitch = 0 and the given heading around +Z.
pub fn planar_pose(x: f64, y: f64, z: f64, yaw: f64) -> Pose {
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw),
    )
}

pub fn yaw(pose: &Pose) -> f64 {
    let (_roll, _pitch, yaw) = pose.rotation.euler_angles();
    yaw
}

/// Horizontal distance between two positions, the Z term is ignored.
pub fn planar_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let mut delta = a - b;
    delta.z = 0.0;
    delta.norm()
}

/// `pose` expressed in the local frame of `reference`.
pub fn relative_pose(reference: &Pose, pose: &Pose) -> Pose {
    reference.inverse() * pose
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn iso3_uses_xyzw_order() {
        // 90 degrees around Z
        let s = (FRAC_PI_2 / 2.0).sin();
        let c = (FRAC_PI_2 / 2.0).cos();
        let pose = iso3(1.0, 2.0, 3.0, 0.0, 0.0, s, c);
        approx::assert_abs_diff_eq!(FRAC_PI_2, yaw(&pose), epsilon = 1e-9);
        approx::assert_abs_diff_eq!(
            Vector3::new(1.0, 2.0, 3.0),
            pose.translation.vector,
            epsilon = 1e-12
        );
    }

    #[test]
    fn iso3_normalizes_rotation() {
        let pose = iso3(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0);
        approx::assert_abs_diff_eq!(1.0, pose.rotation.norm(), epsilon = 1e-12);
        approx::assert_abs_diff_eq!(0.0, pose.rotation.angle(), epsilon = 1e-6);
    }

    #[test]
    fn planar_pose_has_no_roll_or_pitch() {
        let pose = planar_pose(1.0, -1.0, 0.5, 2.5);
        let (roll, pitch, yaw) = pose.rotation.euler_angles();
        approx::assert_abs_diff_eq!(0.0, roll, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(0.0, pitch, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(2.5, yaw, epsilon = 1e-12);
    }

    #[test]
    fn planar_distance_ignores_height() {
        let a = Vector3::new(0.0, 0.0, 100.0);
        let b = Vector3::new(3.0, 4.0, -7.0);
        approx::assert_abs_diff_eq!(5.0, planar_distance(&a, &b), epsilon = 1e-12);
    }

    #[test]
    fn relative_pose_of_reference_is_identity() {
        let reference = planar_pose(4.0, 2.0, 1.0, 0.3);
        let rel = relative_pose(&reference, &reference);
        approx::assert_abs_diff_eq!(Vector3::zeros(), rel.translation.vector, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(0.0, rel.rotation.angle(), epsilon = 1e-6);
    }

    #[test]
    fn relative_pose_in_rotated_frame() {
        // reference looks along +Y, a point 1m ahead of it is at +X in its frame
        let reference = planar_pose(1.0, 1.0, 0.0, FRAC_PI_2);
        let pose = planar_pose(1.0, 2.0, 0.0, FRAC_PI_2);
        let rel = relative_pose(&reference, &pose);
        approx::assert_abs_diff_eq!(
            Vector3::new(1.0, 0.0, 0.0),
            rel.translation.vector,
            epsilon = 1e-12
        );
        approx::assert_abs_diff_eq!(0.0, rel.rotation.angle(), epsilon = 1e-6);
    }
}

use crate::{
    collision::{Quat, Vec3},
    constants::DIST_EPS,
};

/// Yaw (radians about +Y) that turns local +Z onto the planar direction `xz`.
///
/// Returns `None` when the planar direction is too small to define a heading.
pub fn yaw_from_xz(x: f32, z: f32) -> Option<f32> {
    if x * x + z * z > DIST_EPS * DIST_EPS {
        return Some(x.atan2(z));
    }

    None
}

/// Yaw-only rotation about +Y.
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), yaw)
}

/// Planar (XZ) projection of `v`, normalized. Zero when `v` has no planar component.
#[inline]
pub fn planar_dir(v: Vec3) -> Vec3 {
    let flat = Vec3::new(v.x, 0.0, v.z);
    let len = flat.norm();
    if len <= DIST_EPS {
        Vec3::zeros()
    } else {
        flat / len
    }
}

/// Cubic ease-in-out on `t` in `[0, 1]`.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    #[test]
    fn yaw_matches_heading_convention() {
        // +Z is yaw 0, +X is a quarter turn.
        assert!(yaw_from_xz(0.0, 1.0).unwrap().abs() < 1.0e-6);
        assert!((yaw_from_xz(1.0, 0.0).unwrap() - PI / 2.0).abs() < 1.0e-6);
        assert!(yaw_from_xz(0.0, 0.0).is_none());
    }

    #[test]
    fn yaw_rotation_faces_heading() {
        let q = yaw_rotation(yaw_from_xz(1.0, 1.0).unwrap());
        let fwd = q * Vec3::z();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((fwd - expected).norm() < 1.0e-5);
    }

    #[test]
    fn ease_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1.0e-6);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }
}

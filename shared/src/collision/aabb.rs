use nalgebra as na;
use rapier3d::parry::shape as pshape;

use super::types::{Aabb, Pose, Vec3};

/// Compute the world-space AABB of an oriented box.
///
/// `half_extents` are local to the pose; a rotated box yields the smallest
/// axis-aligned box that contains it.
#[inline]
pub fn compute_aabb(pose: &Pose, half_extents: Vec3) -> Aabb {
    let cuboid = pshape::Cuboid::new(half_extents);
    cuboid.aabb(&pose.iso())
}

/// Compute a yaw-invariant AABB: the box centered at `center` with
/// `half_extents` used as-is, ignoring orientation.
///
/// Used for the avatar so turning in place can never push its bounds into a wall.
#[inline]
pub fn upright_aabb(center: Vec3, half_extents: Vec3) -> Aabb {
    Aabb {
        mins: na::Point3::from(center - half_extents),
        maxs: na::Point3::from(center + half_extents),
    }
}

/// Closed-interval overlap test on all three axes.
///
/// Touching faces count as an intersection.
#[inline]
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    !(a.maxs.x < b.mins.x
        || a.mins.x > b.maxs.x
        || a.maxs.y < b.mins.y
        || a.mins.y > b.maxs.y
        || a.maxs.z < b.mins.z
        || a.mins.z > b.maxs.z)
}

/// Scale an AABB about its own center by `factor`.
pub fn scaled_about_center(a: &Aabb, factor: f32) -> Aabb {
    let center = na::center(&a.mins, &a.maxs);
    let half = (a.maxs - a.mins) * 0.5 * factor.max(0.0);
    Aabb {
        mins: center - half,
        maxs: center + half,
    }
}

/// Whether `p` lies inside `a` (boundary inclusive).
#[inline]
pub fn contains_point(a: &Aabb, p: &Vec3) -> bool {
    p.x >= a.mins.x
        && p.x <= a.maxs.x
        && p.y >= a.mins.y
        && p.y <= a.maxs.y
        && p.z >= a.mins.z
        && p.z <= a.maxs.z
}

/// Full size of the box along each axis.
#[inline]
pub fn size(a: &Aabb) -> Vec3 {
    a.maxs - a.mins
}

/// Center of the box.
#[inline]
pub fn center(a: &Aabb) -> Vec3 {
    na::center(&a.mins, &a.maxs).coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn unit_box(x: f32, y: f32, z: f32) -> Aabb {
        upright_aabb(Vec3::new(x, y, z), Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn touching_faces_intersect() {
        let a = unit_box(0.0, 0.0, 0.0);
        let b = unit_box(1.0, 0.0, 0.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn separated_on_one_axis_does_not_intersect() {
        let a = unit_box(0.0, 0.0, 0.0);
        let b = unit_box(0.0, 0.0, 1.001);
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn rotated_box_swaps_horizontal_extents() {
        let pose = Pose::new(Vec3::zeros(), Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2));
        let aabb = compute_aabb(&pose, Vec3::new(2.0, 1.0, 0.5));
        let s = size(&aabb);
        assert!((s.x - 1.0).abs() < 1.0e-4);
        assert!((s.y - 2.0).abs() < 1.0e-4);
        assert!((s.z - 4.0).abs() < 1.0e-4);
    }

    #[test]
    fn scaling_keeps_center_and_grows_size() {
        let a = unit_box(3.0, 1.0, -2.0);
        let big = scaled_about_center(&a, 1.5);
        assert!((center(&big) - Vec3::new(3.0, 1.0, -2.0)).norm() < 1.0e-6);
        assert!((size(&big) - Vec3::new(1.5, 1.5, 1.5)).norm() < 1.0e-6);
    }

    #[test]
    fn contains_point_is_inclusive() {
        let a = unit_box(0.0, 0.0, 0.0);
        assert!(contains_point(&a, &Vec3::new(0.5, 0.0, -0.5)));
        assert!(!contains_point(&a, &Vec3::new(0.51, 0.0, 0.0)));
    }
}

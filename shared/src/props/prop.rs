use std::f32::consts::FRAC_PI_2;

use crate::{
    collision::{Aabb, Pose, Quat, Vec3, compute_aabb},
    config::PropCategory,
    utils::{yaw_from_xz, yaw_rotation},
};

/// Kick lifecycle of a prop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KickState {
    #[default]
    AtRest,
    /// Kicked this tick; tips over on the next advance.
    Launched,
    Tumbling,
    /// Easing onto the ground after the trajectory completed.
    Settling,
}

impl KickState {
    /// Whether the prop is travelling along its kick trajectory.
    #[inline]
    pub fn in_flight(self) -> bool {
        matches!(self, KickState::Launched | KickState::Tumbling)
    }
}

/// A loose, kickable object (bottle, can, trash bag).
#[derive(Clone, Copy, Debug)]
pub struct Prop {
    pub pose: Pose,
    pub half_extents: Vec3,
    pub category: PropCategory,
    pub(crate) state: KickState,
    pub(crate) start: Vec3,
    pub(crate) end: Vec3,
    /// Seconds since launch while in flight, since settle start while settling.
    pub(crate) elapsed: f32,
    pub(crate) settle_from: Pose,
    pub(crate) settle_to: Pose,
    pub(crate) settled: bool,
    /// Heading and roll of the tumble, reapplied every tick.
    pub(crate) yaw: f32,
    pub(crate) roll: f32,
}

impl Prop {
    pub fn new(pose: Pose, half_extents: Vec3, category: PropCategory) -> Self {
        Self {
            pose,
            half_extents,
            category,
            state: KickState::AtRest,
            start: pose.translation,
            end: pose.translation,
            elapsed: 0.0,
            settle_from: pose,
            settle_to: pose,
            settled: false,
            yaw: 0.0,
            roll: 0.0,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        compute_aabb(&self.pose, self.half_extents)
    }

    #[inline]
    pub fn state(&self) -> KickState {
        self.state
    }

    /// True once the prop has completed a settle.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Settled props at rest block the avatar and other kicked props.
    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.settled && self.state == KickState::AtRest
    }

    /// Trajectory endpoints of the current or last kick.
    #[inline]
    pub fn trajectory(&self) -> (Vec3, Vec3) {
        (self.start, self.end)
    }

    /// Start a kick along the planar unit `direction`.
    pub(crate) fn launch(&mut self, direction: Vec3, kick_force: f32) {
        let forward = self.pose.forward();
        self.yaw = yaw_from_xz(forward.x, forward.z).unwrap_or(0.0);
        self.roll = 0.0;
        self.start = self.pose.translation;
        self.end = self.start + direction * kick_force;
        self.elapsed = 0.0;
        self.state = KickState::Launched;
    }

    /// Return to rest where the prop currently stands.
    pub(crate) fn abort(&mut self) {
        self.elapsed = 0.0;
        self.state = KickState::AtRest;
    }

    /// Translate the prop, dragging an active trajectory along.
    pub(crate) fn shift(&mut self, delta: Vec3) {
        self.pose.translation += delta;
        if self.state.in_flight() {
            self.start += delta;
            self.end += delta;
        }
    }
}

/// Tipped-over orientation: heading `yaw`, pitched onto its side, rolled by `roll`.
#[inline]
pub(crate) fn tumble_rotation(yaw: f32, roll: f32) -> Quat {
    yaw_rotation(yaw)
        * Quat::from_axis_angle(&Vec3::x_axis(), FRAC_PI_2)
        * Quat::from_axis_angle(&Vec3::y_axis(), roll)
}

/// Lying-flat orientation chosen from the tumbling box's world size.
///
/// The prop is laid about Z when it is at least as wide in X as in Z, about X otherwise.
pub(crate) fn lay_flat_rotation(aabb_size: Vec3, yaw: f32) -> Quat {
    let axis = if aabb_size.x >= aabb_size.z {
        Vec3::z_axis()
    } else {
        Vec3::x_axis()
    };
    Quat::from_axis_angle(&axis, FRAC_PI_2) * yaw_rotation(yaw)
}

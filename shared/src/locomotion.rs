use crate::{
    collision::{
        Aabb, CollisionScene, EntityId, Pose, Quat, SlowZone, Vec3, slow_zone_multiplier,
        upright_aabb,
    },
    config::{IntentFrame, LocomotionConfig},
    input::Intent,
    utils::{planar_dir, yaw_from_xz, yaw_rotation},
};

/// Per-tick locomotion outcome, also read by the animation machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocomotionState {
    #[default]
    Idle,
    Walking,
    WalkingBackward,
    Blocked,
}

/// The single controllable character.
#[derive(Clone, Copy, Debug)]
pub struct Avatar {
    pub pose: Pose,
    pub half_extents: Vec3,
    pub state: LocomotionState,
}

impl Avatar {
    pub fn new(pose: Pose, half_extents: Vec3) -> Self {
        Self {
            pose,
            half_extents,
            state: LocomotionState::Idle,
        }
    }

    /// Collision box at the current position. Orientation is ignored.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.pose.translation)
    }

    #[inline]
    pub fn aabb_at(&self, translation: Vec3) -> Aabb {
        upright_aabb(translation, self.half_extents)
    }
}

/// Output of a single `step_locomotion()` tick.
#[derive(Clone, Copy, Debug)]
pub struct StepLocomotionResult {
    pub new_pose: Pose,
    pub state: LocomotionState,
}

/// Perform one locomotion tick for `avatar`.
///
/// Behavior
/// - Zero intent leaves the pose untouched and reports `Idle`.
/// - Step length is `base_speed * dt`, scaled by the lowest multiplier of any slow
///   zone containing the avatar center.
/// - Forward/strafe is resolved as one candidate, backward as a second candidate along
///   the avatar's local backward axis. Each is validated on its own against the scene
///   and either committed whole or rejected whole.
/// - Orientation turns toward the forward/strafe heading by `turn_rate` per tick, even
///   when blocked. Backward-only walking keeps the orientation.
pub fn step_locomotion(
    scene: &CollisionScene<'_>,
    zones: &[SlowZone],
    avatar: &Avatar,
    intent: Intent,
    config: &LocomotionConfig,
    dt_seconds: f32,
) -> StepLocomotionResult {
    if intent.is_zero() {
        return StepLocomotionResult {
            new_pose: avatar.pose,
            state: LocomotionState::Idle,
        };
    }

    let start = avatar.pose;
    let multiplier = slow_zone_multiplier(zones, &start.translation, config.slow_zone_multiplier)
        .unwrap_or(1.0);
    let step = config.base_speed.max(0.0) * dt_seconds.max(0.0) * multiplier;

    let mut position = start.translation;
    let mut blocked = false;

    let planar_world = planar_world_direction(&start.rotation, intent, config.intent_frame);
    if planar_world != Vec3::zeros() {
        match try_move(scene, avatar, position, planar_world * step) {
            Some(p) => position = p,
            None => blocked = true,
        }
    }

    // The backward move is computed from the start-of-tick orientation, not the
    // one this tick turns toward.
    if intent.backward {
        let backward = planar_dir(start.rotation * -Vec3::z());
        match try_move(scene, avatar, position, backward * step) {
            Some(p) => position = p,
            None => blocked = true,
        }
    }

    let rotation = match yaw_from_xz(planar_world.x, planar_world.z) {
        Some(yaw) => start.rotation.slerp(&yaw_rotation(yaw), config.turn_rate),
        None => start.rotation,
    };

    let state = if blocked {
        LocomotionState::Blocked
    } else if planar_world == Vec3::zeros() {
        LocomotionState::WalkingBackward
    } else {
        LocomotionState::Walking
    };

    StepLocomotionResult {
        new_pose: Pose::new(position, rotation),
        state,
    }
}

/// World-space unit direction of the forward/strafe intent, or zero.
///
/// Local frame: avatar faces +Z, so its right hand points at -X.
/// World frame: forward is -Z, right is +X.
fn planar_world_direction(rotation: &Quat, intent: Intent, frame: IntentFrame) -> Vec3 {
    let v = intent.planar;
    if v.x == 0.0 && v.y == 0.0 {
        return Vec3::zeros();
    }

    let dir = match frame {
        IntentFrame::Local => rotation * Vec3::new(-v.x, 0.0, v.y),
        IntentFrame::World => Vec3::new(v.x, 0.0, -v.y),
    };
    planar_dir(dir)
}

/// Returns the committed position, or `None` if the candidate box hits anything.
#[inline]
fn try_move(
    scene: &CollisionScene<'_>,
    avatar: &Avatar,
    from: Vec3,
    delta: Vec3,
) -> Option<Vec3> {
    let candidate = from + delta;
    if scene.query_static(&avatar.aabb_at(candidate), Some(EntityId::Avatar)) {
        None
    } else {
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::{StaticCollider, Vec2, intersects},
        constants::DEFAULT_AVATAR_HALF_EXTENTS,
    };

    const DT: f32 = 1.0 / 60.0;

    fn avatar_at(translation: Vec3) -> Avatar {
        Avatar::new(
            Pose::from_translation(translation),
            Vec3::from(DEFAULT_AVATAR_HALF_EXTENTS),
        )
    }

    fn forward() -> Intent {
        Intent {
            planar: Vec2::new(0.0, 1.0),
            backward: false,
        }
    }

    fn step(
        statics: &[StaticCollider],
        zones: &[SlowZone],
        avatar: &Avatar,
        intent: Intent,
        config: &LocomotionConfig,
    ) -> StepLocomotionResult {
        let scene = CollisionScene::new(statics, &[]);
        step_locomotion(&scene, zones, avatar, intent, config, DT)
    }

    #[test]
    fn blocked_candidate_leaves_position_exactly_unchanged() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let candidate = Vec3::new(0.0, 0.0, config.base_speed * DT);
        let statics = [StaticCollider::new(
            Pose::from_translation(candidate),
            avatar.half_extents,
        )];

        let out = step(&statics, &[], &avatar, forward(), &config);
        assert_eq!(out.state, LocomotionState::Blocked);
        assert_eq!(out.new_pose.translation, Vec3::zeros());
    }

    #[test]
    fn zero_intent_is_idle_and_still() {
        let avatar = Avatar::new(
            Pose::from_yaw(Vec3::new(1.0, 0.0, 2.0), 0.4),
            Vec3::from(DEFAULT_AVATAR_HALF_EXTENTS),
        );
        let out = step(&[], &[], &avatar, Intent::default(), &LocomotionConfig::default());
        assert_eq!(out.state, LocomotionState::Idle);
        assert_eq!(out.new_pose, avatar.pose);
    }

    #[test]
    fn forward_walks_along_local_z() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let out = step(&[], &[], &avatar, forward(), &config);
        assert_eq!(out.state, LocomotionState::Walking);
        let expected = Vec3::new(0.0, 0.0, config.base_speed * DT);
        assert!((out.new_pose.translation - expected).norm() < 1.0e-6);
    }

    #[test]
    fn world_frame_forward_walks_along_negative_z() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig {
            intent_frame: IntentFrame::World,
            ..Default::default()
        };
        let out = step(&[], &[], &avatar, forward(), &config);
        assert!(out.new_pose.translation.z < 0.0);
        assert!(out.new_pose.translation.x.abs() < 1.0e-6);
    }

    #[test]
    fn backward_only_keeps_orientation() {
        let avatar = Avatar::new(
            Pose::from_yaw(Vec3::zeros(), 0.7),
            Vec3::from(DEFAULT_AVATAR_HALF_EXTENTS),
        );
        let intent = Intent {
            planar: Vec2::zeros(),
            backward: true,
        };
        let out = step(&[], &[], &avatar, intent, &LocomotionConfig::default());
        assert_eq!(out.state, LocomotionState::WalkingBackward);
        assert_eq!(out.new_pose.rotation, avatar.pose.rotation);
        let moved = out.new_pose.translation - avatar.pose.translation;
        assert!(moved.dot(&avatar.pose.forward()) < 0.0);
    }

    fn wall_between(mins: Vec3, maxs: Vec3) -> StaticCollider {
        StaticCollider::new(Pose::from_translation((mins + maxs) / 2.0), (maxs - mins) / 2.0)
    }

    #[test]
    fn forward_and_backward_together_cancel_out() {
        let avatar = avatar_at(Vec3::zeros());
        let intent = Intent {
            planar: Vec2::new(0.0, 1.0),
            backward: true,
        };
        let out = step(&[], &[], &avatar, intent, &LocomotionConfig::default());
        assert_eq!(out.state, LocomotionState::Walking);
        assert!(out.new_pose.translation.norm() < 1.0e-6);
    }

    #[test]
    fn blocked_forward_still_commits_backward() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let step_len = config.base_speed * DT;
        let h = avatar.half_extents;
        // Just past the current box, inside the forward candidate.
        let front = h.z + step_len * 0.5;
        let statics = [wall_between(
            Vec3::new(-2.0, -2.0, front),
            Vec3::new(2.0, 2.0, front + 1.0),
        )];
        let intent = Intent {
            planar: Vec2::new(0.0, 1.0),
            backward: true,
        };

        let out = step(&statics, &[], &avatar, intent, &config);
        assert_eq!(out.state, LocomotionState::Blocked);
        let expected = Vec3::new(0.0, 0.0, -step_len);
        assert!((out.new_pose.translation - expected).norm() < 1.0e-6);
    }

    #[test]
    fn blocked_backward_keeps_committed_strafe() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let step_len = config.base_speed * DT;
        let h = avatar.half_extents;
        // Behind and to the avatar's right (-X): clear of the start box and the
        // strafe candidate, but hit by the backward move that follows the strafe.
        let statics = [wall_between(
            Vec3::new(-5.0, -2.0, -5.0),
            Vec3::new(-h.x - step_len * 0.5, 2.0, -h.z - step_len * 0.5),
        )];
        let intent = Intent {
            planar: Vec2::new(1.0, 0.0),
            backward: true,
        };

        let out = step(&statics, &[], &avatar, intent, &config);
        assert_eq!(out.state, LocomotionState::Blocked);
        let expected = Vec3::new(-step_len, 0.0, 0.0);
        assert!((out.new_pose.translation - expected).norm() < 1.0e-6);
    }

    #[test]
    fn world_frame_reversal_turns_by_turn_rate() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig {
            intent_frame: IntentFrame::World,
            ..Default::default()
        };
        // Facing +Z, asked to walk toward -Z: a half turn away.
        let out = step(&[], &[], &avatar, forward(), &config);
        let angle = out.new_pose.rotation.angle();
        assert!((angle - std::f32::consts::PI * config.turn_rate).abs() < 1.0e-4);
    }

    #[test]
    fn strafe_turns_toward_heading_by_turn_rate() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let intent = Intent {
            planar: Vec2::new(1.0, 0.0),
            backward: false,
        };
        let out = step(&[], &[], &avatar, intent, &config);
        // Right of an avatar facing +Z is -X, i.e. yaw -PI/2.
        assert!(out.new_pose.translation.x < 0.0);
        let angle = out.new_pose.rotation.angle();
        let expected = std::f32::consts::FRAC_PI_2 * config.turn_rate;
        assert!((angle - expected).abs() < 1.0e-4);
    }

    #[test]
    fn blocked_still_turns() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let statics = [StaticCollider::new(
            Pose::from_translation(Vec3::new(-0.5, 0.0, 0.0)),
            Vec3::new(0.2, 1.0, 1.0),
        )];
        let intent = Intent {
            planar: Vec2::new(1.0, 0.0),
            backward: false,
        };
        let out = step(&statics, &[], &avatar, intent, &config);
        assert_eq!(out.state, LocomotionState::Blocked);
        assert_eq!(out.new_pose.translation, Vec3::zeros());
        assert!(out.new_pose.rotation.angle() > 0.0);
    }

    #[test]
    fn slow_zone_scales_step() {
        let avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let zones = [SlowZone {
            pose: Pose::default(),
            half_extents: Vec3::new(5.0, 5.0, 5.0),
            multiplier: None,
        }];
        let out = step(&[], &zones, &avatar, forward(), &config);
        let expected = config.base_speed * DT * config.slow_zone_multiplier;
        assert!((out.new_pose.translation.z - expected).abs() < 1.0e-6);
    }

    #[test]
    fn walking_into_wall_never_penetrates() {
        let mut avatar = avatar_at(Vec3::zeros());
        let config = LocomotionConfig::default();
        let statics = [StaticCollider::new(
            Pose::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            Vec3::new(2.0, 2.0, 0.25),
        )];
        let wall = statics[0].aabb();

        let mut saw_blocked = false;
        for _ in 0..120 {
            let before = avatar.pose.translation;
            let out = step(&statics, &[], &avatar, forward(), &config);
            if out.state == LocomotionState::Blocked {
                saw_blocked = true;
                assert_eq!(out.new_pose.translation, before);
            }
            avatar.pose = out.new_pose;
            assert!(!intersects(&avatar.aabb(), &wall));
        }
        assert!(saw_blocked);
    }
}

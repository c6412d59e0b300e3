/*!
Kick animator: trigger, flight, settle.

A kick runs across many ticks. Each prop carries its own elapsed counter and
the simulation advances it once per tick; nothing reschedules itself.

Notes:
- Trigger uses the avatar box scaled by the prop category's trigger scale.
- Flight lerps from start to end over `kick_secs` with the vertical clamped to
  the category ground height, and re-checks the scene every tick. A hit aborts
  the kick in place.
- Settle eases position and orientation onto the ground over `settle_secs`,
  then adds a little random yaw/roll so piles don't look stamped.
*/

use rand::Rng;

use super::{
    kick::KickCoordinator,
    prop::{KickState, Prop, lay_flat_rotation, tumble_rotation},
};
use crate::{
    collision::{
        CollisionScene, EntityId, Pose, Quat, StaticCollider, Vec3, aabb, compute_aabb,
        intersects, scaled_about_center,
    },
    config::PropsConfig,
    locomotion::Avatar,
    utils::{ease_in_out_cubic, planar_dir, yaw_rotation},
};

/// Launch the first at-rest prop the avatar's trigger box touches, if the lock is free.
///
/// Returns the index of the launched prop.
pub fn try_trigger(
    props: &mut [Prop],
    avatar: &Avatar,
    coordinator: &mut KickCoordinator,
    config: &PropsConfig,
) -> Option<usize> {
    if !coordinator.is_free() {
        return None;
    }

    let direction = planar_dir(avatar.pose.forward());
    if direction == Vec3::zeros() {
        return None;
    }

    let avatar_box = avatar.aabb();
    let index = props.iter().position(|p| {
        let tuning = config.tuning(p.category);
        p.state == KickState::AtRest
            && intersects(
                &scaled_about_center(&avatar_box, tuning.trigger_scale),
                &p.aabb(),
            )
    })?;

    coordinator.acquire(EntityId::Prop(index as u32)).ok()?;
    let kick_force = config.tuning(props[index].category).kick_force;
    props[index].launch(direction, kick_force);
    log::debug!("prop {index} kicked toward {direction:?}");
    Some(index)
}

/// Advance every in-flight or settling prop by `dt_seconds`.
pub fn advance_kicks<R: Rng + ?Sized>(
    statics: &[StaticCollider],
    props: &mut [Prop],
    coordinator: &mut KickCoordinator,
    config: &PropsConfig,
    rng: &mut R,
    dt_seconds: f32,
) {
    let dt = dt_seconds.max(0.0);
    for i in 0..props.len() {
        match props[i].state {
            KickState::Launched | KickState::Tumbling => {
                advance_flight(statics, props, i, coordinator, config, rng, dt)
            }
            KickState::Settling => advance_settle(&mut props[i], i, coordinator, config, rng, dt),
            KickState::AtRest => {}
        }
    }
}

fn advance_flight<R: Rng + ?Sized>(
    statics: &[StaticCollider],
    props: &mut [Prop],
    i: usize,
    coordinator: &mut KickCoordinator,
    config: &PropsConfig,
    rng: &mut R,
    dt: f32,
) {
    let id = EntityId::Prop(i as u32);
    let prop = &props[i];
    let ground = config.tuning(prop.category).ground_height;

    let elapsed = prop.elapsed + dt;
    let fraction = (elapsed / config.kick_secs).clamp(0.0, 1.0);
    let mut position = prop.start.lerp(&prop.end, fraction);
    position.y = position.y.max(ground);

    let (yaw, roll) = if prop.state == KickState::Launched {
        (prop.yaw, 0.0)
    } else {
        let jitter = config.roll_jitter;
        let roll = if jitter > 0.0 {
            prop.roll + rng.random_range(-jitter..=jitter)
        } else {
            prop.roll
        };
        (
            prop.yaw + config.spin_rate * dt,
            roll.clamp(-config.max_tilt, config.max_tilt),
        )
    };
    let candidate = Pose::new(position, tumble_rotation(yaw, roll));
    let candidate_box = compute_aabb(&candidate, prop.half_extents);

    if CollisionScene::new(statics, props).query_static(&candidate_box, Some(id)) {
        props[i].abort();
        release(coordinator, id);
        log::debug!("prop {i} kick aborted on collision at {:?}", props[i].pose.translation);
        return;
    }

    let prop = &mut props[i];
    prop.pose = candidate;
    prop.elapsed = elapsed;
    prop.yaw = yaw;
    prop.roll = roll;
    prop.state = KickState::Tumbling;

    if fraction >= 1.0 {
        let target = Pose::new(
            Vec3::new(position.x, ground, position.z),
            lay_flat_rotation(aabb::size(&candidate_box), yaw),
        );
        prop.settle_from = candidate;
        prop.settle_to = target;
        prop.elapsed = 0.0;
        prop.state = KickState::Settling;
    }
}

fn advance_settle<R: Rng + ?Sized>(
    prop: &mut Prop,
    i: usize,
    coordinator: &mut KickCoordinator,
    config: &PropsConfig,
    rng: &mut R,
    dt: f32,
) {
    prop.elapsed += dt;
    let t = (prop.elapsed / config.settle_secs).clamp(0.0, 1.0);

    if t < 1.0 {
        let e = ease_in_out_cubic(t);
        prop.pose = Pose::new(
            prop.settle_from.translation.lerp(&prop.settle_to.translation, e),
            prop.settle_from.rotation.slerp(&prop.settle_to.rotation, e),
        );
        return;
    }

    let (jitter_yaw, jitter_roll) = if config.rest_jitter > 0.0 {
        let j = config.rest_jitter;
        (rng.random_range(-j..=j), rng.random_range(-j..=j))
    } else {
        (0.0, 0.0)
    };
    prop.pose = Pose::new(
        prop.settle_to.translation,
        yaw_rotation(jitter_yaw)
            * prop.settle_to.rotation
            * Quat::from_axis_angle(&Vec3::z_axis(), jitter_roll),
    );
    prop.elapsed = 0.0;
    prop.state = KickState::AtRest;
    prop.settled = true;
    release(coordinator, EntityId::Prop(i as u32));
}

fn release(coordinator: &mut KickCoordinator, id: EntityId) {
    if let Err(err) = coordinator.release(id) {
        log::warn!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::{Pose, Vec2, upright_aabb},
        config::{LocomotionConfig, PropCategory},
        constants::DEFAULT_AVATAR_HALF_EXTENTS,
        input::Intent,
        locomotion::{LocomotionState, step_locomotion},
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    fn avatar_at(translation: Vec3) -> Avatar {
        Avatar::new(
            Pose::from_translation(translation),
            Vec3::from(DEFAULT_AVATAR_HALF_EXTENTS),
        )
    }

    fn bottle_at(translation: Vec3) -> Prop {
        Prop::new(
            Pose::from_translation(translation),
            Vec3::new(0.1, 0.25, 0.1),
            PropCategory::Bottle,
        )
    }

    fn run_ticks(
        statics: &[StaticCollider],
        props: &mut [Prop],
        lock: &mut KickCoordinator,
        config: &PropsConfig,
        ticks: usize,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..ticks {
            advance_kicks(statics, props, lock, config, &mut rng, DT);
        }
    }

    #[test]
    fn kick_runs_to_settled_rest_on_ground() {
        let config = PropsConfig::default();
        let avatar = avatar_at(Vec3::zeros());
        let mut props = [bottle_at(Vec3::new(0.0, 0.1, 0.35))];
        let mut lock = KickCoordinator::new();

        assert_eq!(try_trigger(&mut props, &avatar, &mut lock, &config), Some(0));
        let (start, end) = props[0].trajectory();
        assert!((end - start - Vec3::new(0.0, 0.0, 7.8)).norm() < 1.0e-5);

        let ticks = ((config.kick_secs + config.settle_secs) / DT).ceil() as usize + 5;
        run_ticks(&[], &mut props, &mut lock, &config, ticks);

        let prop = &props[0];
        assert_eq!(prop.state(), KickState::AtRest);
        assert!(prop.is_settled());
        assert_eq!(prop.pose.translation.y, config.bottle.ground_height);
        assert!((prop.pose.translation.z - (0.35 + 7.8)).abs() < 1.0e-4);
        assert!(lock.is_free());
    }

    #[test]
    fn only_one_prop_flies_at_a_time() {
        let config = PropsConfig::default();
        let avatar = avatar_at(Vec3::zeros());
        let mut props = [
            bottle_at(Vec3::new(0.2, 0.1, 0.3)),
            bottle_at(Vec3::new(-0.2, 0.1, 0.3)),
        ];
        let mut lock = KickCoordinator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..120 {
            try_trigger(&mut props, &avatar, &mut lock, &config);
            advance_kicks(&[], &mut props, &mut lock, &config, &mut rng, DT);
            let flying = props.iter().filter(|p| p.state() != KickState::AtRest).count();
            assert!(flying <= 1);
        }
    }

    #[test]
    fn tumbling_never_drops_below_ground() {
        let config = PropsConfig::default();
        let mut prop = bottle_at(Vec3::new(0.0, -1.0, 0.0));
        prop.launch(Vec3::x(), 3.0);
        let mut props = [prop];
        let mut lock = KickCoordinator::new();
        lock.acquire(EntityId::Prop(0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..((config.kick_secs / DT) as usize) {
            advance_kicks(&[], &mut props, &mut lock, &config, &mut rng, DT);
            if props[0].state() == KickState::Tumbling {
                assert!(props[0].pose.translation.y >= config.bottle.ground_height);
            }
        }
    }

    #[test]
    fn roll_stays_within_max_tilt() {
        let config = PropsConfig {
            roll_jitter: 0.3,
            ..Default::default()
        };
        let mut prop = bottle_at(Vec3::new(0.0, 0.1, 0.0));
        prop.launch(Vec3::z(), 5.0);
        let mut props = [prop];
        let mut lock = KickCoordinator::new();
        lock.acquire(EntityId::Prop(0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..50 {
            advance_kicks(&[], &mut props, &mut lock, &config, &mut rng, DT);
            assert!(props[0].roll.abs() <= config.max_tilt);
        }
    }

    #[test]
    fn wall_hit_aborts_and_releases_lock() {
        let config = PropsConfig::default();
        let avatar = avatar_at(Vec3::zeros());
        let mut props = [bottle_at(Vec3::new(0.0, 0.1, 0.35))];
        let statics = [StaticCollider::new(
            Pose::from_translation(Vec3::new(0.0, 0.5, 2.0)),
            Vec3::new(2.0, 1.0, 0.1),
        )];
        let mut lock = KickCoordinator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        try_trigger(&mut props, &avatar, &mut lock, &config);
        let mut last_valid = None;
        for _ in 0..60 {
            let before = props[0].pose;
            advance_kicks(&statics, &mut props, &mut lock, &config, &mut rng, DT);
            if props[0].state() == KickState::AtRest {
                last_valid = Some(before);
                break;
            }
        }

        assert_eq!(props[0].pose, last_valid.expect("kick aborts against the wall"));
        assert!(!props[0].is_settled());
        assert!(lock.is_free());
        assert!(!intersects(&props[0].aabb(), &statics[0].aabb()));
    }

    #[test]
    fn settled_prop_blocks_a_kicked_one() {
        let config = PropsConfig::default();
        let mut blocker = bottle_at(Vec3::new(0.0, 0.1, 3.0));
        blocker.settled = true;
        let mut kicked = bottle_at(Vec3::new(0.0, 0.1, 0.0));
        kicked.launch(Vec3::z(), 7.8);
        let mut props = [kicked, blocker];
        let mut lock = KickCoordinator::new();
        lock.acquire(EntityId::Prop(0)).unwrap();

        run_ticks(&[], &mut props, &mut lock, &config, 60);

        assert_eq!(props[0].state(), KickState::AtRest);
        assert!(props[0].pose.translation.z < 3.0);
        assert!(lock.is_free());
    }

    #[test]
    fn settled_trash_is_not_kicked_by_walking_into_it() {
        // Trash triggers on the raw avatar box, which is blocked before it touches.
        let config = PropsConfig::default();
        let locomotion = LocomotionConfig::default();
        let mut avatar = avatar_at(Vec3::new(0.0, 0.9, 0.0));
        let mut trash = Prop::new(
            Pose::from_translation(Vec3::new(0.0, config.trash.ground_height, 1.55)),
            Vec3::new(0.3, 0.25, 0.3),
            PropCategory::Trash,
        );
        trash.settled = true;
        let mut props = [trash];
        let mut lock = KickCoordinator::new();
        let intent = Intent {
            planar: Vec2::new(0.0, 1.0),
            backward: false,
        };

        let mut blocked = false;
        for _ in 0..60 {
            let scene = CollisionScene::new(&[], &props);
            let out = step_locomotion(&scene, &[], &avatar, intent, &locomotion, DT);
            blocked |= out.state == LocomotionState::Blocked;
            avatar.pose = out.new_pose;
            assert_eq!(try_trigger(&mut props, &avatar, &mut lock, &config), None);
        }
        assert!(blocked);
        assert!(props[0].is_settled());
        assert!(lock.is_free());
    }

    #[test]
    fn no_trigger_while_lock_held() {
        let config = PropsConfig::default();
        let avatar = avatar_at(Vec3::zeros());
        let mut props = [bottle_at(Vec3::new(0.0, 0.1, 0.35))];
        let mut lock = KickCoordinator::new();
        lock.acquire(EntityId::Prop(9)).unwrap();
        assert_eq!(try_trigger(&mut props, &avatar, &mut lock, &config), None);
        assert_eq!(props[0].state(), KickState::AtRest);
    }

    #[test]
    fn trigger_box_is_enlarged_per_category() {
        let config = PropsConfig::default();
        let avatar = avatar_at(Vec3::zeros());
        // Outside the raw avatar box, inside the 1.5x bottle trigger box.
        let gap = upright_aabb(Vec3::zeros(), avatar.half_extents).maxs.z + 0.15;
        let mut props = [bottle_at(Vec3::new(0.0, 0.1, gap))];
        assert!(!intersects(&avatar.aabb(), &props[0].aabb()));

        let mut lock = KickCoordinator::new();
        assert_eq!(try_trigger(&mut props, &avatar, &mut lock, &config), Some(0));
    }
}

/*!
World aggregate and the fixed per-tick pipeline.

The loader populates the world through [`Simulation::register`]; the input
source feeds [`Simulation::input_mut`]; the render consumer reads the
[`Snapshot`] returned by [`Simulation::tick`].

Tick order:
1. sample input
2. locomotion (collision queries inside)
3. animation
4. prop trigger, flight and settle
5. prop/prop overlap pass
6. camera

Steps that need the avatar are skipped while it is not registered yet. Kicks
already in progress keep advancing regardless.
*/

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    animation::{AnimationDirective, AnimationStateMachine, Clip},
    camera::CameraRig,
    collision::{CollisionScene, EntityId, Pose, SlowZone, StaticCollider, Vec3, intersects},
    config::{PropCategory, SimConfig},
    error::{ConfigError, EntityKind, SimError},
    input::InputMapper,
    locomotion::{Avatar, LocomotionState, step_locomotion},
    props::{KickCoordinator, KickState, Prop, advance_kicks, resolve_overlaps, try_trigger},
};

/// Registration request from the scene loader.
#[derive(Clone, Copy, Debug)]
pub enum EntityDesc {
    Avatar {
        pose: Pose,
        /// `None` uses the configured avatar extents.
        half_extents: Option<Vec3>,
    },
    Static {
        pose: Pose,
        half_extents: Vec3,
    },
    Prop {
        pose: Pose,
        half_extents: Vec3,
        category: PropCategory,
    },
    SlowZone {
        pose: Pose,
        half_extents: Vec3,
        multiplier: Option<f32>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarSnapshot {
    pub pose: Pose,
    pub state: LocomotionState,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropSnapshot {
    pub id: EntityId,
    pub pose: Pose,
    pub state: KickState,
    pub settled: bool,
}

/// Everything the render consumer needs after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub avatar: Option<AvatarSnapshot>,
    pub props: Vec<PropSnapshot>,
    pub camera: Option<Pose>,
    pub animation: AnimationDirective,
}

pub struct Simulation {
    config: SimConfig,
    avatar: Option<Avatar>,
    statics: Vec<StaticCollider>,
    props: Vec<Prop>,
    slow_zones: Vec<SlowZone>,
    kicks: KickCoordinator,
    input: InputMapper,
    animation: Option<AnimationStateMachine>,
    camera: CameraRig,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Validate `config` and build an empty world.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            avatar: None,
            statics: Vec::new(),
            props: Vec::new(),
            slow_zones: Vec::new(),
            kicks: KickCoordinator::new(),
            input: InputMapper::new(),
            animation: None,
            camera: CameraRig::new(&config.camera),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    /// Add an entity to the world.
    ///
    /// Degenerate extents and non-finite poses are rejected; nothing is added.
    pub fn register(&mut self, desc: EntityDesc) -> Result<EntityId, SimError> {
        match desc {
            EntityDesc::Avatar { pose, half_extents } => {
                if self.avatar.is_some() {
                    return Err(SimError::AvatarAlreadyRegistered);
                }
                let half_extents =
                    half_extents.unwrap_or_else(|| self.config.locomotion.avatar_half_extents());
                validate_geometry(EntityKind::Avatar, &pose, half_extents)?;

                let avatar = Avatar::new(pose, half_extents);
                let scene = CollisionScene::new(&self.statics, &self.props);
                if scene.query_static(&avatar.aabb(), Some(EntityId::Avatar)) {
                    log::warn!(
                        "avatar spawned overlapping a collider at {:?}; every move will be rejected",
                        pose.translation
                    );
                }
                self.avatar = Some(avatar);
                log::info!("avatar registered at {:?}", pose.translation);
                Ok(EntityId::Avatar)
            }
            EntityDesc::Static { pose, half_extents } => {
                validate_geometry(EntityKind::Static, &pose, half_extents)?;
                let id = EntityId::Static(self.statics.len() as u32);
                self.statics.push(StaticCollider::new(pose, half_extents));
                self.warn_if_avatar_overlaps(id);
                Ok(id)
            }
            EntityDesc::Prop {
                pose,
                half_extents,
                category,
            } => {
                validate_geometry(EntityKind::Prop, &pose, half_extents)?;
                let id = EntityId::Prop(self.props.len() as u32);
                self.props.push(Prop::new(pose, half_extents, category));
                Ok(id)
            }
            EntityDesc::SlowZone {
                pose,
                half_extents,
                multiplier,
            } => {
                validate_geometry(EntityKind::SlowZone, &pose, half_extents)?;
                if let Some(m) = multiplier {
                    if !m.is_finite() {
                        return Err(ConfigError::NonFinite {
                            field: "slow_zone.multiplier",
                        }
                        .into());
                    }
                    if m <= 0.0 || m > 1.0 {
                        return Err(ConfigError::OutOfRange {
                            field: "slow_zone.multiplier",
                            value: m,
                            min: f32::EPSILON,
                            max: 1.0,
                        }
                        .into());
                    }
                }
                let id = EntityId::SlowZone(self.slow_zones.len() as u32);
                self.slow_zones.push(SlowZone {
                    pose,
                    half_extents,
                    multiplier,
                });
                Ok(id)
            }
        }
    }

    /// Bind the loader-supplied clips to the animation machine.
    ///
    /// Until this succeeds animation is skipped and snapshots carry `Maintain`.
    pub fn bind_clips(&mut self, clips: Vec<Clip>) -> Result<(), SimError> {
        self.animation = Some(AnimationStateMachine::new(&self.config.animation, clips)?);
        Ok(())
    }

    /// Run one tick of `dt_seconds`.
    pub fn tick(&mut self, dt_seconds: f32) -> Snapshot {
        let dt = if dt_seconds.is_finite() {
            dt_seconds.max(0.0)
        } else {
            0.0
        };

        let intent = self.input.intent();
        let any_pressed = self.input.any_pressed();
        let mut directive = AnimationDirective::Maintain;

        if let Some(avatar) = self.avatar.as_mut() {
            let scene = CollisionScene::new(&self.statics, &self.props);
            let step = step_locomotion(
                &scene,
                &self.slow_zones,
                avatar,
                intent,
                &self.config.locomotion,
                dt,
            );
            avatar.pose = step.new_pose;
            avatar.state = step.state;

            if let Some(animation) = self.animation.as_mut() {
                directive = animation.update(step.state, any_pressed, dt);
            }

            try_trigger(&mut self.props, avatar, &mut self.kicks, &self.config.props);
        }

        advance_kicks(
            &self.statics,
            &mut self.props,
            &mut self.kicks,
            &self.config.props,
            &mut self.rng,
            dt,
        );
        resolve_overlaps(
            &mut self.props,
            &self.statics,
            self.config.props.min_separation_step,
        );

        let camera = self.avatar.as_ref().map(|a| self.camera.update(&a.pose));
        self.snapshot(camera, directive)
    }

    fn snapshot(&self, camera: Option<Pose>, animation: AnimationDirective) -> Snapshot {
        Snapshot {
            avatar: self.avatar.as_ref().map(|a| AvatarSnapshot {
                pose: a.pose,
                state: a.state,
            }),
            props: self
                .props
                .iter()
                .enumerate()
                .map(|(i, p)| PropSnapshot {
                    id: EntityId::Prop(i as u32),
                    pose: p.pose,
                    state: p.state(),
                    settled: p.is_settled(),
                })
                .collect(),
            camera,
            animation,
        }
    }

    fn warn_if_avatar_overlaps(&self, id: EntityId) {
        let (Some(avatar), EntityId::Static(i)) = (self.avatar.as_ref(), id) else {
            return;
        };
        let overlaps = self
            .statics
            .get(i as usize)
            .is_some_and(|s| intersects(&avatar.aabb(), &s.aabb()));
        if overlaps {
            log::warn!("static collider {i} registered on top of the avatar");
        }
    }

    #[inline]
    pub fn input_mut(&mut self) -> &mut InputMapper {
        &mut self.input
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn avatar(&self) -> Option<&Avatar> {
        self.avatar.as_ref()
    }

    #[inline]
    pub fn statics(&self) -> &[StaticCollider] {
        &self.statics
    }

    #[inline]
    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    #[inline]
    pub fn slow_zones(&self) -> &[SlowZone] {
        &self.slow_zones
    }

    #[inline]
    pub fn kicks(&self) -> &KickCoordinator {
        &self.kicks
    }

    #[inline]
    pub fn animation(&self) -> Option<&AnimationStateMachine> {
        self.animation.as_ref()
    }
}

fn validate_geometry(kind: EntityKind, pose: &Pose, half_extents: Vec3) -> Result<(), SimError> {
    let finite = pose.translation.iter().all(|c| c.is_finite())
        && pose.rotation.coords.iter().all(|c| c.is_finite());
    if !finite {
        return Err(SimError::NonFinitePose(kind));
    }
    if !half_extents.iter().all(|h| h.is_finite() && *h > 0.0) {
        return Err(SimError::DegenerateExtent {
            entity: kind,
            extent: half_extents,
        });
    }
    Ok(())
}

//! Avatar model loading and the bridge from simulation directives to Bevy's
//! animation player.
//!
//! The model is optional: if it fails to load the avatar stays a capsule and
//! the simulation runs without an animation machine.

use std::time::Duration;

use bevy::{asset::LoadState, gltf::Gltf, prelude::*};
use shared::{AnimationDirective, Clip, ClipId};

use crate::world::{AvatarBody, AvatarPlaceholder, SimWorld, tick_simulation};

const AVATAR_MODEL: &str = "models/avatar.glb";

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PendingDirective>();
    app.add_systems(Startup, load_avatar_model);
    app.add_systems(
        Update,
        (
            bind_clips.run_if(
                resource_exists::<AvatarModel>
                    .and(resource_exists::<SimWorld>)
                    .and(not(resource_exists::<AvatarAnimations>)),
            ),
            attach_graph.run_if(resource_exists::<AvatarAnimations>),
            (queue_directive, apply_directive)
                .chain()
                .after(tick_simulation)
                .run_if(resource_exists::<SimWorld>),
        ),
    );
}

#[derive(Resource)]
struct AvatarModel(Handle<Gltf>);

/// Graph nodes indexed like the clip list handed to the simulation.
#[derive(Resource)]
struct AvatarAnimations {
    graph: Handle<AnimationGraph>,
    nodes: Vec<AnimationNodeIndex>,
    walk_time_scale: f32,
}

impl AvatarAnimations {
    fn node(&self, clip: ClipId) -> Option<AnimationNodeIndex> {
        self.nodes.get(clip.0).copied()
    }
}

/// Latest directive not yet applied, held until an animation player exists.
#[derive(Resource, Default)]
struct PendingDirective(Option<AnimationDirective>);

fn load_avatar_model(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(AvatarModel(asset_server.load(AVATAR_MODEL)));
}

/// Once the model is in, hand its clips to the simulation and swap the capsule
/// for the model scene.
fn bind_clips(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    model: Res<AvatarModel>,
    gltfs: Res<Assets<Gltf>>,
    clip_assets: Res<Assets<AnimationClip>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut world: ResMut<SimWorld>,
    avatar: Single<Entity, With<AvatarBody>>,
    placeholders: Query<Entity, With<AvatarPlaceholder>>,
) -> Result {
    if let LoadState::Failed(err) = asset_server.load_state(&model.0) {
        warn!("avatar model {AVATAR_MODEL} failed to load ({err}); animation disabled");
        commands.remove_resource::<AvatarModel>();
        return Ok(());
    }
    let Some(gltf) = gltfs.get(&model.0) else {
        return Ok(());
    };

    let mut named: Vec<_> = gltf.named_animations.iter().collect();
    named.sort_by(|a, b| a.0.cmp(b.0));

    let mut clips = Vec::with_capacity(named.len());
    let mut handles = Vec::with_capacity(named.len());
    for (name, handle) in named {
        let Some(clip) = clip_assets.get(handle) else {
            return Ok(());
        };
        clips.push(Clip::new(name.to_string(), clip.duration()));
        handles.push(handle.clone());
    }

    world.sim.bind_clips(clips)?;

    let (graph, nodes) = AnimationGraph::from_clips(handles);
    let half_height = world.sim.config().locomotion.avatar_half_extents().y;
    commands.insert_resource(AvatarAnimations {
        graph: graphs.add(graph),
        nodes,
        walk_time_scale: world.sim.config().animation.walk_time_scale,
    });

    commands.entity(*avatar).with_child((
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(AVATAR_MODEL))),
        Transform::from_xyz(0.0, -half_height, 0.0),
    ));
    for placeholder in &placeholders {
        commands.entity(placeholder).despawn();
    }
    info!("avatar clips bound");
    Ok(())
}

fn attach_graph(
    mut commands: Commands,
    animations: Res<AvatarAnimations>,
    players: Query<Entity, Added<AnimationPlayer>>,
) {
    for entity in &players {
        commands.entity(entity).insert((
            AnimationGraphHandle(animations.graph.clone()),
            AnimationTransitions::new(),
        ));
    }
}

fn queue_directive(world: Res<SimWorld>, mut pending: ResMut<PendingDirective>) {
    let Some(snapshot) = world.snapshot.as_ref() else {
        return;
    };
    if snapshot.animation != AnimationDirective::Maintain {
        pending.0 = Some(snapshot.animation);
    }
}

/// Bevy transitions take a single duration, so the incoming clip's fade-in
/// drives the blend and the outgoing fade-out is not applied separately.
fn apply_directive(
    mut pending: ResMut<PendingDirective>,
    animations: Option<Res<AvatarAnimations>>,
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions)>,
) {
    let Some(animations) = animations else {
        return;
    };
    let Ok((mut player, mut transitions)) = players.single_mut() else {
        return;
    };
    let Some(directive) = pending.0.take() else {
        return;
    };

    match directive {
        AnimationDirective::Maintain => {}
        AnimationDirective::CrossFade {
            to,
            fade_in,
            time_scale,
            ..
        } => {
            if let Some(node) = animations.node(to) {
                transitions
                    .play(&mut player, node, Duration::from_secs_f32(fade_in))
                    .repeat()
                    .set_speed(time_scale);
            }
        }
        AnimationDirective::Pin {
            to, fade_in, time, ..
        } => {
            if let Some(node) = animations.node(to) {
                transitions
                    .play(&mut player, node, Duration::from_secs_f32(fade_in))
                    .seek_to(time)
                    .pause();
            }
        }
        AnimationDirective::Start(clip) => {
            if let Some(node) = animations.node(clip) {
                player
                    .play(node)
                    .repeat()
                    .set_speed(animations.walk_time_scale);
            }
        }
        AnimationDirective::Stop(clip) => {
            if let Some(node) = animations.node(clip) {
                player.stop(node);
            }
        }
    }
}

use bevy::{
    camera::Exposure,
    pbr::{AtmosphereMode, AtmosphereSettings},
    prelude::*,
};

use crate::world::{SimWorld, to_transform};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, follow_avatar.run_if(resource_exists::<SimWorld>));
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Exposure { ev100: 16.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_xyz(-3.7, 5.1, -10.0).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                1000.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
        AtmosphereSettings {
            rendering_method: AtmosphereMode::Raymarched,
            ..default()
        },
    ));
}

/// The rig is rigid: the camera snaps to the pose the simulation computed.
fn follow_avatar(world: Res<SimWorld>, mut camera: Single<&mut Transform, With<Camera3d>>) {
    let Some(pose) = world.snapshot.as_ref().and_then(|s| s.camera) else {
        return;
    };
    **camera = to_transform(&pose);
}

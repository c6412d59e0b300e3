//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (recommended: `#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;
use shared::{Aabb, KickState, collision::compute_aabb};

use crate::world::SimWorld;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.init_resource::<ShowVolumes>();
    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(
        Update,
        (
            toggle_volumes,
            draw_collision_volumes
                .run_if(resource_exists::<SimWorld>.and(|show: Res<ShowVolumes>| show.0)),
        ),
    );
}

/// F3 toggles the collision box overlay.
#[derive(Resource)]
struct ShowVolumes(bool);

impl Default for ShowVolumes {
    fn default() -> Self {
        Self(true)
    }
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn toggle_volumes(keys: Res<ButtonInput<KeyCode>>, mut show: ResMut<ShowVolumes>) {
    if keys.just_pressed(KeyCode::F3) {
        show.0 = !show.0;
    }
}

fn draw_collision_volumes(world: Res<SimWorld>, mut gizmos: Gizmos) {
    let sim = &world.sim;

    for collider in sim.statics() {
        draw_aabb(&mut gizmos, &collider.aabb(), Color::srgb(0.9, 0.2, 0.2));
    }
    for zone in sim.slow_zones() {
        let aabb = compute_aabb(&zone.pose, zone.half_extents);
        draw_aabb(&mut gizmos, &aabb, Color::srgb(0.9, 0.6, 0.1));
    }
    for prop in sim.props() {
        let color = match prop.state() {
            KickState::AtRest if prop.is_obstacle() => Color::srgb(0.5, 0.5, 0.5),
            KickState::AtRest => Color::srgb(0.2, 0.8, 0.2),
            _ => Color::srgb(1.0, 1.0, 0.2),
        };
        draw_aabb(&mut gizmos, &prop.aabb(), color);
    }
    if let Some(avatar) = sim.avatar() {
        draw_aabb(&mut gizmos, &avatar.aabb(), Color::srgb(0.2, 0.6, 1.0));
    }
}

fn draw_aabb(gizmos: &mut Gizmos, aabb: &Aabb, color: Color) {
    let center = aabb.center();
    let size = aabb.maxs - aabb.mins;
    gizmos.cuboid(
        Transform::from_xyz(center.x, center.y, center.z).with_scale(Vec3::new(
            size.x, size.y, size.z,
        )),
        color,
    );
}

use std::{f32::consts::PI, fs, io};

use bevy::prelude::*;
use nalgebra as na;
use shared::{EntityDesc, Pose, PropCategory, SimConfig, Simulation, Snapshot};

/// Relative to the working directory, which is the crate root under `cargo run`.
const CONFIG_PATH: &str = "assets/config/simulation.ron";

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
    app.add_systems(Update, tick_simulation.run_if(resource_exists::<SimWorld>));
    app.add_systems(PostUpdate, sync_transforms.run_if(resource_exists::<SimWorld>));
}

/// The simulation core and the snapshot from its latest tick.
#[derive(Resource)]
pub struct SimWorld {
    pub sim: Simulation,
    pub snapshot: Option<Snapshot>,
}

#[derive(Component)]
pub struct AvatarBody;

/// Capsule shown until the avatar model has loaded.
#[derive(Component)]
pub struct AvatarPlaceholder;

#[derive(Component)]
pub struct PropBody(pub usize);

struct PropSpawn {
    at: [f32; 3],
    half_extents: [f32; 3],
    category: PropCategory,
}

const WALL_HALF_EXTENTS: [f32; 3] = [1.5, 1.0, 0.1];
const TENT_HALF_EXTENTS: [f32; 3] = [2.0, 1.5, 2.0];
const PEN_CENTER: [f32; 2] = [0.0, 10.0];

const PROPS: [PropSpawn; 5] = [
    PropSpawn {
        at: [1.5, 0.25, 4.0],
        half_extents: [0.08, 0.25, 0.08],
        category: PropCategory::Bottle,
    },
    PropSpawn {
        at: [-1.0, 0.25, 5.0],
        half_extents: [0.08, 0.25, 0.08],
        category: PropCategory::Bottle,
    },
    PropSpawn {
        at: [3.0, 0.25, 6.5],
        half_extents: [0.08, 0.25, 0.08],
        category: PropCategory::Bottle,
    },
    PropSpawn {
        at: [-3.0, 0.25, 3.0],
        half_extents: [0.25, 0.25, 0.25],
        category: PropCategory::Trash,
    },
    PropSpawn {
        at: [-3.4, 0.25, 3.3],
        half_extents: [0.3, 0.25, 0.2],
        category: PropCategory::Trash,
    },
];

fn load_config() -> Result<SimConfig, BevyError> {
    match fs::read_to_string(CONFIG_PATH) {
        Ok(source) => {
            let config = SimConfig::from_ron_str(&source)?;
            info!("loaded simulation config from {CONFIG_PATH}");
            Ok(config)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("{CONFIG_PATH} not found; using default simulation config");
            Ok(SimConfig::default())
        }
        Err(err) => {
            warn!("could not read {CONFIG_PATH} ({err}); using default simulation config");
            Ok(SimConfig::default())
        }
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let mut sim = Simulation::new(load_config()?)?;

    commands.spawn((
        Transform::from_xyz(0., 0., 0.),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(60., 60.).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let wall_material = materials.add(Color::srgb_u8(124, 144, 255));
    let [cx, cz] = PEN_CENTER;
    let walls = [
        (cx, cz + 2.0, 0.0),
        (cx + 2.0, cz, PI / 2.0),
        (cx, cz - 2.0, PI),
        (cx - 2.0, cz, -PI / 2.0),
    ];
    for (x, z, yaw) in walls {
        let pose = Pose::from_yaw(na::Vector3::new(x, WALL_HALF_EXTENTS[1], z), yaw);
        let material = wall_material.clone();
        spawn_static(&mut commands, &mut meshes, &mut sim, pose, WALL_HALF_EXTENTS, material)?;
    }

    let tent_material = materials.add(Color::srgb_u8(196, 160, 110));
    for x in [5.0, 17.0] {
        let pose = Pose::from_yaw(na::Vector3::new(x, TENT_HALF_EXTENTS[1], 20.0), -PI / 2.9);
        let material = tent_material.clone();
        spawn_static(&mut commands, &mut meshes, &mut sim, pose, TENT_HALF_EXTENTS, material)?;
    }

    let zone_half = na::Vector3::new(3.0, 1.0, 3.0);
    let zone_at = na::Vector3::new(-7.0, 1.0, 8.0);
    sim.register(EntityDesc::SlowZone {
        pose: Pose::from_translation(zone_at),
        half_extents: zone_half,
        multiplier: None,
    })?;
    commands.spawn((
        Mesh3d(
            meshes.add(
                Plane3d::default()
                    .mesh()
                    .size(zone_half.x * 2.0, zone_half.z * 2.0)
                    .build(),
            ),
        ),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.45, 0.3, 0.15, 0.6),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::from_xyz(zone_at.x, 0.01, zone_at.z),
    ));

    let bottle_material = materials.add(Color::srgb_u8(60, 150, 90));
    let trash_material = materials.add(Color::srgb_u8(70, 70, 70));
    for (i, spawn) in PROPS.iter().enumerate() {
        let half = na::Vector3::from(spawn.half_extents);
        let pose = Pose::from_translation(na::Vector3::from(spawn.at));
        sim.register(EntityDesc::Prop {
            pose,
            half_extents: half,
            category: spawn.category,
        })?;
        let material = match spawn.category {
            PropCategory::Bottle => bottle_material.clone(),
            PropCategory::Trash => trash_material.clone(),
        };
        commands.spawn((
            PropBody(i),
            Mesh3d(meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0))),
            MeshMaterial3d(material),
            to_transform(&pose),
        ));
    }

    let avatar_half = sim.config().locomotion.avatar_half_extents();
    let avatar_pose = Pose::from_translation(na::Vector3::new(0.0, avatar_half.y, 0.0));
    sim.register(EntityDesc::Avatar {
        pose: avatar_pose,
        half_extents: None,
    })?;
    let capsule = Capsule3d::new(avatar_half.x, (avatar_half.y - avatar_half.x) * 2.0);
    commands.spawn((
        AvatarBody,
        Visibility::default(),
        to_transform(&avatar_pose),
        children![(
            AvatarPlaceholder,
            Mesh3d(meshes.add(capsule)),
            MeshMaterial3d(materials.add(Color::srgb_u8(230, 200, 170))),
        )],
    ));

    info!(
        "scene registered: {} statics, {} props, {} slow zones",
        sim.statics().len(),
        sim.props().len(),
        sim.slow_zones().len()
    );
    commands.insert_resource(SimWorld {
        sim,
        snapshot: None,
    });
    Ok(())
}

fn spawn_static(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    sim: &mut Simulation,
    pose: Pose,
    half_extents: [f32; 3],
    material: Handle<StandardMaterial>,
) -> Result {
    let [hx, hy, hz] = half_extents;
    sim.register(EntityDesc::Static {
        pose,
        half_extents: na::Vector3::from(half_extents),
    })?;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(hx * 2.0, hy * 2.0, hz * 2.0))),
        MeshMaterial3d(material),
        to_transform(&pose),
    ));
    Ok(())
}

pub fn tick_simulation(time: Res<Time>, mut world: ResMut<SimWorld>) {
    let snapshot = world.sim.tick(time.delta_secs());
    world.snapshot = Some(snapshot);
}

fn sync_transforms(
    world: Res<SimWorld>,
    mut avatar: Query<&mut Transform, (With<AvatarBody>, Without<PropBody>)>,
    mut props: Query<(&mut Transform, &PropBody), Without<AvatarBody>>,
) {
    let Some(snapshot) = world.snapshot.as_ref() else {
        return;
    };

    if let (Some(state), Ok(mut tf)) = (snapshot.avatar.as_ref(), avatar.single_mut()) {
        *tf = to_transform(&state.pose);
    }

    for (mut tf, body) in &mut props {
        if let Some(prop) = snapshot.props.get(body.0) {
            *tf = to_transform(&prop.pose);
        }
    }
}

pub fn to_transform(pose: &Pose) -> Transform {
    let t = pose.translation;
    let q = pose.rotation.coords;
    Transform::from_xyz(t.x, t.y, t.z).with_rotation(Quat::from_xyzw(q.x, q.y, q.z, q.w))
}

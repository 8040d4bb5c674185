use bevy::app::AppExit;
use bevy::math::primitives::{Cuboid, Sphere};
use bevy::prelude::*;

use crate::simulation::poses::Pose;
use crate::simulation::scenario::Scenario;

/// Component tagging each sphere with its granule index into Scenario.ensemble.granules
#[derive(Component)]
struct GranuleIndex(pub usize);

/// World-space → screen-space scaling factor for positions and diameters
const SCALE3D: f32 = 50.0;

/// Distance of the camera from the origin along +Z
const CAMERA_DISTANCE: f32 = 300.0;

/// Convenience entrypoint: hand the viewer a built scenario and run
pub fn run_3d(scenario: Scenario) {
    println!(
        "run_3d: starting Bevy 3D viewer with {} granules",
        scenario.ensemble.granules.len()
    );

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (physics_step_3d, sync_transforms_3d).chain())
        .run();
}

/// Startup system: spawn camera, light, axes, and one sphere per granule
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    // Simple 3D camera looking at the swarm
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)), // pure black
            ..Default::default()
        },
        transform: Transform::from_xyz(40.0, 30.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Basic point light
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 1000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(100.0, 100.0, CAMERA_DISTANCE),
        ..Default::default()
    });

    spawn_axes(&mut commands, &mut meshes, &mut materials);

    // Spawn one unit sphere per granule; the pose's uniform scale (the
    // diameter) sizes it, so the mesh radius is 0.5
    let mesh = meshes.add(Sphere::new(0.5).mesh());
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.8, 0.5), // sand
        ..Default::default()
    });

    for (i, pose) in scenario.poses.poses().iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: pose_transform(pose),
                ..Default::default()
            },
            GranuleIndex(i),
        ));
    }
}

/// Per-frame physics tick: one Euler step, then refresh the pose snapshot
fn physics_step_3d(mut scenario: ResMut<Scenario>, mut exit: EventWriter<AppExit>) {
    if let Err(err) = scenario.step() {
        // A faulted step is fatal to the run, not recoverable
        eprintln!("simulation faulted: {err:#}");
        exit.send(AppExit::error());
    }
}

/// Copy the pose snapshot into the sphere transforms
fn sync_transforms_3d(scenario: Res<Scenario>, mut query: Query<(&GranuleIndex, &mut Transform)>) {
    let poses = scenario.poses.poses();
    for (GranuleIndex(i), mut transform) in &mut query {
        if let Some(pose) = poses.get(*i) {
            *transform = pose_transform(pose);
        }
    }
}

/// Pose (translation + uniform scale, identity rotation) → screen transform
fn pose_transform(pose: &Pose) -> Transform {
    Transform {
        translation: Vec3::new(
            pose.translation.x as f32,
            pose.translation.y as f32,
            pose.translation.z as f32,
        ) * SCALE3D,
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(pose.scale as f32 * SCALE3D),
    }
}

// =========================================================================================
// Draw 3D axes for visual reference
// =========================================================================================

fn spawn_axes(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    // Axis length and thickness, in *world* units
    let axis_len = 10.0 * SCALE3D;
    let axis_thickness = 0.009 * SCALE3D;

    // X axis: red, along +X/-X
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(axis_len, axis_thickness, axis_thickness).mesh()),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0), // red
            unlit: true,
            ..Default::default()
        }),
        // Cuboid is centered at its transform origin, so this puts it crossing the world origin
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });

    // Y axis: green, along +Y/-Y
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(axis_thickness, axis_len, axis_thickness).mesh()),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.0, 1.0, 0.0), // green
            unlit: true,
            ..Default::default()
        }),
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });

    // Z axis: blue, along +Z/-Z
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(axis_thickness, axis_thickness, axis_len).mesh()),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.0, 0.0, 1.0), // blue
            unlit: true,
            ..Default::default()
        }),
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });
}

//! Spark particles: explosion bursts, star-clash debris, and probe exhaust.
//!
//! ## Design
//!
//! Sparks are lightweight ECS entities with a [`Spark`] component that stores
//! physics state (velocity, age, colour).  Three chained systems handle them:
//!
//! | System                     | Schedule | Purpose                                    |
//! |----------------------------|----------|--------------------------------------------|
//! | `spark_emission_system`    | Update   | Spawn bursts and probe exhaust             |
//! | `attach_spark_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned sparks  |
//! | `spark_update_system`      | Update   | Move, fade, and despawn expired sparks     |
//!
//! Sparks age in real seconds and draw their randomness from
//! `rand::thread_rng()` rather than the seeded simulation RNG.
//!
//! A single hexagon mesh [`SparkMesh`] is created at plugin
//! startup and shared by every spark.  Each spark receives its own
//! [`ColorMaterial`] so its alpha can be faded individually.

use crate::body::Ephemeral;
use crate::events::CosmicEvent;
use crate::rendering::polygon_mesh;
use bevy::prelude::*;
use rand::Rng;

// ── Resources ────────────────────────────────────────────────────────────────

/// Shared mesh used by all spark entities (created once at startup).
#[derive(Resource)]
pub struct SparkMesh(pub Handle<Mesh>);

// ── Component ────────────────────────────────────────────────────────────────

/// Short-lived visual spark.
#[derive(Component)]
pub struct Spark {
    /// World-space velocity (units/s).
    pub velocity: Vec2,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); despawned when `age >= lifetime`.
    pub lifetime: f32,
    /// Base colour (alpha is driven by age).
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// `None` until `attach_spark_mesh_system` runs.
    pub material: Option<Handle<ColorMaterial>>,
}

impl Spark {
    fn new(velocity: Vec2, lifetime: f32, color: Srgba) -> Self {
        Self {
            velocity,
            age: 0.0,
            lifetime,
            r: color.red,
            g: color.green,
            b: color.blue,
            material: None,
        }
    }

    /// Quadratic ease-out: bright at birth, rapid fade at the end.
    pub fn alpha(&self) -> f32 {
        let t = (self.age / self.lifetime).clamp(0.0, 1.0);
        (1.0 - t).powi(2)
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct SparksPlugin;

impl Plugin for SparksPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_spark_mesh).add_systems(
            Update,
            (
                spark_emission_system,
                attach_spark_mesh_system,
                spark_update_system,
            )
                .chain(),
        );
    }
}

fn init_spark_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(polygon_mesh(1.2, 6));
    commands.insert_resource(SparkMesh(handle));
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Emit sparks for explosive events and probe exhaust.
pub fn spark_emission_system(mut commands: Commands, mut events: MessageReader<CosmicEvent>) {
    for event in events.read() {
        match *event {
            CosmicEvent::StarExtinguished { at, tint } => {
                spawn_burst_sparks(&mut commands, at, Vec2::ZERO, tint, 24, 40.0..160.0);
            }
            CosmicEvent::StarClash {
                at,
                tint,
                other_tint,
            } => {
                spawn_burst_sparks(&mut commands, at, Vec2::ZERO, tint, 8, 30.0..110.0);
                spawn_burst_sparks(&mut commands, at, Vec2::ZERO, other_tint, 8, 30.0..110.0);
            }
            CosmicEvent::ProbeSpent { at, velocity } => {
                let grey = Color::srgb(0.75, 0.75, 0.8);
                spawn_burst_sparks(&mut commands, at, velocity * 60.0, grey, 6, 15.0..60.0);
            }
            CosmicEvent::ProbeThrust { at, heading } => {
                spawn_thrust_sparks(&mut commands, at, -heading);
            }
            _ => {}
        }
    }
}

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned [`Spark`].
pub fn attach_spark_mesh_system(
    mut commands: Commands,
    spark_mesh: Res<SparkMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Spark), Added<Spark>>,
) {
    for (entity, mut spark) in query.iter_mut() {
        let mat_handle =
            materials.add(ColorMaterial::from_color(Color::srgba(spark.r, spark.g, spark.b, 1.0)));
        spark.material = Some(mat_handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(spark_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Advance all sparks: translate by velocity, fade alpha, despawn expired.
pub fn spark_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut Spark)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut spark) in query.iter_mut() {
        spark.age += dt;
        if spark.age >= spark.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation.x += spark.velocity.x * dt;
        transform.translation.y += spark.velocity.y * dt;

        let alpha = spark.alpha();
        if let Some(ref handle) = spark.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = Color::srgba(spark.r, spark.g, spark.b, alpha);
            }
        }
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// Spawn `count` sparks flying outward from `pos` in every direction.
pub fn spawn_burst_sparks(
    commands: &mut Commands,
    pos: Vec2,
    base_vel: Vec2,
    tint: Color,
    count: u32,
    speed: std::ops::Range<f32>,
) {
    let mut rng = rand::thread_rng();
    let base = tint.to_srgba();

    for _ in 0..count {
        let angle = rng.gen_range(0.0_f32..std::f32::consts::TAU);
        let velocity = Vec2::from_angle(angle) * rng.gen_range(speed.clone()) + base_vel * 0.4;

        // Random blend toward white.
        let heat = rng.gen_range(0.0_f32..0.4_f32);
        let color = Srgba::new(
            base.red + (1.0 - base.red) * heat,
            base.green + (1.0 - base.green) * heat,
            base.blue + (1.0 - base.blue) * heat,
            1.0,
        );

        let lifetime = rng.gen_range(0.35_f32..0.8_f32);
        let offset = Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));

        commands.spawn((
            Spark::new(velocity, lifetime, color),
            Ephemeral,
            Transform::from_translation((pos + offset).extend(0.9)),
            Visibility::default(),
        ));
    }
}

/// Spawn one exhaust spark behind a thrusting probe.
///
/// `reverse_dir` is expected to point opposite the probe heading.
pub fn spawn_thrust_sparks(commands: &mut Commands, pos: Vec2, reverse_dir: Vec2) {
    let mut rng = rand::thread_rng();

    let base = reverse_dir.try_normalize().unwrap_or(Vec2::NEG_Y);
    let angle = base.to_angle() + rng.gen_range(-0.35_f32..0.35_f32);
    let velocity = Vec2::from_angle(angle) * rng.gen_range(20.0_f32..65.0_f32);

    let color = Srgba::new(
        rng.gen_range(0.85_f32..1.0_f32),
        rng.gen_range(0.85_f32..1.0_f32),
        1.0,
        1.0,
    );
    let lifetime = rng.gen_range(0.10_f32..0.25_f32);
    let back_offset = base * rng.gen_range(1.0_f32..3.0_f32);

    commands.spawn((
        Spark::new(velocity, lifetime, color),
        Ephemeral,
        Transform::from_translation((pos + back_offset).extend(0.9)),
        Visibility::default(),
    ));
}

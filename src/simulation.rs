//! Simulation plugin and systems for Bevy ECS.
//!
//! ## Tick pipeline (`FixedUpdate`)
//!
//! | Set                     | Systems                                        |
//! |-------------------------|------------------------------------------------|
//! | `SimulationSet::Input`  | protostar charging (see [`crate::input`])      |
//! | `SimulationSet::Step`   | `trail_record_system`, `interaction_step_system` |
//! | `SimulationSet::Lifecycle` | `lifecycle_system`, `replenish_system`      |
//! | `SimulationSet::Effects`| shockwave / flare ageing (see [`crate::effects`]) |
//!
//! The tick runs at `BackdropConfig::tick_hz` so every per-tick constant keeps
//! its per-frame meaning regardless of the display refresh rate.

use crate::body::{spawn_asteroid_field, spawn_body, Body, Ephemeral, Trail};
use crate::config::BackdropConfig;
use crate::events::CosmicEvent;
use crate::lifecycle::{advance, Transition};
use crate::palette::StarPalette;
use crate::physics::{step, FieldBounds, Slot};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Ordering of the per-tick work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Step,
    Lifecycle,
    Effects,
}

/// Ordering of the startup work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackdropStartup {
    /// Load `assets/backdrop.toml`.
    Configure,
    /// Camera, field bounds, and UI layout.
    Layout,
    /// Initial asteroids.
    Populate,
}

/// The single source of simulation randomness.
///
/// Seed it through `BackdropConfig::seed` for reproducible runs.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Running totals for the HUD and logs.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimulationStats {
    pub live_count: usize,
    pub absorbed_total: u32,
    pub clash_total: u32,
    pub probes_launched: u32,
    pub collapse_total: u32,
    pub resets: u32,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BackdropConfig>()
            .init_resource::<StarPalette>()
            .init_resource::<SimRng>()
            .init_resource::<FieldBounds>()
            .init_resource::<SimulationStats>()
            .add_message::<CosmicEvent>()
            .configure_sets(
                Startup,
                (
                    BackdropStartup::Configure,
                    BackdropStartup::Layout,
                    BackdropStartup::Populate,
                )
                    .chain(),
            )
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Input,
                    SimulationSet::Step,
                    SimulationSet::Lifecycle,
                    SimulationSet::Effects,
                )
                    .chain(),
            )
            .add_systems(
                Startup,
                (
                    sync_bounds_from_window.in_set(BackdropStartup::Layout),
                    spawn_initial_field.in_set(BackdropStartup::Populate),
                ),
            )
            .add_systems(
                FixedUpdate,
                (
                    (trail_record_system, interaction_step_system)
                        .chain()
                        .in_set(SimulationSet::Step),
                    (lifecycle_system, replenish_system, stats_system)
                        .chain()
                        .in_set(SimulationSet::Lifecycle),
                ),
            )
            .add_systems(Update, reset_on_resize_system);
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Size the field to the primary window, or to the configured fallback when
/// there is no window (headless runs).
pub fn sync_bounds_from_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<BackdropConfig>,
    mut bounds: ResMut<FieldBounds>,
) {
    *bounds = match windows.single() {
        Ok(window) => FieldBounds::new(window.width(), window.height()),
        Err(_) => FieldBounds::new(config.field_width, config.field_height),
    };
    debug!("Field bounds set to {:?}", bounds.size());
}

/// Spawn the opening asteroid field.
pub fn spawn_initial_field(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    bounds: Res<FieldBounds>,
    mut rng: ResMut<SimRng>,
) {
    spawn_asteroid_field(
        &mut commands,
        config.initial_asteroids,
        &bounds,
        &mut rng.0,
        &config,
    );
    info!("Spawned {} asteroids", config.initial_asteroids);
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// Remember where every body was before it moves this tick.
pub fn trail_record_system(config: Res<BackdropConfig>, mut query: Query<(&Transform, &mut Trail)>) {
    for (transform, mut trail) in query.iter_mut() {
        trail.record(transform.translation.truncate(), config.max_trail);
    }
}

/// Run the pairwise pass over every body and write the results back.
///
/// Bodies are processed in entity order; swallowed bodies are despawned.
pub fn interaction_step_system(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    bounds: Res<FieldBounds>,
    mut bodies: Query<(Entity, &mut Transform, &mut Body, &mut Trail)>,
    mut events: MessageWriter<CosmicEvent>,
    mut stats: ResMut<SimulationStats>,
) {
    let mut snapshot: Vec<(Entity, Slot)> = bodies
        .iter()
        .map(|(entity, transform, body, _)| {
            (
                entity,
                Slot::new(transform.translation.truncate(), body.clone()),
            )
        })
        .collect();
    snapshot.sort_by_key(|(entity, _)| *entity);
    let (entities, mut slots): (Vec<Entity>, Vec<Slot>) = snapshot.into_iter().unzip();

    let raised = step(&mut slots, &bounds, &config);

    for (entity, slot) in entities.into_iter().zip(slots) {
        if slot.consumed {
            commands.entity(entity).despawn();
            continue;
        }
        if let Ok((_, mut transform, mut body, mut trail)) = bodies.get_mut(entity) {
            transform.translation.x = slot.position.x;
            transform.translation.y = slot.position.y;
            *body = slot.body;
            if slot.wrapped {
                trail.clear();
            }
        }
    }

    for event in raised {
        match event {
            CosmicEvent::Absorbed { .. } => stats.absorbed_total += 1,
            CosmicEvent::StarClash { .. } => stats.clash_total += 1,
            _ => {}
        }
        events.write(event);
    }
}

/// Age every body: star decay and probe launches, dying stars, probe fuel,
/// debris fade.
pub fn lifecycle_system(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    mut rng: ResMut<SimRng>,
    mut bodies: Query<(Entity, &Transform, &mut Body)>,
    mut events: MessageWriter<CosmicEvent>,
    mut stats: ResMut<SimulationStats>,
) {
    for (entity, transform, mut body) in bodies.iter_mut() {
        let at = transform.translation.truncate();
        let Some(transition) = advance(&mut body, &mut rng.0, &config) else {
            continue;
        };
        match transition {
            Transition::LaunchProbe { velocity } => {
                spawn_body(&mut commands, at, Body::probe(velocity, &config));
                stats.probes_launched += 1;
                events.write(CosmicEvent::ProbeLaunched { at, velocity });
            }
            Transition::Collapse => {
                stats.collapse_total += 1;
                events.write(CosmicEvent::StarCollapsing {
                    at,
                    tint: body.tint,
                });
            }
            Transition::Extinguish => {
                events.write(CosmicEvent::StarExtinguished {
                    at,
                    tint: body.tint,
                });
            }
            Transition::Thrust { heading } => {
                events.write(CosmicEvent::ProbeThrust { at, heading });
            }
            Transition::Exhaust => {
                events.write(CosmicEvent::ProbeSpent {
                    at,
                    velocity: body.velocity,
                });
            }
            Transition::Expire => {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Keep the field from emptying out: one new asteroid per tick while the
/// population is below the floor.
pub fn replenish_system(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    bounds: Res<FieldBounds>,
    mut rng: ResMut<SimRng>,
    bodies: Query<(), With<Body>>,
) {
    if bodies.iter().count() < config.min_population {
        spawn_asteroid_field(&mut commands, 1, &bounds, &mut rng.0, &config);
    }
}

pub fn stats_system(mut stats: ResMut<SimulationStats>, bodies: Query<(), With<Body>>) {
    stats.live_count = bodies.iter().count();
}

// ── Resize ────────────────────────────────────────────────────────────────────

/// On a window resize, refit the field and start over with a fresh set of
/// asteroids.
pub fn reset_on_resize_system(
    mut commands: Commands,
    mut resized: MessageReader<WindowResized>,
    config: Res<BackdropConfig>,
    mut bounds: ResMut<FieldBounds>,
    mut rng: ResMut<SimRng>,
    mut stats: ResMut<SimulationStats>,
    field: Query<Entity, With<Ephemeral>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    let next = FieldBounds::new(last.width, last.height);
    if next == *bounds {
        return;
    }
    *bounds = next;

    for entity in field.iter() {
        commands.entity(entity).despawn();
    }
    spawn_asteroid_field(
        &mut commands,
        config.initial_asteroids,
        &bounds,
        &mut rng.0,
        &config,
    );
    stats.resets += 1;
    info!(
        "Field resized to {}x{}; reinitialised",
        last.width, last.height
    );
}

//! Headless integration tests for the backdrop plugins.
//!
//! These tests use [`MinimalPlugins`] (no window, no renderer) and drive the
//! simulation by running the `FixedUpdate` schedule directly, one tick per
//! call, so they are deterministic for a fixed RNG seed.
//!
//! Covered scenarios:
//! 1. Startup populates the configured number of asteroids.
//! 2. Replenishment refills an emptied field up to the population floor.
//! 3. Press, hold, release under the cursor charges and ignites a star.
//! 4. A star swallows an asteroid it touches.
//! 5. Events spawn shockwaves that fade out.
//! 6. A window resize clears the field and starts over.
//! 7. Cosmic events add to the score.
//! 8. Lifecycle transitions spawn probes, collapse stars, and expire debris.
//! 9. The object counter refreshes at once after startup, a press, and a reset.

use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::WindowResized;
use stardrift::body::{spawn_body, Body, BodyClass, BodyKind, Ephemeral};
use stardrift::config::BackdropConfig;
use stardrift::effects::{EffectsPlugin, Shockwave};
use stardrift::events::CosmicEvent;
use stardrift::hud::{HudPlugin, ObjectCounterText, Score};
use stardrift::input::{PointerPlugin, PointerState};
use stardrift::physics::FieldBounds;
use stardrift::simulation::{SimRng, SimulationPlugin, SimulationStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a headless app with the simulation, pointer, effects, and HUD
/// plugins, then run the startup pass.
///
/// `WindowResized` is normally registered by `WindowPlugin`; it is added by
/// hand here so the resize system can run without a window.
fn headless_app(config: BackdropConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_message::<WindowResized>()
        .insert_resource(config)
        .insert_resource(SimRng::seeded(7))
        .add_plugins((SimulationPlugin, PointerPlugin, EffectsPlugin, HudPlugin));
    app.update();
    app
}

/// A config with no initial asteroids and no population floor, for tests
/// that place every body by hand.
fn empty_field_config() -> BackdropConfig {
    BackdropConfig {
        initial_asteroids: 0,
        min_population: 0,
        ..Default::default()
    }
}

fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn bodies(app: &mut App) -> Vec<(Entity, Vec2, Body)> {
    let world = app.world_mut();
    let mut query = world.query::<(Entity, &Transform, &Body)>();
    query
        .iter(world)
        .map(|(e, t, b)| (e, t.translation.truncate(), b.clone()))
        .collect()
}

fn spawn(app: &mut App, at: Vec2, body: Body) -> Entity {
    let world = app.world_mut();
    let entity = {
        let mut commands = world.commands();
        spawn_body(&mut commands, at, body)
    };
    world.flush();
    entity
}

fn counter_text(app: &mut App) -> String {
    let world = app.world_mut();
    world
        .query_filtered::<&Text, With<ObjectCounterText>>()
        .single(world)
        .expect("counter text exists")
        .0
        .clone()
}

fn asteroid_at_rest() -> Body {
    Body {
        kind: BodyKind::Asteroid,
        velocity: Vec2::ZERO,
        mass: 1.0,
        radius: 1.5,
        tint: Color::srgba(0.4, 0.8, 1.0, 0.5),
    }
}

fn star_at_rest(mass: f32) -> Body {
    Body {
        kind: BodyKind::Star { probe_timer: 0 },
        velocity: Vec2::ZERO,
        mass,
        radius: 6.0,
        tint: Color::srgb(1.0, 0.2, 0.4),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn startup_spawns_configured_asteroid_field() {
    let mut app = headless_app(BackdropConfig::default());
    let field = bodies(&mut app);
    assert_eq!(field.len(), 60);
    assert!(field.iter().all(|(_, _, b)| b.kind == BodyKind::Asteroid));

    let bounds = *app.world().resource::<FieldBounds>();
    assert_eq!(bounds.size(), Vec2::new(1200.0, 680.0));
    assert!(field.iter().all(|(_, p, _)| bounds.contains(*p)));
}

#[test]
fn replenish_refills_to_population_floor() {
    let mut app = headless_app(BackdropConfig {
        initial_asteroids: 0,
        ..Default::default()
    });
    assert!(bodies(&mut app).is_empty());

    tick(&mut app, 5);
    assert_eq!(bodies(&mut app).len(), 5, "one asteroid per tick");

    tick(&mut app, 30);
    assert_eq!(bodies(&mut app).len(), 20, "refill stops at the floor");
}

#[test]
fn press_hold_release_ignites_a_star() {
    let mut app = headless_app(empty_field_config());
    let cursor = Vec2::new(100.0, 50.0);
    app.world_mut().resource_mut::<PointerState>().world = Some(cursor);

    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    app.update();
    // No InputPlugin here, so the per-frame flags are cleared by hand.
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .clear();

    let charging = app
        .world()
        .resource::<PointerState>()
        .charging
        .expect("press should start charging");
    let start_mass = app.world().get::<Body>(charging).unwrap().mass;

    tick(&mut app, 10);
    let held = app.world().get::<Body>(charging).unwrap().clone();
    assert_eq!(held.kind, BodyKind::Protostar);
    assert!(held.mass > start_mass, "holding should charge the protostar");
    let held_at = app.world().get::<Transform>(charging).unwrap().translation;
    assert_eq!(held_at.truncate(), cursor, "protostar stays under the cursor");

    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .release(MouseButton::Left);
    app.update();
    app.update();

    let star = app.world().get::<Body>(charging).unwrap();
    assert!(star.kind.is_star());
    assert!(app.world().resource::<PointerState>().charging.is_none());
    assert!(
        app.world().resource::<Score>().points >= 5,
        "ignition scores"
    );
}

#[test]
fn star_swallows_touching_asteroid() {
    let mut app = headless_app(empty_field_config());
    let star = spawn(&mut app, Vec2::ZERO, star_at_rest(80.0));
    let rock = spawn(&mut app, Vec2::new(3.0, 0.0), asteroid_at_rest());

    tick(&mut app, 1);

    assert!(app.world().get_entity(rock).is_err(), "asteroid despawned");
    let star_body = app.world().get::<Body>(star).unwrap();
    assert!(star_body.mass > 80.0);
    assert!(star_body.radius > 6.0);
    assert_eq!(app.world().resource::<SimulationStats>().absorbed_total, 1);
}

#[test]
fn shockwaves_spawn_from_events_and_fade() {
    let mut app = headless_app(empty_field_config());
    app.world_mut().write_message(CosmicEvent::Absorbed {
        at: Vec2::new(10.0, 10.0),
        tint: Color::WHITE,
        prey: BodyClass::Star,
        intensity: 3.0,
    });
    app.update();

    let world = app.world_mut();
    let waves: Vec<Shockwave> = world
        .query::<&Shockwave>()
        .iter(world)
        .cloned()
        .collect();
    assert_eq!(waves.len(), 1);
    assert_eq!(waves[0].max_radius, 90.0);

    // life 1.0 at 0.06 per tick is gone within 17 ticks
    tick(&mut app, 20);
    let world = app.world_mut();
    assert_eq!(world.query::<&Shockwave>().iter(world).count(), 0);
}

#[test]
fn resize_clears_and_repopulates_field() {
    let mut app = headless_app(BackdropConfig::default());
    spawn(&mut app, Vec2::ZERO, star_at_rest(200.0));
    assert_eq!(bodies(&mut app).len(), 61);

    app.world_mut().write_message(WindowResized {
        window: Entity::PLACEHOLDER,
        width: 800.0,
        height: 600.0,
    });
    app.update();

    let bounds = *app.world().resource::<FieldBounds>();
    assert_eq!(bounds, FieldBounds::new(800.0, 600.0));

    let field = bodies(&mut app);
    assert_eq!(field.len(), 60);
    assert!(field.iter().all(|(_, _, b)| b.kind == BodyKind::Asteroid));
    assert!(field.iter().all(|(_, p, _)| bounds.contains(*p)));
    assert_eq!(app.world().resource::<SimulationStats>().resets, 1);
}

#[test]
fn resize_to_same_size_keeps_field() {
    let mut app = headless_app(BackdropConfig::default());
    let before: Vec<Entity> = bodies(&mut app).into_iter().map(|(e, _, _)| e).collect();

    app.world_mut().write_message(WindowResized {
        window: Entity::PLACEHOLDER,
        width: 1200.0,
        height: 680.0,
    });
    app.update();

    let after: Vec<Entity> = bodies(&mut app).into_iter().map(|(e, _, _)| e).collect();
    assert_eq!(before, after);
    assert_eq!(app.world().resource::<SimulationStats>().resets, 0);
}

#[test]
fn cosmic_events_add_to_score() {
    let mut app = headless_app(empty_field_config());
    let at = Vec2::ZERO;
    app.world_mut().write_message(CosmicEvent::Absorbed {
        at,
        tint: Color::WHITE,
        prey: BodyClass::Asteroid,
        intensity: 1.0,
    });
    app.world_mut().write_message(CosmicEvent::StarClash {
        at,
        tint: Color::WHITE,
        other_tint: Color::WHITE,
    });
    app.update();

    assert_eq!(app.world().resource::<Score>().points, 11);
    let world = app.world_mut();
    assert!(world.query::<&Ephemeral>().iter(world).count() > 0, "effects spawned");
}

#[test]
fn star_launches_probe_on_lifecycle_tick() {
    let mut app = headless_app(BackdropConfig {
        probe_cooldown_ticks: 0,
        probe_launch_chance: 100.0,
        ..empty_field_config()
    });
    let star = spawn(&mut app, Vec2::ZERO, star_at_rest(80.0));

    tick(&mut app, 1);

    let probes: Vec<Body> = bodies(&mut app)
        .into_iter()
        .map(|(_, _, b)| b)
        .filter(|b| matches!(b.kind, BodyKind::Probe { .. }))
        .collect();
    assert_eq!(probes.len(), 1);
    assert!(probes[0].velocity.length() > 0.0);
    assert_eq!(app.world().resource::<SimulationStats>().probes_launched, 1);

    let parent = app.world().get::<Body>(star).unwrap();
    assert!(parent.mass < 80.0, "launch costs mass");
    assert_eq!(parent.kind, BodyKind::Star { probe_timer: 0 });
}

#[test]
fn light_star_collapses_on_lifecycle_tick() {
    let mut app = headless_app(empty_field_config());
    let star = spawn(&mut app, Vec2::ZERO, star_at_rest(40.005));

    tick(&mut app, 1);

    let body = app.world().get::<Body>(star).unwrap();
    assert!(matches!(body.kind, BodyKind::DyingStar { .. }));
    assert_eq!(app.world().resource::<SimulationStats>().collapse_total, 1);
}

#[test]
fn spent_debris_is_despawned() {
    let mut app = headless_app(empty_field_config());
    let debris = spawn(
        &mut app,
        Vec2::new(200.0, 100.0),
        Body {
            kind: BodyKind::Debris { remaining: 1 },
            velocity: Vec2::new(0.5, 0.0),
            mass: 1.0,
            radius: 2.5,
            tint: Color::srgb(0.6, 0.6, 0.7),
        },
    );

    tick(&mut app, 1);

    assert!(app.world().get_entity(debris).is_err());
}

#[test]
fn counter_refreshes_immediately_after_startup_press_and_reset() {
    let mut app = headless_app(BackdropConfig {
        hud_refresh_secs: 1000.0,
        ..Default::default()
    });
    assert_eq!(counter_text(&mut app), "OBJECTS: 060");

    app.world_mut().resource_mut::<PointerState>().world = Some(Vec2::new(10.0, 10.0));
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .clear();
    assert_eq!(counter_text(&mut app), "OBJECTS: 061");

    app.world_mut().write_message(WindowResized {
        window: Entity::PLACEHOLDER,
        width: 800.0,
        height: 600.0,
    });
    app.update();
    assert_eq!(counter_text(&mut app), "OBJECTS: 060");
}

//! Non-physical transient overlays: shockwaves and flares.
//!
//! Effects are spawned from [`CosmicEvent`]s, aged once per simulation tick,
//! and drawn by [`crate::rendering`].  They never influence bodies.

use crate::body::{BodyClass, Ephemeral};
use crate::config::BackdropConfig;
use crate::events::CosmicEvent;
use crate::simulation::SimulationSet;
use bevy::prelude::*;

/// Expanding ring.  Stronger waves grow faster, reach farther, and fade faster.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Shockwave {
    pub radius: f32,
    /// Nominal reach, `shockwave_radius_per_intensity * intensity`.
    pub max_radius: f32,
    /// 1.0 at birth; removed at or below zero.  Doubles as the ring alpha.
    pub life: f32,
    pub intensity: f32,
    pub tint: Color,
}

impl Shockwave {
    pub fn new(intensity: f32, tint: Color, config: &BackdropConfig) -> Self {
        Self {
            radius: 1.0,
            max_radius: config.shockwave_radius_per_intensity * intensity,
            life: 1.0,
            intensity,
            tint,
        }
    }

    /// Age by one tick.  Returns `false` once the wave has faded.
    pub fn advance(&mut self, config: &BackdropConfig) -> bool {
        self.radius += self.intensity;
        self.life -= config.shockwave_decay * self.intensity;
        self.life > 0.0
    }
}

/// Bright glow disc that swells and fades.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Flare {
    pub radius: f32,
    /// Radius added per tick.
    pub growth: f32,
    pub life: f32,
    pub tint: Color,
}

impl Flare {
    pub fn new(radius: f32, growth: f32, tint: Color) -> Self {
        Self {
            radius,
            growth,
            life: 1.0,
            tint,
        }
    }

    /// Age by one tick.  Returns `false` once the flare has faded.
    pub fn advance(&mut self, config: &BackdropConfig) -> bool {
        self.radius += self.growth;
        self.growth *= 0.95;
        self.life -= config.flare_decay;
        self.life > 0.0
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spawn_effects_system).add_systems(
            FixedUpdate,
            effect_ageing_system.in_set(SimulationSet::Effects),
        );
    }
}

fn spawn_shockwave(commands: &mut Commands, at: Vec2, wave: Shockwave) {
    commands.spawn((
        wave,
        Ephemeral,
        Transform::from_translation(at.extend(0.5)),
    ));
}

fn spawn_flare(commands: &mut Commands, at: Vec2, flare: Flare) {
    commands.spawn((
        flare,
        Ephemeral,
        Transform::from_translation(at.extend(0.4)),
    ));
}

/// Turn simulation events into shockwaves and flares.
pub fn spawn_effects_system(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    mut events: MessageReader<CosmicEvent>,
) {
    for event in events.read() {
        match *event {
            CosmicEvent::Absorbed {
                at,
                tint,
                prey,
                intensity,
            } => {
                spawn_shockwave(&mut commands, at, Shockwave::new(intensity, tint, &config));
                if prey == BodyClass::Star {
                    spawn_flare(&mut commands, at, Flare::new(8.0, 2.0, tint));
                }
            }
            CosmicEvent::StarClash {
                at,
                tint,
                other_tint,
            } => {
                spawn_shockwave(&mut commands, at, Shockwave::new(2.0, tint, &config));
                spawn_shockwave(&mut commands, at, Shockwave::new(1.5, other_tint, &config));
                spawn_flare(&mut commands, at, Flare::new(4.0, 1.5, Color::WHITE));
            }
            CosmicEvent::Ignited { at, tint, mass } => {
                let growth = 1.0 + mass / config.star_base_mass.max(1.0);
                spawn_flare(&mut commands, at, Flare::new(2.0, growth, tint));
            }
            CosmicEvent::StarCollapsing { at, tint } => {
                spawn_flare(&mut commands, at, Flare::new(6.0, 1.0, tint));
            }
            CosmicEvent::StarExtinguished { at, tint } => {
                spawn_shockwave(&mut commands, at, Shockwave::new(3.0, tint, &config));
                spawn_flare(
                    &mut commands,
                    at,
                    Flare::new(3.0, 2.5, Color::srgb(1.0, 0.55, 0.25)),
                );
            }
            CosmicEvent::ProbeLaunched { at, .. } => {
                spawn_shockwave(&mut commands, at, Shockwave::new(0.5, Color::WHITE, &config));
            }
            CosmicEvent::ProbeSpent { at, .. } => {
                spawn_shockwave(
                    &mut commands,
                    at,
                    Shockwave::new(0.75, Color::srgb(0.7, 0.7, 0.75), &config),
                );
            }
            CosmicEvent::ProbeThrust { .. } => {}
        }
    }
}

/// Age shockwaves and flares; despawn the faded ones.
pub fn effect_ageing_system(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    mut waves: Query<(Entity, &mut Shockwave)>,
    mut flares: Query<(Entity, &mut Flare)>,
) {
    for (entity, mut wave) in waves.iter_mut() {
        if !wave.advance(&config) {
            commands.entity(entity).despawn();
        }
    }
    for (entity, mut flare) in flares.iter_mut() {
        if !flare.advance(&config) {
            commands.entity(entity).despawn();
        }
    }
}

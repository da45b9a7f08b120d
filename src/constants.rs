//! Centralised simulation and presentation constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::BackdropConfig`] mirrors every value and lets
//! `assets/backdrop.toml` override any subset at startup.
//!
//! ## Units
//!
//! The simulation advances in fixed ticks (see [`TICK_HZ`]).  Velocities are
//! in world units **per tick** and timers count ticks, so every value below
//! keeps the meaning it had when the backdrop was tuned frame-by-frame.

// ── Field ─────────────────────────────────────────────────────────────────────

/// Fallback field width used until the primary window reports its size.
pub const FIELD_WIDTH: f32 = 1200.0;

/// Fallback field height used until the primary window reports its size.
pub const FIELD_HEIGHT: f32 = 680.0;

/// Number of asteroids spawned whenever the field is (re)initialised.
pub const INITIAL_ASTEROIDS: usize = 60;

/// Population floor.  While fewer bodies are alive, one asteroid is added per tick.
pub const MIN_POPULATION: usize = 20;

/// Simulation tick rate (Hz).
pub const TICK_HZ: f64 = 60.0;

// ── Gravity ───────────────────────────────────────────────────────────────────

/// Inverse-square pull strength: `Δv = G · m_other / d²` per tick.
///
/// Tested range: 0.2–1.5.  Above ~2.0 asteroids slingshot off-screen on their
/// first close pass.
pub const GRAVITY_CONST: f32 = 0.5;

/// Pairs closer than this receive no pull (avoids the singularity at `d → 0`).
pub const MIN_GRAVITY_DIST: f32 = 10.0;

/// Pairs farther than this receive no pull.
pub const MAX_GRAVITY_DIST: f32 = 1200.0;

// ── Contact & absorption ──────────────────────────────────────────────────────

/// Two bodies touch when `dist < (r_a + r_b) · COLLISION_FACTOR`.
pub const COLLISION_FACTOR: f32 = 0.8;

/// Fraction of the prey's mass added to the predator on absorption.
pub const ABSORB_MASS_GAIN: f32 = 0.5;

/// Fraction of the prey's radius added to the predator on absorption.
pub const ABSORB_RADIUS_GAIN: f32 = 0.2;

/// Hard cap on any star radius.
pub const MAX_STAR_RADIUS: f32 = 40.0;

/// A star swallows another star only when at least this many times heavier.
///
/// Touching stars closer in mass than this clash instead.
pub const STAR_ABSORB_RATIO: f32 = 1.25;

/// Fraction of its mass the lighter star loses in a clash.  The heavier star
/// loses half of this fraction.
pub const STAR_CLASH_DAMAGE: f32 = 0.2;

/// Velocity kick (units/tick) pushing clashing stars apart.
pub const STAR_CLASH_REPEL: f32 = 0.6;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Asteroid velocity range per axis is `±ASTEROID_SPEED / 2`.
pub const ASTEROID_SPEED: f32 = 1.5;

pub const ASTEROID_RADIUS_MIN: f32 = 0.5;
pub const ASTEROID_RADIUS_MAX: f32 = 2.0;

/// Asteroid tint alpha range.
pub const ASTEROID_ALPHA_MIN: f32 = 0.3;
pub const ASTEROID_ALPHA_MAX: f32 = 0.8;

// ── Stars ─────────────────────────────────────────────────────────────────────

/// Mass of a freshly ignited (uncharged) star.
pub const STAR_BASE_MASS: f32 = 80.0;

pub const STAR_RADIUS_MIN: f32 = 5.0;
pub const STAR_RADIUS_MAX: f32 = 8.0;

/// Star velocity range per axis is `±STAR_DRIFT / 2`.
pub const STAR_DRIFT: f32 = 0.2;

/// Mass radiated away per tick.  At 0.01 an unfed base star collapses after
/// roughly a minute.
pub const STAR_MASS_DECAY: f32 = 0.01;

/// Stars lighter than this become dying stars.
pub const STAR_COLLAPSE_MASS: f32 = 40.0;

/// Ticks a dying star lingers before reverting to an asteroid.
pub const DYING_STAR_TICKS: u32 = 180;

/// Per-tick radius multiplier for dying stars.
pub const DYING_STAR_SHRINK: f32 = 0.99;

/// Palette stars are ignited with.
pub const STAR_PALETTE: [&str; 5] = ["#ff3366", "#00f0ff", "#ffcc00", "#cc00ff", "#ffffff"];

// ── Charging (pointer held) ───────────────────────────────────────────────────

/// Mass added per tick while the pointer holds a protostar.
pub const CHARGE_MASS_RATE: f32 = 1.5;

/// Radius added per tick while charging.
pub const CHARGE_RADIUS_RATE: f32 = 0.08;

/// Upper bound on a charged protostar's mass.
pub const MAX_CHARGE_MASS: f32 = 400.0;

// ── Probes & debris ───────────────────────────────────────────────────────────

/// Ticks a star must wait between probe launches.
pub const PROBE_COOLDOWN_TICKS: u32 = 300;

/// Launch chance per eligible tick, per 100 units of star mass.
pub const PROBE_LAUNCH_CHANCE: f32 = 0.01;

/// Launch speed relative to the parent star.
pub const PROBE_SPEED: f32 = 4.0;

/// Mass a star spends on each probe.
pub const PROBE_MASS_COST: f32 = 1.0;

pub const PROBE_RADIUS: f32 = 2.5;

/// Ticks of thrust a probe carries.
pub const PROBE_FUEL_TICKS: u32 = 120;

/// Per-tick acceleration along the heading while fuel lasts.
pub const PROBE_THRUST: f32 = 0.02;

/// Ticks after launch during which nothing can absorb the probe.  Without it
/// the parent star swallows the probe on the tick after launch.
pub const PROBE_GRACE_TICKS: u32 = 30;

/// Ticks debris drifts before it is removed.
pub const DEBRIS_TICKS: u32 = 240;

/// Per-tick velocity multiplier for debris.
pub const DEBRIS_DRAG: f32 = 0.99;

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Positions retained per body for the motion trail.
pub const MAX_TRAIL: usize = 15;

/// Asteroids closer than this are joined by a connection line.
pub const CONNECTION_DISTANCE: f32 = 110.0;

/// Peak alpha of a connection line (at zero distance).
pub const CONNECTION_ALPHA: f32 = 0.25;

/// Star glow halo extent as a multiple of the star radius.
pub const GLOW_SCALE: f32 = 3.0;

// ── Effects ───────────────────────────────────────────────────────────────────

/// Shockwave max radius per unit of intensity.
pub const SHOCKWAVE_RADIUS_PER_INTENSITY: f32 = 30.0;

/// Shockwave life lost per tick per unit of intensity.
pub const SHOCKWAVE_DECAY: f32 = 0.02;

/// Flare life lost per tick.
pub const FLARE_DECAY: f32 = 0.03;

// ── HUD & UI ──────────────────────────────────────────────────────────────────

/// Seconds between object-counter refreshes.
pub const HUD_REFRESH_SECS: f32 = 0.2;

/// Interface panel offset per pixel of cursor displacement from centre.
pub const PARALLAX_FACTOR: f32 = -0.01;

/// Card tilt at the card edge (degrees).
pub const CARD_MAX_TILT_DEG: f32 = 15.0;

/// Card scale while hovered.
pub const CARD_HOVER_SCALE: f32 = 1.05;

pub const HUD_FONT_SIZE: f32 = 14.0;

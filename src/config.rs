//! Runtime configuration loaded from `assets/backdrop.toml`.
//!
//! [`BackdropConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_backdrop_config`] reads
//! `assets/backdrop.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<BackdropConfig>` to any system parameter list and read
//! values with `config.gravity_const`, `config.max_trail`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `BackdropConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_gravity_const, validate_non_negative, validate_ordered, validate_range,
    BackdropError, BackdropResult,
};
use crate::palette::StarPalette;
use crate::simulation::SimRng;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/backdrop.toml";

/// Runtime-tunable simulation and presentation configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    // ── Field ─────────────────────────────────────────────────────────────────
    pub field_width: f32,
    pub field_height: f32,
    pub initial_asteroids: usize,
    pub min_population: usize,
    pub tick_hz: f64,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,

    // ── Gravity ───────────────────────────────────────────────────────────────
    pub gravity_const: f32,
    pub min_gravity_dist: f32,
    pub max_gravity_dist: f32,

    // ── Contact & absorption ──────────────────────────────────────────────────
    pub collision_factor: f32,
    pub absorb_mass_gain: f32,
    pub absorb_radius_gain: f32,
    pub max_star_radius: f32,
    pub star_absorb_ratio: f32,
    pub star_clash_damage: f32,
    pub star_clash_repel: f32,

    // ── Asteroids ─────────────────────────────────────────────────────────────
    pub asteroid_speed: f32,
    pub asteroid_radius_min: f32,
    pub asteroid_radius_max: f32,
    pub asteroid_alpha_min: f32,
    pub asteroid_alpha_max: f32,

    // ── Stars ─────────────────────────────────────────────────────────────────
    pub star_base_mass: f32,
    pub star_radius_min: f32,
    pub star_radius_max: f32,
    pub star_drift: f32,
    pub star_mass_decay: f32,
    pub star_collapse_mass: f32,
    pub dying_star_ticks: u32,
    pub dying_star_shrink: f32,
    pub star_palette: Vec<String>,

    // ── Charging ──────────────────────────────────────────────────────────────
    pub charge_mass_rate: f32,
    pub charge_radius_rate: f32,
    pub max_charge_mass: f32,

    // ── Probes & debris ───────────────────────────────────────────────────────
    pub probe_cooldown_ticks: u32,
    pub probe_launch_chance: f32,
    pub probe_speed: f32,
    pub probe_mass_cost: f32,
    pub probe_radius: f32,
    pub probe_fuel_ticks: u32,
    pub probe_thrust: f32,
    pub probe_grace_ticks: u32,
    pub debris_ticks: u32,
    pub debris_drag: f32,

    // ── Rendering ─────────────────────────────────────────────────────────────
    pub max_trail: usize,
    pub show_connections: bool,
    pub connection_distance: f32,
    pub connection_alpha: f32,
    pub glow_scale: f32,

    // ── Effects ───────────────────────────────────────────────────────────────
    pub shockwave_radius_per_intensity: f32,
    pub shockwave_decay: f32,
    pub flare_decay: f32,

    // ── HUD & UI ──────────────────────────────────────────────────────────────
    pub hud_refresh_secs: f32,
    pub parallax_factor: f32,
    pub card_max_tilt_deg: f32,
    pub card_hover_scale: f32,
    pub hud_font_size: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            // Field
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            initial_asteroids: INITIAL_ASTEROIDS,
            min_population: MIN_POPULATION,
            tick_hz: TICK_HZ,
            seed: None,
            // Gravity
            gravity_const: GRAVITY_CONST,
            min_gravity_dist: MIN_GRAVITY_DIST,
            max_gravity_dist: MAX_GRAVITY_DIST,
            // Contact & absorption
            collision_factor: COLLISION_FACTOR,
            absorb_mass_gain: ABSORB_MASS_GAIN,
            absorb_radius_gain: ABSORB_RADIUS_GAIN,
            max_star_radius: MAX_STAR_RADIUS,
            star_absorb_ratio: STAR_ABSORB_RATIO,
            star_clash_damage: STAR_CLASH_DAMAGE,
            star_clash_repel: STAR_CLASH_REPEL,
            // Asteroids
            asteroid_speed: ASTEROID_SPEED,
            asteroid_radius_min: ASTEROID_RADIUS_MIN,
            asteroid_radius_max: ASTEROID_RADIUS_MAX,
            asteroid_alpha_min: ASTEROID_ALPHA_MIN,
            asteroid_alpha_max: ASTEROID_ALPHA_MAX,
            // Stars
            star_base_mass: STAR_BASE_MASS,
            star_radius_min: STAR_RADIUS_MIN,
            star_radius_max: STAR_RADIUS_MAX,
            star_drift: STAR_DRIFT,
            star_mass_decay: STAR_MASS_DECAY,
            star_collapse_mass: STAR_COLLAPSE_MASS,
            dying_star_ticks: DYING_STAR_TICKS,
            dying_star_shrink: DYING_STAR_SHRINK,
            star_palette: STAR_PALETTE.iter().map(|s| s.to_string()).collect(),
            // Charging
            charge_mass_rate: CHARGE_MASS_RATE,
            charge_radius_rate: CHARGE_RADIUS_RATE,
            max_charge_mass: MAX_CHARGE_MASS,
            // Probes & debris
            probe_cooldown_ticks: PROBE_COOLDOWN_TICKS,
            probe_launch_chance: PROBE_LAUNCH_CHANCE,
            probe_speed: PROBE_SPEED,
            probe_mass_cost: PROBE_MASS_COST,
            probe_radius: PROBE_RADIUS,
            probe_fuel_ticks: PROBE_FUEL_TICKS,
            probe_thrust: PROBE_THRUST,
            probe_grace_ticks: PROBE_GRACE_TICKS,
            debris_ticks: DEBRIS_TICKS,
            debris_drag: DEBRIS_DRAG,
            // Rendering
            max_trail: MAX_TRAIL,
            show_connections: true,
            connection_distance: CONNECTION_DISTANCE,
            connection_alpha: CONNECTION_ALPHA,
            glow_scale: GLOW_SCALE,
            // Effects
            shockwave_radius_per_intensity: SHOCKWAVE_RADIUS_PER_INTENSITY,
            shockwave_decay: SHOCKWAVE_DECAY,
            flare_decay: FLARE_DECAY,
            // HUD & UI
            hud_refresh_secs: HUD_REFRESH_SECS,
            parallax_factor: PARALLAX_FACTOR,
            card_max_tilt_deg: CARD_MAX_TILT_DEG,
            card_hover_scale: CARD_HOVER_SCALE,
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl BackdropConfig {
    /// Parse a config from TOML text.  Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str, path: &str) -> BackdropResult<Self> {
        toml::from_str::<BackdropConfig>(contents).map_err(|source| BackdropError::ConfigParse {
            path: path.to_string(),
            source,
        })
    }

    /// Reject values that make the simulation degenerate.
    pub fn validate(&self) -> BackdropResult<()> {
        validate_gravity_const(self.gravity_const)?;
        validate_range(
            "COLLISION_FACTOR",
            self.collision_factor,
            0.0,
            2.0,
            "(0.0, 2.0]",
        )?;
        validate_range(
            "MAX_GRAVITY_DIST",
            self.max_gravity_dist,
            self.min_gravity_dist.max(0.0),
            f32::MAX,
            "(MIN_GRAVITY_DIST, ∞)",
        )?;
        validate_range(
            "STAR_ABSORB_RATIO",
            self.star_absorb_ratio,
            0.0,
            10.0,
            "(0.0, 10.0]",
        )?;
        validate_range(
            "STAR_CLASH_DAMAGE",
            self.star_clash_damage,
            0.0,
            1.0,
            "(0.0, 1.0]",
        )?;
        validate_range(
            "DEBRIS_DRAG",
            self.debris_drag,
            0.0,
            1.0,
            "(0.0, 1.0]",
        )?;
        validate_range("TICK_HZ", self.tick_hz as f32, 0.0, 1000.0, "(0, 1000]")?;
        validate_range(
            "FIELD_WIDTH",
            self.field_width.min(self.field_height),
            0.0,
            f32::MAX,
            "(0.0, ∞)",
        )?;
        // Ranges and spreads handed to the RNG when bodies spawn.
        validate_ordered(
            "ASTEROID_RADIUS",
            self.asteroid_radius_min,
            self.asteroid_radius_max,
        )?;
        validate_ordered(
            "ASTEROID_ALPHA",
            self.asteroid_alpha_min,
            self.asteroid_alpha_max,
        )?;
        validate_ordered("STAR_RADIUS", self.star_radius_min, self.star_radius_max)?;
        validate_non_negative("ASTEROID_SPEED", self.asteroid_speed)?;
        validate_non_negative("STAR_DRIFT", self.star_drift)?;
        Ok(())
    }
}

/// Read and validate the config at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_config_file(path: &Path) -> BackdropResult<Option<BackdropConfig>> {
    let display = path.display().to_string();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(BackdropError::ConfigRead {
                path: display,
                source,
            })
        }
    };
    let config = BackdropConfig::from_toml_str(&contents, &display)?;
    config.validate()?;
    Ok(Some(config))
}

/// Startup system: attempt to load `assets/backdrop.toml` and overwrite the
/// config, palette, and RNG resources.
///
/// Parse or validation errors are logged but do not abort the backdrop; the
/// compiled defaults stay in place.  A missing file is silently ignored.
pub fn load_backdrop_config(
    mut config: ResMut<BackdropConfig>,
    mut palette: ResMut<StarPalette>,
    mut rng: ResMut<SimRng>,
    mut fixed: ResMut<Time<Fixed>>,
) {
    match read_config_file(Path::new(CONFIG_PATH)) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded backdrop config from {CONFIG_PATH}");
        }
        Ok(None) => info!("No {CONFIG_PATH} found; using compiled defaults"),
        Err(e) => warn!("{e}; using compiled defaults"),
    }

    match StarPalette::from_hex_list(&config.star_palette) {
        Ok(loaded) => *palette = loaded,
        Err(e) => warn!("{e}; keeping the default star palette"),
    }

    if let Some(seed) = config.seed {
        *rng = SimRng::seeded(seed);
        info!("Simulation RNG seeded with {seed}");
    }

    *fixed = Time::<Fixed>::from_hz(config.tick_hz);
}

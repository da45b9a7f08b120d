//! Body component and state model.
//!
//! Every simulated entity is a [`Body`].  What a body can do is decided by its
//! [`BodyKind`], a closed state enum that carries the timers specific to each
//! state, so a probe can never also be a star.
//!
//! ```text
//!   Protostar ──release──▶ Star ──mass < collapse──▶ DyingStar ──timer──▶ Asteroid
//!                           │
//!                           └──launch──▶ Probe ──fuel = 0──▶ Debris ──timer──▶ (removed)
//! ```

use crate::config::BackdropConfig;
use crate::physics::FieldBounds;
use bevy::prelude::*;
use rand::Rng;
use std::collections::VecDeque;

/// State of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    /// Light drifting rock.  Attracted by stars but attracts nothing itself.
    Asteroid,
    /// A star being charged under the pointer.  Pinned to the cursor.
    Protostar,
    /// Massive body: attracts, absorbs, and launches probes.
    Star {
        /// Ticks since the last probe launch.
        probe_timer: u32,
    },
    /// A star that fell below the collapse mass.  Still attracts; no longer eats.
    DyingStar {
        /// Ticks until the star reverts to an asteroid.
        remaining: u32,
    },
    /// Fast-moving scout launched from a star.
    Probe {
        /// Ticks of thrust left.
        fuel: u32,
        /// Ticks during which the probe cannot be absorbed.
        grace: u32,
    },
    /// Burnt-out probe drifting to a stop.
    Debris {
        /// Ticks until removal.
        remaining: u32,
    },
}

impl BodyKind {
    /// Whether this body pulls on others.
    pub fn gravitates(self) -> bool {
        matches!(
            self,
            BodyKind::Star { .. } | BodyKind::DyingStar { .. } | BodyKind::Protostar
        )
    }

    /// Whether this body can swallow others on contact.
    pub fn can_absorb(self) -> bool {
        matches!(self, BodyKind::Star { .. })
    }

    pub fn is_star(self) -> bool {
        matches!(self, BodyKind::Star { .. })
    }

    /// Whether a star touching this body may swallow it.  Other stars are
    /// handled separately by mass comparison.
    pub fn is_prey(self) -> bool {
        match self {
            BodyKind::Asteroid | BodyKind::Debris { .. } | BodyKind::DyingStar { .. } => true,
            BodyKind::Probe { grace, .. } => grace == 0,
            BodyKind::Star { .. } | BodyKind::Protostar => false,
        }
    }

    /// Pinned bodies ignore gravity and do not integrate velocity.
    pub fn is_pinned(self) -> bool {
        matches!(self, BodyKind::Protostar)
    }

    /// Drawn as a triangle rather than a disc.
    pub fn is_triangular(self) -> bool {
        matches!(self, BodyKind::Probe { .. } | BodyKind::Debris { .. })
    }

    /// Coarse category used for scoring and effects.
    pub fn class(self) -> BodyClass {
        match self {
            BodyKind::Asteroid => BodyClass::Asteroid,
            BodyKind::Protostar | BodyKind::Star { .. } => BodyClass::Star,
            BodyKind::DyingStar { .. } => BodyClass::DyingStar,
            BodyKind::Probe { .. } => BodyClass::Probe,
            BodyKind::Debris { .. } => BodyClass::Debris,
        }
    }
}

/// [`BodyKind`] without its timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyClass {
    Asteroid,
    Star,
    DyingStar,
    Probe,
    Debris,
}

/// A simulated body.  Position lives in the entity's `Transform`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Body {
    pub kind: BodyKind,
    /// World units per tick.
    pub velocity: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub tint: Color,
}

impl Body {
    /// A small drifting asteroid with a translucent cyan tint.
    pub fn asteroid(rng: &mut impl Rng, config: &BackdropConfig) -> Self {
        let half_speed = config.asteroid_speed * 0.5;
        let alpha = rng.gen_range(config.asteroid_alpha_min..=config.asteroid_alpha_max);
        Self {
            kind: BodyKind::Asteroid,
            velocity: Vec2::new(
                rng.gen_range(-half_speed..=half_speed),
                rng.gen_range(-half_speed..=half_speed),
            ),
            mass: 1.0,
            radius: rng.gen_range(config.asteroid_radius_min..=config.asteroid_radius_max),
            tint: Color::srgba(100.0 / 255.0, 200.0 / 255.0, 1.0, alpha),
        }
    }

    /// A freshly ignited star at base mass with a slow random drift.
    pub fn star(tint: Color, rng: &mut impl Rng, config: &BackdropConfig) -> Self {
        let mut body = Self::protostar(tint, rng, config);
        body.ignite(rng, config);
        body
    }

    /// A star still charging under the pointer.
    pub fn protostar(tint: Color, rng: &mut impl Rng, config: &BackdropConfig) -> Self {
        Self {
            kind: BodyKind::Protostar,
            velocity: Vec2::ZERO,
            mass: config.star_base_mass,
            radius: rng.gen_range(config.star_radius_min..=config.star_radius_max),
            tint,
        }
    }

    /// A probe leaving its parent star with `velocity`.
    pub fn probe(velocity: Vec2, config: &BackdropConfig) -> Self {
        Self {
            kind: BodyKind::Probe {
                fuel: config.probe_fuel_ticks,
                grace: config.probe_grace_ticks,
            },
            velocity,
            mass: 1.0,
            radius: config.probe_radius,
            tint: Color::WHITE,
        }
    }

    /// Grow a protostar by one tick of charge.  Returns `false` once capped or
    /// if the body is not a protostar.
    pub fn charge(&mut self, config: &BackdropConfig) -> bool {
        if self.kind != BodyKind::Protostar || self.mass >= config.max_charge_mass {
            return false;
        }
        self.mass = (self.mass + config.charge_mass_rate).min(config.max_charge_mass);
        self.radius = (self.radius + config.charge_radius_rate).min(config.max_star_radius);
        true
    }

    /// Turn a protostar into a star with a small random drift.
    pub fn ignite(&mut self, rng: &mut impl Rng, config: &BackdropConfig) {
        if self.kind != BodyKind::Protostar {
            return;
        }
        let half_drift = config.star_drift * 0.5;
        self.kind = BodyKind::Star { probe_timer: 0 };
        self.velocity = Vec2::new(
            rng.gen_range(-half_drift..=half_drift),
            rng.gen_range(-half_drift..=half_drift),
        );
    }

    /// Swallow `prey`: gain half its mass and a fifth of its radius, capped.
    pub fn absorb(&mut self, prey: &Body, config: &BackdropConfig) {
        self.mass += prey.mass * config.absorb_mass_gain;
        self.radius =
            (self.radius + prey.radius * config.absorb_radius_gain).min(config.max_star_radius);
    }
}

/// Recent positions of a body, oldest first.
#[derive(Component, Debug, Clone, Default)]
pub struct Trail(pub VecDeque<Vec2>);

impl Trail {
    /// Append `position`, dropping the oldest entries beyond `cap`.
    pub fn record(&mut self, position: Vec2, cap: usize) {
        self.0.push_back(position);
        while self.0.len() > cap {
            self.0.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Marker for everything that belongs to the current field and is cleared on
/// reinitialisation (bodies, shockwaves, flares, sparks).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Ephemeral;

/// Spawn `body` at `position` with an empty trail.
pub fn spawn_body(commands: &mut Commands, position: Vec2, body: Body) -> Entity {
    commands
        .spawn((
            body,
            Trail::default(),
            Ephemeral,
            Transform::from_translation(position.extend(0.0)),
            Visibility::default(),
        ))
        .id()
}

/// Spawn `count` asteroids uniformly across `bounds`.
pub fn spawn_asteroid_field(
    commands: &mut Commands,
    count: usize,
    bounds: &FieldBounds,
    rng: &mut impl Rng,
    config: &BackdropConfig,
) {
    for _ in 0..count {
        let position = bounds.random_point(rng);
        spawn_body(commands, position, Body::asteroid(rng, config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn asteroid_respects_configured_ranges() {
        let cfg = BackdropConfig::default();
        let mut rng = rng();
        for _ in 0..100 {
            let a = Body::asteroid(&mut rng, &cfg);
            assert_eq!(a.kind, BodyKind::Asteroid);
            assert_eq!(a.mass, 1.0);
            assert!(a.radius >= cfg.asteroid_radius_min && a.radius <= cfg.asteroid_radius_max);
            assert!(a.velocity.x.abs() <= cfg.asteroid_speed * 0.5);
            assert!(a.velocity.y.abs() <= cfg.asteroid_speed * 0.5);
        }
    }

    #[test]
    fn star_starts_at_base_mass_with_small_drift() {
        let cfg = BackdropConfig::default();
        let s = Body::star(Color::WHITE, &mut rng(), &cfg);
        assert_eq!(s.kind, BodyKind::Star { probe_timer: 0 });
        assert_eq!(s.mass, cfg.star_base_mass);
        assert!(s.radius >= cfg.star_radius_min && s.radius <= cfg.star_radius_max);
        assert!(s.velocity.length() <= cfg.star_drift);
    }

    #[test]
    fn charging_grows_until_capped() {
        let cfg = BackdropConfig::default();
        let mut p = Body::protostar(Color::WHITE, &mut rng(), &cfg);
        let start_mass = p.mass;
        assert!(p.charge(&cfg));
        assert!(p.mass > start_mass);
        while p.charge(&cfg) {}
        assert_eq!(p.mass, cfg.max_charge_mass);
        assert!(p.radius <= cfg.max_star_radius);
    }

    #[test]
    fn charging_a_star_does_nothing() {
        let cfg = BackdropConfig::default();
        let mut s = Body::star(Color::WHITE, &mut rng(), &cfg);
        let before = s.clone();
        assert!(!s.charge(&cfg));
        assert_eq!(s, before);
    }

    #[test]
    fn absorb_adds_half_mass_and_caps_radius() {
        let cfg = BackdropConfig::default();
        let mut star = Body::star(Color::WHITE, &mut rng(), &cfg);
        star.radius = 39.9;
        let mut prey = Body::asteroid(&mut rng(), &cfg);
        prey.mass = 10.0;
        prey.radius = 2.0;
        let before = star.mass;
        star.absorb(&prey, &cfg);
        assert_eq!(star.mass, before + 5.0);
        assert_eq!(star.radius, cfg.max_star_radius);
    }

    #[test]
    fn probe_is_immune_during_grace() {
        let cfg = BackdropConfig::default();
        let probe = Body::probe(Vec2::X, &cfg);
        assert!(!probe.kind.is_prey());
        let spent = BodyKind::Probe { fuel: 10, grace: 0 };
        assert!(spent.is_prey());
    }

    #[test]
    fn kinds_have_disjoint_roles() {
        let star = BodyKind::Star { probe_timer: 0 };
        assert!(star.gravitates() && star.can_absorb() && !star.is_prey());
        assert!(BodyKind::Protostar.gravitates() && BodyKind::Protostar.is_pinned());
        assert!(!BodyKind::Protostar.is_prey());
        let dying = BodyKind::DyingStar { remaining: 5 };
        assert!(dying.gravitates() && !dying.can_absorb() && dying.is_prey());
        assert!(!BodyKind::Asteroid.gravitates());
    }

    #[test]
    fn trail_keeps_only_the_newest_positions() {
        let mut trail = Trail::default();
        for i in 0..20 {
            trail.record(Vec2::splat(i as f32), 15);
        }
        assert_eq!(trail.0.len(), 15);
        assert_eq!(trail.0.front(), Some(&Vec2::splat(5.0)));
        assert_eq!(trail.0.back(), Some(&Vec2::splat(19.0)));
    }
}

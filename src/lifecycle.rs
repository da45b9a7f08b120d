//! Per-body state transitions that do not involve other bodies.
//!
//! [`advance`] applies one tick of ageing to a body in place and reports what
//! changed so the calling system can spawn, despawn, or raise events.

use crate::body::{Body, BodyKind};
use crate::config::BackdropConfig;
use bevy::prelude::*;
use rand::Rng;

/// What [`advance`] did to a body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The star spent mass on a probe; spawn one with `velocity`.
    LaunchProbe { velocity: Vec2 },
    /// Star → dying star.
    Collapse,
    /// Dying star → asteroid.
    Extinguish,
    /// The probe fired its engine along `heading`.
    Thrust { heading: Vec2 },
    /// Probe → debris.
    Exhaust,
    /// The debris has faded; despawn it.
    Expire,
}

/// Age `body` by one tick.
pub fn advance(body: &mut Body, rng: &mut impl Rng, config: &BackdropConfig) -> Option<Transition> {
    match body.kind {
        BodyKind::Asteroid | BodyKind::Protostar => None,
        BodyKind::Star { probe_timer } => advance_star(body, probe_timer, rng, config),
        BodyKind::DyingStar { remaining } => advance_dying_star(body, remaining, config),
        BodyKind::Probe { fuel, grace } => advance_probe(body, fuel, grace, config),
        BodyKind::Debris { remaining } => {
            body.velocity *= config.debris_drag;
            let remaining = remaining.saturating_sub(1);
            body.kind = BodyKind::Debris { remaining };
            (remaining == 0).then_some(Transition::Expire)
        }
    }
}

fn advance_star(
    body: &mut Body,
    probe_timer: u32,
    rng: &mut impl Rng,
    config: &BackdropConfig,
) -> Option<Transition> {
    body.mass -= config.star_mass_decay;
    if body.mass < config.star_collapse_mass {
        body.kind = BodyKind::DyingStar {
            remaining: config.dying_star_ticks,
        };
        return Some(Transition::Collapse);
    }

    let probe_timer = probe_timer + 1;
    body.kind = BodyKind::Star { probe_timer };

    let chance = config.probe_launch_chance * (body.mass / 100.0);
    if probe_timer > config.probe_cooldown_ticks && rng.gen::<f32>() < chance {
        body.kind = BodyKind::Star { probe_timer: 0 };
        body.mass -= config.probe_mass_cost;
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let velocity = Vec2::from_angle(angle) * config.probe_speed + body.velocity;
        return Some(Transition::LaunchProbe { velocity });
    }
    None
}

fn advance_dying_star(
    body: &mut Body,
    remaining: u32,
    config: &BackdropConfig,
) -> Option<Transition> {
    body.mass = (body.mass - config.star_mass_decay).max(1.0);
    body.radius = (body.radius * config.dying_star_shrink).max(config.asteroid_radius_max);

    let remaining = remaining.saturating_sub(1);
    if remaining > 0 {
        body.kind = BodyKind::DyingStar { remaining };
        return None;
    }

    body.kind = BodyKind::Asteroid;
    body.mass = 1.0;
    body.radius = config.asteroid_radius_max;
    body.tint = body.tint.with_alpha(config.asteroid_alpha_max);
    Some(Transition::Extinguish)
}

fn advance_probe(
    body: &mut Body,
    fuel: u32,
    grace: u32,
    config: &BackdropConfig,
) -> Option<Transition> {
    let grace = grace.saturating_sub(1);
    if fuel == 0 {
        body.kind = BodyKind::Debris {
            remaining: config.debris_ticks,
        };
        body.tint = Color::srgba(0.62, 0.62, 0.68, 0.85);
        return Some(Transition::Exhaust);
    }

    body.kind = BodyKind::Probe {
        fuel: fuel - 1,
        grace,
    };
    let heading = body.velocity.try_normalize()?;
    body.velocity += heading * config.probe_thrust;
    Some(Transition::Thrust { heading })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(21)
    }

    #[test]
    fn star_below_collapse_mass_starts_dying() {
        let cfg = BackdropConfig::default();
        let mut star = Body::star(Color::WHITE, &mut rng(), &cfg);
        star.mass = cfg.star_collapse_mass;
        let t = advance(&mut star, &mut rng(), &cfg);
        assert_eq!(t, Some(Transition::Collapse));
        assert_eq!(
            star.kind,
            BodyKind::DyingStar {
                remaining: cfg.dying_star_ticks
            }
        );
    }

    #[test]
    fn dying_star_reverts_to_asteroid() {
        let cfg = BackdropConfig::default();
        let mut rng = rng();
        let mut star = Body::star(Color::WHITE, &mut rng, &cfg);
        star.mass = 30.0;
        star.kind = BodyKind::DyingStar { remaining: 3 };
        assert_eq!(advance(&mut star, &mut rng, &cfg), None);
        assert_eq!(advance(&mut star, &mut rng, &cfg), None);
        assert_eq!(
            advance(&mut star, &mut rng, &cfg),
            Some(Transition::Extinguish)
        );
        assert_eq!(star.kind, BodyKind::Asteroid);
        assert_eq!(star.mass, 1.0);
        assert_eq!(star.radius, cfg.asteroid_radius_max);
    }

    #[test]
    fn no_probe_before_cooldown() {
        let cfg = BackdropConfig {
            probe_launch_chance: 100.0,
            ..Default::default()
        };
        let mut rng = rng();
        let mut star = Body::star(Color::WHITE, &mut rng, &cfg);
        for _ in 0..cfg.probe_cooldown_ticks {
            assert_eq!(advance(&mut star, &mut rng, &cfg), None);
        }
        let launched = advance(&mut star, &mut rng, &cfg);
        let Some(Transition::LaunchProbe { velocity }) = launched else {
            panic!("expected a launch after cooldown, got {launched:?}");
        };
        assert!((velocity - star.velocity).length() > cfg.probe_speed - 1e-3);
        assert_eq!(star.kind, BodyKind::Star { probe_timer: 0 });
    }

    #[test]
    fn launch_costs_mass() {
        let cfg = BackdropConfig {
            probe_launch_chance: 100.0,
            probe_cooldown_ticks: 0,
            star_mass_decay: 0.0,
            ..Default::default()
        };
        let mut rng = rng();
        let mut star = Body::star(Color::WHITE, &mut rng, &cfg);
        let before = star.mass;
        assert!(matches!(
            advance(&mut star, &mut rng, &cfg),
            Some(Transition::LaunchProbe { .. })
        ));
        assert_eq!(star.mass, before - cfg.probe_mass_cost);
    }

    #[test]
    fn probe_thrusts_then_becomes_debris() {
        let cfg = BackdropConfig {
            probe_fuel_ticks: 2,
            ..Default::default()
        };
        let mut rng = rng();
        let mut probe = Body::probe(Vec2::new(4.0, 0.0), &cfg);

        assert_eq!(
            advance(&mut probe, &mut rng, &cfg),
            Some(Transition::Thrust { heading: Vec2::X })
        );
        assert!(probe.velocity.x > 4.0);
        assert!(matches!(
            advance(&mut probe, &mut rng, &cfg),
            Some(Transition::Thrust { .. })
        ));
        assert_eq!(advance(&mut probe, &mut rng, &cfg), Some(Transition::Exhaust));
        assert_eq!(
            probe.kind,
            BodyKind::Debris {
                remaining: cfg.debris_ticks
            }
        );
    }

    #[test]
    fn probe_grace_counts_down() {
        let cfg = BackdropConfig::default();
        let mut probe = Body::probe(Vec2::new(0.0, 4.0), &cfg);
        advance(&mut probe, &mut rng(), &cfg);
        assert!(matches!(
            probe.kind,
            BodyKind::Probe { grace, .. } if grace == cfg.probe_grace_ticks - 1
        ));
    }

    #[test]
    fn debris_slows_and_expires() {
        let cfg = BackdropConfig::default();
        let mut rng = rng();
        let mut debris = Body::probe(Vec2::new(2.0, 0.0), &cfg);
        debris.kind = BodyKind::Debris { remaining: 2 };
        assert_eq!(advance(&mut debris, &mut rng, &cfg), None);
        assert!(debris.velocity.x < 2.0);
        assert_eq!(advance(&mut debris, &mut rng, &cfg), Some(Transition::Expire));
    }
}

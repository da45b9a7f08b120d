//! Messages emitted by the simulation for effects, sparks, and scoring.

use crate::body::BodyClass;
use bevy::prelude::*;

/// Something noteworthy happened in the field this tick.
///
/// The simulation only writes these; visual effects, sparks, and the score
/// each read them independently.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum CosmicEvent {
    /// A star swallowed another body.
    Absorbed {
        at: Vec2,
        tint: Color,
        prey: BodyClass,
        /// Shockwave strength: 1 for small prey, 3 for a swallowed star.
        intensity: f32,
    },
    /// Two stars of similar mass collided and pushed each other apart.
    StarClash {
        at: Vec2,
        tint: Color,
        other_tint: Color,
    },
    /// A charged protostar was released.
    Ignited { at: Vec2, tint: Color, mass: f32 },
    ProbeLaunched { at: Vec2, velocity: Vec2 },
    /// A probe fired its engine this tick.
    ProbeThrust { at: Vec2, heading: Vec2 },
    /// A probe ran out of fuel and became debris.
    ProbeSpent { at: Vec2, velocity: Vec2 },
    /// A star fell below the collapse mass.
    StarCollapsing { at: Vec2, tint: Color },
    /// A dying star burnt out into a plain asteroid.
    StarExtinguished { at: Vec2, tint: Color },
}

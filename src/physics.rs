//! Per-tick interaction and motion pass.
//!
//! [`step`] works on plain [`Slot`]s so it can be exercised without an ECS
//! world.  Bodies are processed one after another and each body sees the
//! already-updated state of the bodies processed before it, so the result
//! depends on slot order.  Callers sort slots by entity to keep that order
//! stable between ticks.
//!
//! For every live body *i* and every other live body *j*:
//!
//! 1. pairs where neither body gravitates are skipped;
//! 2. touching pairs (`dist < (r_i + r_j) · collision_factor`) resolve
//!    through [`resolve_contact`];
//! 3. otherwise, inside `(min_gravity_dist, max_gravity_dist)`, *i* is pulled
//!    toward *j* by `G · m_j / dist²`.
//!
//! After its pair loop body *i* moves by its velocity and wraps around the
//! field edges.

use crate::body::{Body, BodyClass, BodyKind};
use crate::config::BackdropConfig;
use crate::events::CosmicEvent;
use bevy::prelude::*;
use rand::Rng;

/// Visible simulation rectangle, centred on the world origin.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub half_extents: Vec2,
}

impl FieldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_extents: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.half_extents.x && p.y.abs() <= self.half_extents.y
    }

    /// Move `p` to the opposite edge if it left the field.  Returns `true`
    /// when the point wrapped.
    pub fn wrap(&self, p: &mut Vec2) -> bool {
        let h = self.half_extents;
        let mut wrapped = false;
        if p.x < -h.x {
            p.x = h.x;
            wrapped = true;
        } else if p.x > h.x {
            p.x = -h.x;
            wrapped = true;
        }
        if p.y < -h.y {
            p.y = h.y;
            wrapped = true;
        } else if p.y > h.y {
            p.y = -h.y;
            wrapped = true;
        }
        wrapped
    }

    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let h = self.half_extents;
        Vec2::new(rng.gen_range(-h.x..=h.x), rng.gen_range(-h.y..=h.y))
    }
}

impl Default for FieldBounds {
    fn default() -> Self {
        let config = BackdropConfig::default();
        Self::new(config.field_width, config.field_height)
    }
}

/// One body's working state during [`step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub position: Vec2,
    pub body: Body,
    /// Swallowed this tick; skipped from here on and despawned by the caller.
    pub consumed: bool,
    /// Crossed a field edge this tick.
    pub wrapped: bool,
}

impl Slot {
    pub fn new(position: Vec2, body: Body) -> Self {
        Self {
            position,
            body,
            consumed: false,
            wrapped: false,
        }
    }
}

/// Outcome of two bodies touching, from the point of view of the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    /// The first body swallowed the second.
    Absorbed(CosmicEvent),
    /// Two similar stars collided and pushed apart.
    Clash(CosmicEvent),
    /// The second body is the heavier star; it resolves the contact on its
    /// own turn.  No gravity is applied for this pair.
    Yield,
    /// Nothing happens on contact; gravity still applies.
    Pass,
}

/// Gravitational velocity change of a body at `delta` from an attractor of
/// mass `mass`, where `dist = |delta|`.
pub fn gravity_accel(delta: Vec2, dist: f32, mass: f32, gravity_const: f32) -> Vec2 {
    let force = gravity_const * mass / (dist * dist);
    (delta / dist) * force
}

/// Whether two bodies at distance `dist` are touching.
pub fn touching(a: &Body, b: &Body, dist: f32, collision_factor: f32) -> bool {
    dist < (a.radius + b.radius) * collision_factor
}

/// Resolve contact between `me` (processed now) and `other`.
pub fn resolve_contact(
    me: &mut Slot,
    other: &mut Slot,
    config: &BackdropConfig,
) -> Contact {
    if !me.body.kind.can_absorb() {
        return Contact::Pass;
    }

    if other.body.kind.is_star() {
        if me.body.mass >= other.body.mass * config.star_absorb_ratio {
            me.body.absorb(&other.body, config);
            return Contact::Absorbed(CosmicEvent::Absorbed {
                at: me.position,
                tint: me.body.tint,
                prey: BodyClass::Star,
                intensity: 3.0,
            });
        }
        if me.body.mass >= other.body.mass {
            return Contact::Clash(clash(me, other, config));
        }
        return Contact::Yield;
    }

    if other.body.kind.is_prey() {
        me.body.absorb(&other.body, config);
        let intensity = match other.body.kind {
            BodyKind::DyingStar { .. } => 2.0,
            _ => 1.0,
        };
        return Contact::Absorbed(CosmicEvent::Absorbed {
            at: me.position,
            tint: me.body.tint,
            prey: other.body.kind.class(),
            intensity,
        });
    }

    Contact::Pass
}

/// Damage both stars and push them apart so they stop touching.
///
/// `me` is the heavier (or equal) star.
fn clash(me: &mut Slot, other: &mut Slot, config: &BackdropConfig) -> CosmicEvent {
    let delta = other.position - me.position;
    let normal = delta.try_normalize().unwrap_or(Vec2::X);

    me.body.mass *= 1.0 - config.star_clash_damage * 0.5;
    other.body.mass *= 1.0 - config.star_clash_damage;

    me.body.velocity -= normal * config.star_clash_repel;
    other.body.velocity += normal * config.star_clash_repel;

    let contact_dist = (me.body.radius + other.body.radius) * config.collision_factor;
    other.position = me.position + normal * contact_dist;

    CosmicEvent::StarClash {
        at: me.position + normal * contact_dist * 0.5,
        tint: me.body.tint,
        other_tint: other.body.tint,
    }
}

/// Borrow two distinct elements mutably.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Advance every slot by one tick.  Returns the events raised.
pub fn step(slots: &mut [Slot], bounds: &FieldBounds, config: &BackdropConfig) -> Vec<CosmicEvent> {
    let mut events = Vec::new();

    for i in 0..slots.len() {
        if slots[i].consumed {
            continue;
        }

        for j in 0..slots.len() {
            if i == j || slots[j].consumed {
                continue;
            }
            let (me, other) = pair_mut(slots, i, j);
            if !me.body.kind.gravitates() && !other.body.kind.gravitates() {
                continue;
            }

            let delta = other.position - me.position;
            let dist = delta.length();

            if touching(&me.body, &other.body, dist, config.collision_factor) {
                match resolve_contact(me, other, config) {
                    Contact::Absorbed(event) => {
                        other.consumed = true;
                        events.push(event);
                        continue;
                    }
                    Contact::Clash(event) => {
                        other.wrapped |= bounds.wrap(&mut other.position);
                        events.push(event);
                        continue;
                    }
                    Contact::Yield => continue,
                    Contact::Pass => {}
                }
            }

            if !me.body.kind.is_pinned()
                && dist > config.min_gravity_dist
                && dist < config.max_gravity_dist
            {
                me.body.velocity +=
                    gravity_accel(delta, dist, other.body.mass, config.gravity_const);
            }
        }

        let slot = &mut slots[i];
        if !slot.body.kind.is_pinned() {
            slot.position += slot.body.velocity;
        }
        slot.wrapped |= bounds.wrap(&mut slot.position);
    }

    events
}

//! Skill cards: translucent panels along the bottom of the field that tilt
//! toward the cursor while hovered.

use crate::config::BackdropConfig;
use crate::input::PointerState;
use crate::physics::FieldBounds;
use crate::simulation::BackdropStartup;
use bevy::prelude::*;

pub const SKILL_LABELS: [&str; 4] = ["RUST", "BEVY ECS", "SIMULATION", "GRAPHICS"];
pub const CARD_SIZE: Vec2 = Vec2::new(180.0, 96.0);
const CARD_GAP: f32 = 24.0;
const CARD_MARGIN: f32 = 32.0;
const CARD_Z: f32 = 5.0;

#[derive(Component, Debug, Clone)]
pub struct SkillCard {
    pub index: usize,
    pub size: Vec2,
}

/// Tilt and scale for a hovered card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    /// Degrees about the card's horizontal axis.
    pub rotate_x: f32,
    /// Degrees about the card's vertical axis.
    pub rotate_y: f32,
    pub scale: f32,
}

impl CardPose {
    pub const REST: CardPose = CardPose {
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
    };

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotate_x.to_radians(),
            self.rotate_y.to_radians(),
            0.0,
        )
    }
}

/// Pose of a card hovered at `local`, measured from the card's top-left
/// corner with y growing downward.
pub fn card_tilt(local: Vec2, size: Vec2, max_deg: f32, hover_scale: f32) -> CardPose {
    let centre = size * 0.5;
    CardPose {
        rotate_x: ((local.y - centre.y) / centre.y) * -max_deg,
        rotate_y: ((local.x - centre.x) / centre.x) * max_deg,
        scale: hover_scale,
    }
}

/// Cursor position relative to a card's top-left corner, or `None` when the
/// cursor is outside the card.
pub fn card_local(cursor_world: Vec2, card_centre: Vec2, size: Vec2) -> Option<Vec2> {
    let local = Vec2::new(
        cursor_world.x - (card_centre.x - size.x * 0.5),
        (card_centre.y + size.y * 0.5) - cursor_world.y,
    );
    let inside = (0.0..=size.x).contains(&local.x) && (0.0..=size.y).contains(&local.y);
    inside.then_some(local)
}

/// Centres for `count` cards in a row along the bottom edge of the field.
pub fn card_positions(bounds: &FieldBounds, count: usize) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let row_width = count as f32 * CARD_SIZE.x + (count - 1) as f32 * CARD_GAP;
    let first_x = -row_width * 0.5 + CARD_SIZE.x * 0.5;
    let y = -bounds.half_extents.y + CARD_MARGIN + CARD_SIZE.y * 0.5;
    (0..count)
        .map(|i| Vec2::new(first_x + i as f32 * (CARD_SIZE.x + CARD_GAP), y))
        .collect()
}

pub struct CardsPlugin;

impl Plugin for CardsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            spawn_skill_cards.in_set(BackdropStartup::Populate),
        )
        .add_systems(Update, (card_layout_system, card_tilt_system).chain());
    }
}

pub fn spawn_skill_cards(
    mut commands: Commands,
    bounds: Res<FieldBounds>,
    config: Res<BackdropConfig>,
) {
    let positions = card_positions(&bounds, SKILL_LABELS.len());
    for (index, (label, at)) in SKILL_LABELS.iter().zip(positions).enumerate() {
        commands
            .spawn((
                SkillCard {
                    index,
                    size: CARD_SIZE,
                },
                Sprite::from_color(Color::srgba(0.04, 0.09, 0.18, 0.65), CARD_SIZE),
                Transform::from_translation(at.extend(CARD_Z)),
            ))
            .with_children(|card| {
                card.spawn((
                    Text2d::new(*label),
                    TextFont {
                        font_size: config.hud_font_size,
                        ..default()
                    },
                    TextColor(Color::srgb(0.0, 0.94, 1.0)),
                    Transform::from_xyz(0.0, 0.0, 0.1),
                ));
            });
    }
}

/// Re-centre the cards after the field changes size.
pub fn card_layout_system(
    bounds: Res<FieldBounds>,
    mut cards: Query<(&SkillCard, &mut Transform)>,
) {
    if !bounds.is_changed() {
        return;
    }
    let positions = card_positions(&bounds, cards.iter().count());
    for (card, mut transform) in cards.iter_mut() {
        if let Some(at) = positions.get(card.index) {
            transform.translation.x = at.x;
            transform.translation.y = at.y;
        }
    }
}

/// Tilt the hovered card toward the cursor; every other card rests flat.
pub fn card_tilt_system(
    config: Res<BackdropConfig>,
    pointer: Res<PointerState>,
    mut cards: Query<(&SkillCard, &mut Transform)>,
) {
    for (card, mut transform) in cards.iter_mut() {
        let centre = transform.translation.truncate();
        let pose = pointer
            .world
            .and_then(|cursor| card_local(cursor, centre, card.size))
            .map(|local| {
                card_tilt(
                    local,
                    card.size,
                    config.card_max_tilt_deg,
                    config.card_hover_scale,
                )
            })
            .unwrap_or(CardPose::REST);
        transform.rotation = pose.rotation();
        transform.scale = Vec3::new(pose.scale, pose.scale, 1.0);
    }
}

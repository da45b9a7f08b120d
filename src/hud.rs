//! On-screen interface: object counter, score, and the parallax panel that
//! carries them.
//!
//! The panel is an absolutely positioned UI node whose `left`/`top` are
//! nudged away from the cursor each frame.  Every HUD system tolerates its
//! nodes being absent.

use crate::body::{Body, BodyClass};
use crate::config::BackdropConfig;
use crate::events::CosmicEvent;
use crate::input::PointerState;
use crate::simulation::SimulationStats;
use bevy::input::ButtonInput;
use bevy::prelude::*;

/// Resting position of the interface panel (px from the window's top-left).
pub const PANEL_ORIGIN: Vec2 = Vec2::new(24.0, 20.0);

/// Parallax-shifted container for all HUD text.
#[derive(Component)]
pub struct InterfacePanel;

/// `OBJECTS: 060`
#[derive(Component)]
pub struct ObjectCounterText;

/// `SCORE: 000000`
#[derive(Component)]
pub struct ScoreText;

/// Accumulated points from cosmic events.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
}

/// Throttle for the object counter.
#[derive(Resource)]
pub struct HudRefresh(pub Timer);

impl Default for HudRefresh {
    fn default() -> Self {
        Self(Timer::from_seconds(
            crate::constants::HUD_REFRESH_SECS,
            TimerMode::Repeating,
        ))
    }
}

/// Points awarded for a single event.
///
/// | Event                        | Points |
/// |------------------------------|--------|
/// | asteroid absorbed            | 1      |
/// | probe or debris absorbed     | 3      |
/// | dying star absorbed          | 10     |
/// | star absorbed                | 50     |
/// | star clash                   | 10     |
/// | star ignited                 | 5      |
/// | probe launched               | 2      |
/// | star collapsing              | 15     |
/// | star extinguished            | 25     |
pub fn event_points(event: &CosmicEvent) -> u32 {
    match event {
        CosmicEvent::Absorbed { prey, .. } => match prey {
            BodyClass::Asteroid => 1,
            BodyClass::Probe | BodyClass::Debris => 3,
            BodyClass::DyingStar => 10,
            BodyClass::Star => 50,
        },
        CosmicEvent::StarClash { .. } => 10,
        CosmicEvent::Ignited { .. } => 5,
        CosmicEvent::ProbeLaunched { .. } => 2,
        CosmicEvent::StarCollapsing { .. } => 15,
        CosmicEvent::StarExtinguished { .. } => 25,
        CosmicEvent::ProbeThrust { .. } | CosmicEvent::ProbeSpent { .. } => 0,
    }
}

pub fn counter_text(count: usize) -> String {
    format!("OBJECTS: {count:03}")
}

pub fn score_text(points: u32) -> String {
    format!("SCORE: {points:06}")
}

/// Offset of the interface panel for a cursor at `cursor` in a window of
/// `window_size`: `(cursor - centre) * factor`.
pub fn parallax_offset(cursor: Vec2, window_size: Vec2, factor: f32) -> Vec2 {
    (cursor - window_size * 0.5) * factor
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>()
            .init_resource::<HudRefresh>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_systems(
                Startup,
                setup_hud.in_set(crate::simulation::BackdropStartup::Layout),
            )
            .add_systems(
                Update,
                (
                    score_tally_system,
                    score_display_system,
                    object_counter_system
                        .after(crate::input::pointer_press_system)
                        .after(crate::simulation::reset_on_resize_system),
                    interface_parallax_system,
                )
                    .chain(),
            );
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Spawn the interface panel with its title, counter, and score lines.
pub fn setup_hud(
    mut commands: Commands,
    config: Res<BackdropConfig>,
    stats: Res<SimulationStats>,
    mut refresh: ResMut<HudRefresh>,
) {
    refresh.0 = Timer::from_seconds(config.hud_refresh_secs.max(0.01), TimerMode::Repeating);
    let font = TextFont {
        font_size: config.hud_font_size,
        ..default()
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(PANEL_ORIGIN.x),
                top: Val::Px(PANEL_ORIGIN.y),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            InterfacePanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("STARDRIFT"),
                TextFont {
                    font_size: config.hud_font_size * 1.6,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 0.94, 1.0)),
            ));
            parent.spawn((
                Text::new(counter_text(stats.live_count)),
                font.clone(),
                TextColor(Color::srgba(0.4, 0.8, 1.0, 0.85)),
                ObjectCounterText,
            ));
            parent.spawn((
                Text::new(score_text(0)),
                font,
                TextColor(Color::srgb(1.0, 0.8, 0.0)),
                ScoreText,
            ));
        });
}

// ── Update ────────────────────────────────────────────────────────────────────

/// Add points for every cosmic event raised since the last frame.
pub fn score_tally_system(mut events: MessageReader<CosmicEvent>, mut score: ResMut<Score>) {
    let gained: u32 = events.read().map(event_points).sum();
    if gained > 0 {
        score.points = score.points.saturating_add(gained);
    }
}

pub fn score_display_system(score: Res<Score>, mut query: Query<&mut Text, With<ScoreText>>) {
    if !score.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        **text = score_text(score.points);
    }
}

/// Refresh the object counter when the throttle timer fires, and straight
/// away after a pointer press or a field reset.
pub fn object_counter_system(
    time: Res<Time>,
    stats: Res<SimulationStats>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut refresh: ResMut<HudRefresh>,
    mut seen_resets: Local<Option<u32>>,
    bodies: Query<(), With<Body>>,
    mut query: Query<&mut Text, With<ObjectCounterText>>,
) {
    let ticked = refresh.0.tick(time.delta()).just_finished();
    let field_changed = *seen_resets != Some(stats.resets);
    let pressed = buttons.just_pressed(MouseButton::Left);
    if !(ticked || field_changed || pressed) {
        return;
    }
    *seen_resets = Some(stats.resets);
    if field_changed || pressed {
        refresh.0.reset();
    }

    let count = bodies.iter().count();
    for mut text in query.iter_mut() {
        **text = counter_text(count);
    }
}

/// Shift the interface panel opposite the cursor.
pub fn interface_parallax_system(
    config: Res<BackdropConfig>,
    pointer: Res<PointerState>,
    mut query: Query<&mut Node, With<InterfacePanel>>,
) {
    let offset = pointer
        .screen
        .map(|cursor| parallax_offset(cursor, pointer.window_size, config.parallax_factor))
        .unwrap_or(Vec2::ZERO);
    for mut node in query.iter_mut() {
        node.left = Val::Px(PANEL_ORIGIN.x + offset.x);
        node.top = Val::Px(PANEL_ORIGIN.y + offset.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_zero_padded() {
        assert_eq!(counter_text(60), "OBJECTS: 060");
        assert_eq!(counter_text(7), "OBJECTS: 007");
        assert_eq!(counter_text(1234), "OBJECTS: 1234");
    }

    #[test]
    fn score_is_zero_padded() {
        assert_eq!(score_text(0), "SCORE: 000000");
        assert_eq!(score_text(1250), "SCORE: 001250");
    }

    #[test]
    fn parallax_is_zero_at_centre() {
        let size = Vec2::new(1200.0, 680.0);
        assert_eq!(parallax_offset(size * 0.5, size, -0.01), Vec2::ZERO);
    }

    #[test]
    fn parallax_moves_against_cursor() {
        let size = Vec2::new(1200.0, 680.0);
        let offset = parallax_offset(Vec2::new(1200.0, 0.0), size, -0.01);
        assert!((offset.x + 6.0).abs() < 1e-5);
        assert!((offset.y - 3.4).abs() < 1e-5);
    }

    #[test]
    fn star_absorption_outscores_asteroid() {
        let at = Vec2::ZERO;
        let tint = Color::WHITE;
        let rock = CosmicEvent::Absorbed {
            at,
            tint,
            prey: BodyClass::Asteroid,
            intensity: 1.0,
        };
        let star = CosmicEvent::Absorbed {
            at,
            tint,
            prey: BodyClass::Star,
            intensity: 3.0,
        };
        assert!(event_points(&star) > event_points(&rock));
        assert_eq!(
            event_points(&CosmicEvent::ProbeThrust {
                at,
                heading: Vec2::X
            }),
            0
        );
    }

    #[test]
    fn every_scoring_category_awards_points() {
        let at = Vec2::ZERO;
        let tint = Color::WHITE;
        let scored = [
            CosmicEvent::Absorbed {
                at,
                tint,
                prey: BodyClass::Asteroid,
                intensity: 1.0,
            },
            CosmicEvent::StarClash {
                at,
                tint,
                other_tint: tint,
            },
            CosmicEvent::ProbeLaunched {
                at,
                velocity: Vec2::X,
            },
            CosmicEvent::StarCollapsing { at, tint },
        ];
        for event in &scored {
            assert!(event_points(event) > 0, "{event:?} should score");
        }
        assert_eq!(event_points(&CosmicEvent::StarCollapsing { at, tint }), 15);
    }
}

//! Pointer input: cursor tracking and press-charge-release star spawning.
//!
//! | System                     | Schedule    | Purpose                                   |
//! |----------------------------|-------------|-------------------------------------------|
//! | `pointer_tracking_system`  | Update      | Mirror the cursor into [`PointerState`]   |
//! | `pointer_press_system`     | Update      | Spawn a protostar under the cursor        |
//! | `pointer_release_system`   | Update      | Ignite the held protostar into a star     |
//! | `charge_protostar_system`  | FixedUpdate | Pin the protostar to the cursor and grow it |
//!
//! Presses are read in `Update` because `just_pressed` is per-frame; growth
//! runs in the fixed tick so charge rate does not depend on frame rate.

use crate::body::{spawn_body, Body};
use crate::config::BackdropConfig;
use crate::events::CosmicEvent;
use crate::palette::StarPalette;
use crate::simulation::{SimRng, SimulationSet};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Latest pointer state, shared by the simulation, HUD, and cards.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointerState {
    /// Cursor in logical window pixels, origin top-left, y down.
    pub screen: Option<Vec2>,
    /// Cursor in world units, origin at the field centre, y up.
    pub world: Option<Vec2>,
    /// Logical window size.
    pub window_size: Vec2,
    /// Protostar currently held under the pointer.
    pub charging: Option<Entity>,
}

/// Convert a top-left-origin window position into world coordinates.
pub fn screen_to_world(cursor: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        cursor.x - window_size.x * 0.5,
        window_size.y * 0.5 - cursor.y,
    )
}

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_systems(
                Update,
                (
                    pointer_tracking_system,
                    pointer_press_system,
                    pointer_release_system,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                charge_protostar_system.in_set(SimulationSet::Input),
            );
    }
}

/// Copy the primary window's cursor into [`PointerState`].
///
/// Without a window the state is left untouched.
pub fn pointer_tracking_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    let screen = window.cursor_position();
    pointer.window_size = size;
    pointer.screen = screen;
    pointer.world = screen.map(|cursor| screen_to_world(cursor, size));
}

/// Left press: drop a protostar with a random palette colour under the cursor.
pub fn pointer_press_system(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerState>,
    palette: Res<StarPalette>,
    config: Res<BackdropConfig>,
    mut rng: ResMut<SimRng>,
) {
    if !buttons.just_pressed(MouseButton::Left) || pointer.charging.is_some() {
        return;
    }
    let Some(at) = pointer.world else {
        return;
    };
    let tint = palette.pick(&mut rng.0);
    let body = Body::protostar(tint, &mut rng.0, &config);
    let entity = spawn_body(&mut commands, at, body);
    pointer.charging = Some(entity);
    debug!("Charging protostar at {at}");
}

/// Left release: the held protostar becomes a star.
pub fn pointer_release_system(
    buttons: Res<ButtonInput<MouseButton>>,
    mut pointer: ResMut<PointerState>,
    config: Res<BackdropConfig>,
    mut rng: ResMut<SimRng>,
    mut bodies: Query<(&Transform, &mut Body)>,
    mut events: MessageWriter<CosmicEvent>,
) {
    if buttons.pressed(MouseButton::Left) {
        return;
    }
    let Some(entity) = pointer.charging.take() else {
        return;
    };
    // The protostar may have been cleared by a field reset.
    let Ok((transform, mut body)) = bodies.get_mut(entity) else {
        return;
    };
    body.ignite(&mut rng.0, &config);
    events.write(CosmicEvent::Ignited {
        at: transform.translation.truncate(),
        tint: body.tint,
        mass: body.mass,
    });
}

/// Keep the held protostar under the cursor and feed it mass.
pub fn charge_protostar_system(
    config: Res<BackdropConfig>,
    pointer: Res<PointerState>,
    mut bodies: Query<(&mut Transform, &mut Body)>,
) {
    let Some(entity) = pointer.charging else {
        return;
    };
    let Ok((mut transform, mut body)) = bodies.get_mut(entity) else {
        return;
    };
    if let Some(world) = pointer.world {
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
    body.charge(&config);
}

use bevy::prelude::*;
use bevy::window::WindowResolution;

use stardrift::cards::CardsPlugin;
use stardrift::config::{self, BackdropConfig};
use stardrift::effects::EffectsPlugin;
use stardrift::graphics;
use stardrift::hud::HudPlugin;
use stardrift::input::PointerPlugin;
use stardrift::rendering::RenderingPlugin;
use stardrift::simulation::{BackdropStartup, SimulationPlugin};
use stardrift::sparks::SparksPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Stardrift".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(2.0 / 255.0, 2.0 / 255.0, 5.0 / 255.0)))
        // Compiled defaults; load_backdrop_config overwrites them from
        // assets/backdrop.toml (if present) before anything else starts.
        .insert_resource(BackdropConfig::default())
        .add_plugins((
            SimulationPlugin,
            PointerPlugin,
            EffectsPlugin,
            SparksPlugin,
            RenderingPlugin,
            HudPlugin,
            CardsPlugin,
        ))
        .add_systems(
            Startup,
            (
                config::load_backdrop_config.in_set(BackdropStartup::Configure),
                graphics::setup_camera.in_set(BackdropStartup::Layout),
            ),
        )
        .run();
}

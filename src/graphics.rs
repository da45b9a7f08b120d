use bevy::prelude::*;

/// Spawn the 2D camera.  The default projection maps one world unit to one
/// logical pixel with the origin at the window centre, which is what
/// [`crate::physics::FieldBounds`] and the pointer mapping assume.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("Camera spawned");
}

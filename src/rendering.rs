//! Rendering systems: body meshes, trails, glow halos, connection lines, and
//! effect overlays.
//!
//! ## Layer Model
//!
//! | Layer              | Technology | z    |
//! |--------------------|------------|------|
//! | Connection lines   | Gizmos     | -    |
//! | Trails             | Gizmos     | -    |
//! | Body fills         | `Mesh2d`   | 0.0  |
//! | Glow halos         | Gizmos     | -    |
//! | Flares             | Gizmos     | -    |
//! | Shockwaves         | Gizmos     | -    |
//! | Sparks             | `Mesh2d`   | 0.9  |
//! | Skill cards        | `Sprite`   | 5.0  |
//!
//! Body fills use two shared unit meshes (disc and triangle) scaled by the
//! body radius; each body owns its material so its tint can change as it
//! moves through the state machine.

use crate::body::{Body, BodyKind, Trail};
use crate::config::BackdropConfig;
use crate::effects::{Flare, Shockwave};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Shared unit-radius meshes for body fills.
#[derive(Resource)]
pub struct BodyMeshes {
    pub disc: Handle<Mesh>,
    pub triangle: Handle<Mesh>,
}

/// Per-body render state attached by [`attach_body_visual_system`].
#[derive(Component)]
pub struct BodyVisual {
    pub material: Handle<ColorMaterial>,
    pub triangular: bool,
}

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_body_meshes).add_systems(
            Update,
            (
                (attach_body_visual_system, sync_body_visual_system).chain(),
                draw_connections_system,
                draw_trails_system,
                draw_glow_system,
                draw_effects_system,
            ),
        );
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let a = a.to_srgba();
    let b = b.to_srgba();
    let t = t.clamp(0.0, 1.0);
    Color::srgba(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}

/// Fill colour for a body in its current state.
pub fn body_color(body: &Body, config: &BackdropConfig) -> Color {
    match body.kind {
        BodyKind::Asteroid | BodyKind::Protostar | BodyKind::Star { .. } => body.tint,
        BodyKind::DyingStar { remaining } => {
            let t = 1.0 - remaining as f32 / config.dying_star_ticks.max(1) as f32;
            lerp_color(body.tint, Color::srgb(0.9, 0.15, 0.05), t)
        }
        BodyKind::Probe { .. } => Color::WHITE,
        BodyKind::Debris { remaining } => {
            let fade = remaining as f32 / config.debris_ticks.max(1) as f32;
            body.tint.with_alpha(0.85 * fade)
        }
    }
}

/// Trail colour: probes white α 0.5, stars their tint α 0.2, the rest cyan α 0.1.
pub fn trail_color(body: &Body) -> Color {
    match body.kind {
        BodyKind::Probe { .. } => Color::srgba(1.0, 1.0, 1.0, 0.5),
        BodyKind::Star { .. } | BodyKind::Protostar | BodyKind::DyingStar { .. } => {
            body.tint.with_alpha(0.2)
        }
        BodyKind::Asteroid | BodyKind::Debris { .. } => {
            Color::srgba(100.0 / 255.0, 200.0 / 255.0, 1.0, 0.1)
        }
    }
}

/// Alpha of the connection line between two asteroids `dist` apart, or
/// `None` when they are too far apart to be linked.
pub fn connection_alpha(dist: f32, config: &BackdropConfig) -> Option<f32> {
    if dist >= config.connection_distance {
        return None;
    }
    Some(config.connection_alpha * (1.0 - dist / config.connection_distance))
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled regular polygon mesh with `sides` rim vertices.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.  The first rim
/// vertex points along +X, so a 3-sided mesh is a triangle pointing right.
pub fn polygon_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides.max(3) as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// ── Body fills ────────────────────────────────────────────────────────────────

fn init_body_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(BodyMeshes {
        disc: meshes.add(polygon_mesh(1.0, 24)),
        triangle: meshes.add(polygon_mesh(1.0, 3)),
    });
}

/// Attach a mesh and a private material to every newly spawned body.
pub fn attach_body_visual_system(
    mut commands: Commands,
    meshes: Res<BodyMeshes>,
    config: Res<BackdropConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    query: Query<(Entity, &Body), Added<Body>>,
) {
    for (entity, body) in query.iter() {
        let triangular = body.kind.is_triangular();
        let mesh = if triangular {
            meshes.triangle.clone()
        } else {
            meshes.disc.clone()
        };
        let material = materials.add(ColorMaterial::from_color(body_color(body, &config)));
        commands.entity(entity).insert((
            Mesh2d(mesh),
            MeshMaterial2d(material.clone()),
            BodyVisual {
                material,
                triangular,
            },
        ));
    }
}

/// Keep fill colour, size, shape, and heading in step with the body state.
pub fn sync_body_visual_system(
    meshes: Res<BodyMeshes>,
    config: Res<BackdropConfig>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(&Body, &mut Transform, &mut BodyVisual, &mut Mesh2d)>,
) {
    for (body, mut transform, mut visual, mut mesh) in query.iter_mut() {
        transform.scale = Vec3::new(body.radius, body.radius, 1.0);

        let triangular = body.kind.is_triangular();
        if triangular != visual.triangular {
            visual.triangular = triangular;
            mesh.0 = if triangular {
                meshes.triangle.clone()
            } else {
                meshes.disc.clone()
            };
        }
        if triangular {
            if let Some(heading) = body.velocity.try_normalize() {
                transform.rotation = Quat::from_rotation_z(heading.to_angle());
            }
        }

        if let Some(mat) = materials.get_mut(&visual.material) {
            mat.color = body_color(body, &config);
        }
    }
}

// ── Gizmo layers ──────────────────────────────────────────────────────────────

/// Draw each body's recent path.
pub fn draw_trails_system(mut gizmos: Gizmos, query: Query<(&Body, &Transform, &Trail)>) {
    for (body, transform, trail) in query.iter() {
        if trail.0.len() < 2 {
            continue;
        }
        let head = transform.translation.truncate();
        gizmos.linestrip_2d(
            trail.0.iter().copied().chain(std::iter::once(head)),
            trail_color(body),
        );
    }
}

/// Halo around stars and probes, standing in for a canvas shadow blur.
pub fn draw_glow_system(
    mut gizmos: Gizmos,
    config: Res<BackdropConfig>,
    time: Res<Time>,
    query: Query<(&Body, &Transform)>,
) {
    const RINGS: usize = 5;
    let pulse = 0.5 + 0.5 * (time.elapsed_secs() * 6.0).sin();

    for (body, transform) in query.iter() {
        let pos = transform.translation.truncate();
        let (reach, strength) = match body.kind {
            BodyKind::Star { .. } => (config.glow_scale, 0.22),
            BodyKind::Protostar => (config.glow_scale * (1.0 + 0.3 * pulse), 0.3),
            BodyKind::DyingStar { .. } => (config.glow_scale * 0.7, 0.15),
            BodyKind::Probe { .. } => (2.5, 0.3),
            _ => continue,
        };
        let color = body_color(body, &config);
        for k in 1..=RINGS {
            let f = k as f32 / RINGS as f32;
            let radius = body.radius * (1.0 + (reach - 1.0) * f);
            gizmos.circle_2d(pos, radius, color.with_alpha(strength * (1.0 - f)));
        }
    }
}

/// Neural-network-style lines between nearby asteroids.
pub fn draw_connections_system(
    mut gizmos: Gizmos,
    config: Res<BackdropConfig>,
    query: Query<(&Body, &Transform)>,
) {
    if !config.show_connections {
        return;
    }
    let nodes: Vec<Vec2> = query
        .iter()
        .filter(|(body, _)| body.kind == BodyKind::Asteroid)
        .map(|(_, transform)| transform.translation.truncate())
        .collect();

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let dist = nodes[i].distance(nodes[j]);
            if let Some(alpha) = connection_alpha(dist, &config) {
                gizmos.line_2d(
                    nodes[i],
                    nodes[j],
                    Color::srgba(100.0 / 255.0, 200.0 / 255.0, 1.0, alpha),
                );
            }
        }
    }
}

/// Shockwave rings and flare glows.
pub fn draw_effects_system(
    mut gizmos: Gizmos,
    waves: Query<(&Transform, &Shockwave)>,
    flares: Query<(&Transform, &Flare)>,
) {
    for (transform, wave) in waves.iter() {
        if wave.life <= 0.0 {
            continue;
        }
        let pos = transform.translation.truncate();
        let color = wave.tint.with_alpha(wave.life);
        // Stronger waves draw a thicker band of concentric rings.
        let bands = (2.0 * wave.intensity).ceil().max(1.0) as usize;
        for b in 0..bands {
            let radius = (wave.radius - b as f32 * 0.5).max(0.5);
            gizmos.circle_2d(pos, radius, color);
        }
    }

    for (transform, flare) in flares.iter() {
        if flare.life <= 0.0 {
            continue;
        }
        let pos = transform.translation.truncate();
        for k in 1..=4 {
            let f = k as f32 / 4.0;
            gizmos.circle_2d(
                pos,
                flare.radius * f,
                flare.tint.with_alpha(flare.life * 0.5 * (1.0 - f * 0.6)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(kind: BodyKind) -> Body {
        Body {
            kind,
            velocity: Vec2::ZERO,
            mass: 80.0,
            radius: 6.0,
            tint: Color::srgb(0.0, 0.94, 1.0),
        }
    }

    #[test]
    fn connection_alpha_falls_off_with_distance() {
        let cfg = BackdropConfig::default();
        let near = connection_alpha(10.0, &cfg).unwrap();
        let far = connection_alpha(100.0, &cfg).unwrap();
        assert!(near > far);
        assert!(connection_alpha(cfg.connection_distance, &cfg).is_none());
        assert!((connection_alpha(0.0, &cfg).unwrap() - cfg.connection_alpha).abs() < 1e-6);
    }

    #[test]
    fn trail_colours_by_kind() {
        let probe = body(BodyKind::Probe { fuel: 1, grace: 0 });
        assert_eq!(trail_color(&probe).alpha(), 0.5);
        let star = body(BodyKind::Star { probe_timer: 0 });
        assert!((trail_color(&star).alpha() - 0.2).abs() < 1e-6);
        let rock = body(BodyKind::Asteroid);
        assert!((trail_color(&rock).alpha() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn dying_star_reddens_over_time() {
        let cfg = BackdropConfig::default();
        let fresh = body(BodyKind::DyingStar {
            remaining: cfg.dying_star_ticks,
        });
        let late = body(BodyKind::DyingStar { remaining: 1 });
        let fresh_red = body_color(&fresh, &cfg).to_srgba().red;
        let late_red = body_color(&late, &cfg).to_srgba().red;
        assert!(late_red > fresh_red);
    }

    #[test]
    fn debris_fades_out() {
        let cfg = BackdropConfig::default();
        let fresh = body(BodyKind::Debris {
            remaining: cfg.debris_ticks,
        });
        let late = body(BodyKind::Debris { remaining: 1 });
        assert!(body_color(&late, &cfg).alpha() < body_color(&fresh, &cfg).alpha());
    }

    #[test]
    fn polygon_mesh_has_fan_indices() {
        let mesh = polygon_mesh(1.0, 3);
        assert_eq!(mesh.count_vertices(), 4);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices.len(), 9);
    }
}

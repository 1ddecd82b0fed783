//! Scene setup - lights and the simulated detected surfaces

use arplace_core::DetectedPlane;
use bevy::prelude::*;

/// A rectangular surface to spawn at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec {
    pub center: Vec3,
    /// Width along X and depth along Z, in meters
    pub size: Vec2,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec2::splat(2.0),
        }
    }
}

/// Surfaces the scene offers for placement
#[derive(Debug, Clone, Default, Resource)]
pub struct SurfaceLayout(pub Vec<SurfaceSpec>);

/// A surface taps can land on. The boundary is in the entity's local X/Z plane.
#[derive(Component, Debug, Clone)]
pub struct SurfacePlane {
    pub boundary: Vec<Vec2>,
}

impl SurfacePlane {
    pub fn rectangle(size: Vec2) -> Self {
        Self {
            boundary: DetectedPlane::rectangle(Vec3::ZERO, Quat::IDENTITY, size).boundary,
        }
    }

    /// The plane in world space for an entity at `transform`
    pub fn world_plane(&self, transform: &GlobalTransform) -> DetectedPlane {
        DetectedPlane {
            center: transform.translation(),
            rotation: transform.rotation(),
            boundary: self.boundary.clone(),
        }
    }
}

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    layout: Res<SurfaceLayout>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PointLight {
            intensity: 200000.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.9),
            ..default()
        },
        Transform::from_xyz(-1.5, 2.5, 1.5),
    ));

    let surface_material = materials.add(Color::srgb(0.35, 0.45, 0.55));
    for (i, surface) in layout.0.iter().enumerate() {
        commands.spawn((
            Name::new(format!("Surface {}", i)),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(surface.size.x, surface.size.y))),
            MeshMaterial3d(surface_material.clone()),
            Transform::from_translation(surface.center),
            SurfacePlane::rectangle(surface.size),
        ));
    }

    tracing::info!(surfaces = layout.0.len(), "Scene ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::{Dir3, Ray3d};

    #[test]
    fn test_world_plane_follows_entity() {
        let surface = SurfacePlane::rectangle(Vec2::new(1.0, 1.0));
        let transform = GlobalTransform::from(Transform::from_xyz(3.0, 0.75, 0.0));
        let plane = surface.world_plane(&transform);

        let ray = Ray3d::new(Vec3::new(3.2, 5.0, 0.1), Dir3::NEG_Y);
        let (_, pose) = plane.intersect(ray).unwrap();
        assert!((pose.position - Vec3::new(3.2, 0.75, 0.1)).length() < 1e-5);

        let outside = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::NEG_Y);
        assert!(plane.intersect(outside).is_none());
    }
}

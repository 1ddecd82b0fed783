//! Viewer camera standing in for the device camera

use bevy::prelude::*;

/// Where the camera looks from and at
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            // Roughly eye height, a couple of steps back from the surface
            eye: Vec3::new(0.0, 1.6, 2.4),
            target: Vec3::ZERO,
        }
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for the viewer camera
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, settings: Res<CameraSettings>) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(settings.eye).looking_at(settings.target, Vec3::Y),
        MainCamera,
    ));
}

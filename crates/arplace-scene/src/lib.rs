//! arplace Scene - Bevy integration for surface placement
//!
//! This crate hosts the engine-free placement controller from
//! `arplace-core` inside a Bevy app:
//! - Simulated detected surfaces and the ray casts against them
//! - Tap and click input, plus an optional identity-pose shortcut
//! - Remote glTF loading through the asset server
//! - egui selection menu and manipulation panel

pub mod camera;
pub mod input;
pub mod models;
pub mod scene;
pub mod types;
pub mod ui;

use arplace_core::{ModelCatalog, PlacementController};
use bevy::prelude::*;

/// Plugin that wires the placement flow into an app.
///
/// Expects `DefaultPlugins` and `EguiPlugin` to be added already.
pub struct ArPlacementPlugin {
    pub catalog: ModelCatalog,
    pub surfaces: Vec<SurfaceSpec>,
    /// Key that starts a placement at the identity pose
    pub debug_shortcut: Option<KeyCode>,
}

impl Plugin for ArPlacementPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Placement(PlacementController::new(self.catalog.clone())))
            .insert_resource(SurfaceLayout(self.surfaces.clone()))
            .insert_resource(DebugShortcut(self.debug_shortcut))
            .init_resource::<Panels>()
            .init_resource::<UiLayout>()
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(input::TapInputPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use camera::{CameraSettings, MainCamera};
pub use models::PlacedModel;
pub use scene::{SurfaceLayout, SurfacePlane, SurfaceSpec};
pub use types::*;

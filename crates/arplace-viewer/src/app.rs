//! Bevy application setup

use arplace_core::ModelCatalog;
use arplace_scene::{ArPlacementPlugin, SurfaceSpec};
use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;

/// Everything the viewer needs to start
pub struct ViewerOptions {
    pub title: String,
    pub catalog: ModelCatalog,
    pub surfaces: Vec<SurfaceSpec>,
    pub debug_shortcut: bool,
}

/// Run the Bevy application
pub fn run(options: ViewerOptions) -> AppExit {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: options.title,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Remote model hosts don't serve .meta files
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be added before EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(ArPlacementPlugin {
            catalog: options.catalog,
            surfaces: options.surfaces,
            debug_shortcut: options.debug_shortcut.then_some(KeyCode::Space),
        })
        .run()
}

//! Shared resources for the placement flow and UI state

use arplace_core::{Panel, PanelPresenter, PanelVisibility, PlacementController};
use bevy::prelude::*;

/// The placement controller; placed models are tracked by their container entity
#[derive(Resource, Deref, DerefMut)]
pub struct Placement(pub PlacementController<Entity>);

/// Which placement panels are currently shown
#[derive(Debug, Clone, Copy, Default, Resource, Deref, DerefMut)]
pub struct Panels(pub PanelVisibility);

impl PanelPresenter for Panels {
    fn set_visible(&mut self, panel: Panel, visible: bool) {
        self.0.set_visible(panel, visible);
    }
}

/// Key bound to the identity-pose placement, if enabled
#[derive(Debug, Clone, Default, Resource)]
pub struct DebugShortcut(pub Option<KeyCode>);

/// UI layout detection and responsive settings
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    pub is_mobile: bool,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            is_mobile: false,
            screen_width: 1280.0,
            screen_height: 720.0,
        }
    }
}

impl UiLayout {
    pub fn update_from_window(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        // Phones in portrait, or any narrow window
        self.is_mobile = width < 800.0 || (height > width * 1.2);
    }

    pub fn menu_width(&self) -> f32 {
        if self.is_mobile {
            self.screen_width * 0.8
        } else {
            260.0
        }
    }

    pub fn ui_scale(&self) -> f32 {
        if self.is_mobile { 1.4 } else { 1.0 }
    }
}

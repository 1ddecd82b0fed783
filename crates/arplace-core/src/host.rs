//! Services the host engine provides to the placement controller

use bevy_math::Vec2;
use thiserror::Error;

use crate::controller::LoadToken;
use crate::pose::PlacementPose;

/// Converts a screen coordinate into a pose on a detected surface
pub trait SurfaceDetector {
    /// First in-bounds hit for the screen point, if any
    fn raycast(&self, screen_point: Vec2) -> Option<PlacementPose>;
}

/// The two UI surfaces the controller toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    SelectionMenu,
    ManipulationPanel,
}

pub trait PanelPresenter {
    fn set_visible(&mut self, panel: Panel, visible: bool);
}

/// Plain visibility flags, for hosts that draw panels in immediate mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelVisibility {
    pub selection_menu: bool,
    pub manipulation_panel: bool,
}

impl PanelVisibility {
    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::SelectionMenu => self.selection_menu,
            Panel::ManipulationPanel => self.manipulation_panel,
        }
    }
}

impl PanelPresenter for PanelVisibility {
    fn set_visible(&mut self, panel: Panel, visible: bool) {
        match panel {
            Panel::SelectionMenu => self.selection_menu = visible,
            Panel::ManipulationPanel => self.manipulation_panel = visible,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("asset contains no scene")]
    NoScene,
    #[error("instantiation failed: {0}")]
    Instantiate(String),
}

/// Fetches remote models and owns their instances in the host scene.
///
/// Fetching is asynchronous: `begin_load` only starts the request, and the
/// host later reports the outcome through
/// [`PlacementController::complete_load`](crate::PlacementController::complete_load)
/// with the same token.
pub trait AssetLoader {
    /// A loaded, not yet instantiated asset
    type Asset;
    /// An instantiated model in the scene
    type Handle;

    fn begin_load(&mut self, token: LoadToken, url: &str);

    /// Drop a pending request; its completion must not be reported
    fn cancel(&mut self, token: LoadToken);

    /// Instantiate under a fresh container placed at `pose`
    fn instantiate(
        &mut self,
        asset: Self::Asset,
        pose: &PlacementPose,
    ) -> Result<Self::Handle, LoadError>;

    /// Remove a placed model and everything under it
    fn destroy(&mut self, handle: Self::Handle);
}

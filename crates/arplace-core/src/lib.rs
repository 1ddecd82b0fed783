//! arplace Core - Placement state machine and supporting types
//!
//! This crate holds everything about placing a model on a surface that does
//! not depend on a game engine:
//! - Placement poses and the manipulable transform of the active model
//! - The model catalog (up to five remote model URLs)
//! - Ray/surface intersection against bounded planar regions
//! - The placement controller and the traits its host must provide

pub mod catalog;
pub mod controller;
pub mod host;
pub mod pose;
pub mod surface;

pub use catalog::{CatalogError, ModelCatalog, ModelEntry, MAX_CATALOG_ENTRIES};
pub use controller::{
    ActiveModel, LoadCompletion, LoadRequest, LoadToken, PlacementController, PlacementError,
    PlacementState, TapOutcome,
};
pub use host::{AssetLoader, LoadError, Panel, PanelPresenter, PanelVisibility, SurfaceDetector};
pub use pose::{Manipulation, ModelTransform, Nudge, PlacementPose};
pub use surface::{closest_hit, DetectedPlane};

//! Placement controller state machine
//!
//! The controller sequences one placement at a time:
//!
//! ```text
//! Idle / Manipulable --tap on surface--> AwaitingSelection
//! AwaitingSelection  --pick model------> Loading
//! Loading            --loaded----------> Manipulable
//! Loading            --failed----------> Idle / Manipulable
//! ```
//!
//! Idle and Manipulable differ only in whether a model is active. Every
//! failure is logged and returns to one of them, so the next tap is always
//! accepted.

use bevy_math::{Vec2, Vec3};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::ModelCatalog;
use crate::host::{AssetLoader, LoadError, Panel, PanelPresenter, SurfaceDetector};
use crate::pose::{Manipulation, ModelTransform, PlacementPose};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("model index {index} is outside the catalog (0..{len})")]
    InvalidSelection { index: usize, len: usize },
    #[error("failed to load {url}: {source}")]
    LoadFailure {
        url: String,
        #[source]
        source: LoadError,
    },
    #[error("no surface has been picked for a model")]
    NotAwaitingSelection,
}

/// Identifies one load request; completions carrying an older token are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A load in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: LoadToken,
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementState {
    /// No model placed, waiting for a surface tap
    Idle,
    /// A surface was hit; the selection menu is open
    AwaitingSelection { pose: PlacementPose },
    /// A model was picked and is being fetched
    Loading {
        pose: PlacementPose,
        request: LoadRequest,
    },
    /// A model is placed and can be manipulated or replaced
    Manipulable,
}

/// The single placed model
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveModel<H> {
    pub handle: H,
    pub transform: ModelTransform,
    pub catalog_index: usize,
}

/// Result of feeding a tap to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// A placement is already pending
    Ignored,
    /// The tap did not land on a surface
    Missed,
    /// The pose was captured and the menu opened
    AwaitingSelection(PlacementPose),
}

/// Result of a load completion that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCompletion {
    Placed,
    /// The completion belongs to a cancelled or superseded request
    Stale,
}

#[derive(Debug)]
pub struct PlacementController<H> {
    catalog: ModelCatalog,
    state: PlacementState,
    active: Option<ActiveModel<H>>,
    next_token: u64,
}

impl<H> PlacementController<H> {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self {
            catalog,
            state: PlacementState::Idle,
            active: None,
            next_token: 0,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn active_model(&self) -> Option<&ActiveModel<H>> {
        self.active.as_ref()
    }

    /// Whether a menu choice or a load is pending
    pub fn is_waiting_for_selection(&self) -> bool {
        matches!(
            self.state,
            PlacementState::AwaitingSelection { .. } | PlacementState::Loading { .. }
        )
    }

    pub fn accepts_taps(&self) -> bool {
        !self.is_waiting_for_selection()
    }

    /// Pose the pending placement will use
    pub fn placement_pose(&self) -> Option<&PlacementPose> {
        match &self.state {
            PlacementState::AwaitingSelection { pose } | PlacementState::Loading { pose, .. } => {
                Some(pose)
            }
            _ => None,
        }
    }

    pub fn pending_load(&self) -> Option<&LoadRequest> {
        match &self.state {
            PlacementState::Loading { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Handle a touch or click at `screen_point`
    pub fn handle_tap<D, P>(
        &mut self,
        screen_point: Vec2,
        detector: &D,
        panels: &mut P,
    ) -> TapOutcome
    where
        D: SurfaceDetector + ?Sized,
        P: PanelPresenter + ?Sized,
    {
        if !self.accepts_taps() {
            debug!(x = screen_point.x, y = screen_point.y, "Tap ignored, placement pending");
            return TapOutcome::Ignored;
        }

        match detector.raycast(screen_point) {
            Some(pose) => self.begin_selection(pose, panels),
            None => {
                debug!(x = screen_point.x, y = screen_point.y, "Tap missed every surface");
                TapOutcome::Missed
            }
        }
    }

    /// Start a placement at the identity pose without a surface hit
    pub fn place_at_debug_pose<P>(&mut self, panels: &mut P) -> TapOutcome
    where
        P: PanelPresenter + ?Sized,
    {
        if !self.accepts_taps() {
            return TapOutcome::Ignored;
        }
        debug!("Using identity pose for placement");
        self.begin_selection(PlacementPose::IDENTITY, panels)
    }

    fn begin_selection<P>(&mut self, pose: PlacementPose, panels: &mut P) -> TapOutcome
    where
        P: PanelPresenter + ?Sized,
    {
        info!(
            x = pose.position.x,
            y = pose.position.y,
            z = pose.position.z,
            "Surface picked, awaiting model selection"
        );
        self.state = PlacementState::AwaitingSelection { pose };
        panels.set_visible(Panel::SelectionMenu, true);
        TapOutcome::AwaitingSelection(pose)
    }

    /// Menu callback: start loading catalog entry `index`
    pub fn select_model<L, P>(
        &mut self,
        index: usize,
        loader: &mut L,
        panels: &mut P,
    ) -> Result<LoadToken, PlacementError>
    where
        L: AssetLoader<Handle = H> + ?Sized,
        P: PanelPresenter + ?Sized,
    {
        let pose = match self.state {
            PlacementState::AwaitingSelection { pose } => pose,
            _ => {
                warn!(index, "Model selected without a pending surface");
                return Err(PlacementError::NotAwaitingSelection);
            }
        };

        panels.set_visible(Panel::SelectionMenu, false);

        let Some(entry) = self.catalog.get(index) else {
            let len = self.catalog.len();
            error!(index, len, "Selected model index is out of range");
            self.state = self.resting_state();
            return Err(PlacementError::InvalidSelection { index, len });
        };

        let token = LoadToken(self.next_token);
        self.next_token += 1;

        let request = LoadRequest {
            token,
            index,
            url: entry.url.clone(),
        };
        info!(index, name = %entry.name, url = %request.url, "Loading model");
        loader.begin_load(token, &request.url);
        self.state = PlacementState::Loading { pose, request };
        Ok(token)
    }

    /// Dismiss the menu or abandon the pending load
    pub fn cancel<L, P>(&mut self, loader: &mut L, panels: &mut P)
    where
        L: AssetLoader<Handle = H> + ?Sized,
        P: PanelPresenter + ?Sized,
    {
        match &self.state {
            PlacementState::AwaitingSelection { .. } => {
                debug!("Model selection dismissed");
                panels.set_visible(Panel::SelectionMenu, false);
            }
            PlacementState::Loading { request, .. } => {
                info!(url = %request.url, "Model load cancelled");
                loader.cancel(request.token);
            }
            PlacementState::Idle | PlacementState::Manipulable => return,
        }
        self.state = self.resting_state();
    }

    /// Report the outcome of the load started for `token`
    pub fn complete_load<L, P>(
        &mut self,
        token: LoadToken,
        result: Result<L::Asset, LoadError>,
        loader: &mut L,
        panels: &mut P,
    ) -> Result<LoadCompletion, PlacementError>
    where
        L: AssetLoader<Handle = H> + ?Sized,
        P: PanelPresenter + ?Sized,
    {
        let (pose, request) = match std::mem::replace(&mut self.state, PlacementState::Idle) {
            PlacementState::Loading { pose, request } if request.token == token => (pose, request),
            other => {
                self.state = other;
                debug!(token = token.id(), "Ignoring stale load completion");
                return Ok(LoadCompletion::Stale);
            }
        };

        match result.and_then(|asset| loader.instantiate(asset, &pose)) {
            Ok(handle) => {
                if let Some(previous) = self.active.take() {
                    loader.destroy(previous.handle);
                }
                self.active = Some(ActiveModel {
                    handle,
                    transform: ModelTransform::at_pose(&pose),
                    catalog_index: request.index,
                });
                self.state = PlacementState::Manipulable;
                panels.set_visible(Panel::ManipulationPanel, true);
                info!(url = %request.url, "Model placed");
                Ok(LoadCompletion::Placed)
            }
            Err(source) => {
                self.state = self.resting_state();
                error!(url = %request.url, error = %source, "Model failed to load");
                Err(PlacementError::LoadFailure {
                    url: request.url,
                    source,
                })
            }
        }
    }

    pub fn move_by(&mut self, delta: Vec3) {
        if let Some(active) = self.active.as_mut() {
            active.transform.translate(delta);
        }
    }

    pub fn rotate_by(&mut self, euler_degrees: Vec3) {
        if let Some(active) = self.active.as_mut() {
            active.transform.rotate_world(euler_degrees);
        }
    }

    pub fn scale_by(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            warn!(factor, "Ignoring invalid scale factor");
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let scaled = active.transform.scale * factor;
        if !scaled.is_finite() || scaled.min_element() <= f32::MIN_POSITIVE {
            warn!(factor, scale = ?active.transform.scale, "Scale limit reached, ignoring");
            return;
        }
        active.transform.scale_uniform(factor);
    }

    pub fn apply(&mut self, manipulation: Manipulation) {
        match manipulation {
            Manipulation::Move(delta) => self.move_by(delta),
            Manipulation::Rotate(euler) => self.rotate_by(euler),
            Manipulation::Scale(factor) => self.scale_by(factor),
        }
    }

    fn resting_state(&self) -> PlacementState {
        if self.active.is_some() {
            PlacementState::Manipulable
        } else {
            PlacementState::Idle
        }
    }
}

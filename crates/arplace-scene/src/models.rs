//! Remote glTF loading and the placed model entity

use arplace_core::{AssetLoader, LoadError, LoadToken, ModelTransform, PlacementPose};
use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::types::{Panels, Placement};

/// Marker component for the container entity of the placed model
#[derive(Component)]
pub struct PlacedModel;

/// A glTF fetch the controller is waiting on
#[derive(Debug)]
pub struct PendingLoad {
    pub url: String,
    pub handle: Handle<Gltf>,
}

/// Loads in flight, keyed by the controller's request token
#[derive(Resource, Default)]
pub struct PendingLoads {
    pub loads: HashMap<LoadToken, PendingLoad>,
}

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoads>()
            .add_systems(Update, poll_model_loads)
            .add_systems(Update, sync_placed_model_transform.after(poll_model_loads));
    }
}

/// Asset loader backed by the asset server and deferred commands
pub struct SceneSpawner<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    asset_server: &'a AssetServer,
    pending: &'a mut PendingLoads,
}

impl<'a, 'w, 's> SceneSpawner<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        asset_server: &'a AssetServer,
        pending: &'a mut PendingLoads,
    ) -> Self {
        Self {
            commands,
            asset_server,
            pending,
        }
    }
}

impl AssetLoader for SceneSpawner<'_, '_, '_> {
    type Asset = Handle<Scene>;
    type Handle = Entity;

    fn begin_load(&mut self, token: LoadToken, url: &str) {
        let handle: Handle<Gltf> = self.asset_server.load(url.to_string());
        self.pending.loads.insert(
            token,
            PendingLoad {
                url: url.to_string(),
                handle,
            },
        );
    }

    fn cancel(&mut self, token: LoadToken) {
        // Dropping the last handle lets the asset server abandon the fetch
        if let Some(load) = self.pending.loads.remove(&token) {
            tracing::debug!(url = %load.url, "Dropped pending model load");
        }
    }

    fn instantiate(
        &mut self,
        scene: Handle<Scene>,
        pose: &PlacementPose,
    ) -> Result<Entity, LoadError> {
        let container = self
            .commands
            .spawn((
                Name::new("Placed model"),
                Transform::from_translation(pose.position).with_rotation(pose.rotation),
                Visibility::default(),
                PlacedModel,
            ))
            .id();
        self.commands
            .spawn((SceneRoot(scene), Transform::default(), ChildOf(container)));
        Ok(container)
    }

    fn destroy(&mut self, entity: Entity) {
        self.commands.entity(entity).despawn();
    }
}

/// Check loading state and hand finished loads to the controller
fn poll_model_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut pending: ResMut<PendingLoads>,
    mut placement: ResMut<Placement>,
    mut panels: ResMut<Panels>,
) {
    let finished: Vec<(LoadToken, Result<Handle<Scene>, LoadError>)> = pending
        .loads
        .iter()
        .filter_map(|(token, load)| {
            let outcome = match asset_server.get_load_state(load.handle.id())? {
                LoadState::Loaded => gltf_assets
                    .get(&load.handle)
                    .ok_or(LoadError::NoScene)
                    .and_then(scene_of),
                LoadState::Failed(err) => Err(LoadError::Fetch(err.to_string())),
                _ => return None,
            };
            Some((*token, outcome))
        })
        .collect();

    for (token, outcome) in finished {
        pending.loads.remove(&token);
        let mut loader = SceneSpawner::new(&mut commands, &asset_server, &mut pending);
        // Failures are logged by the controller and need no further handling here
        let _ = placement.complete_load(token, outcome, &mut loader, &mut *panels);
    }
}

/// Default scene of a glTF, falling back to its first scene
fn scene_of(gltf: &Gltf) -> Result<Handle<Scene>, LoadError> {
    gltf.default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
        .ok_or(LoadError::NoScene)
}

/// Mirror the controller's transform onto the placed entity
fn sync_placed_model_transform(
    placement: Res<Placement>,
    mut models: Query<&mut Transform, With<PlacedModel>>,
) {
    if !placement.is_changed() {
        return;
    }
    let Some(active) = placement.active_model() else {
        return;
    };
    if let Ok(mut transform) = models.get_mut(active.handle) {
        *transform = to_transform(&active.transform);
    }
}

pub fn to_transform(model: &ModelTransform) -> Transform {
    Transform {
        translation: model.translation,
        rotation: model.rotation,
        scale: model.scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arplace_core::{Manipulation, ModelCatalog, Nudge, PlacementController};

    #[test]
    fn test_to_transform_copies_every_component() {
        let model = ModelTransform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.5),
            scale: Vec3::splat(1.5),
        };
        let transform = to_transform(&model);
        assert_eq!(transform.translation, model.translation);
        assert_eq!(transform.rotation, model.rotation);
        assert_eq!(transform.scale, model.scale);
    }

    #[test]
    fn test_manipulation_reaches_placed_entity() {
        let mut app = App::new();
        app.add_systems(Update, sync_placed_model_transform);

        let entity = app
            .world_mut()
            .spawn((Transform::from_xyz(1.0, 0.0, 2.0), PlacedModel))
            .id();

        let catalog = ModelCatalog::from_urls(["https://example.com/Duck.glb"]).unwrap();
        let mut controller = PlacementController::new(catalog);
        let mut panels = Panels::default();
        let mut loader = FakeLoader(entity);
        controller.place_at_debug_pose(&mut panels);
        let token = controller.select_model(0, &mut loader, &mut panels).unwrap();
        controller
            .complete_load(token, Ok(()), &mut loader, &mut panels)
            .unwrap();
        controller.apply(Manipulation::nudge(Nudge::Up));
        app.insert_resource(Placement(controller));

        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert!((transform.translation - Vec3::new(0.0, 0.05, 0.0)).length() < 1e-5);
    }

    /// Hands out a pre-spawned entity as the placed model
    struct FakeLoader(Entity);

    impl AssetLoader for FakeLoader {
        type Asset = ();
        type Handle = Entity;

        fn begin_load(&mut self, _token: LoadToken, _url: &str) {}

        fn cancel(&mut self, _token: LoadToken) {}

        fn instantiate(&mut self, _asset: (), _pose: &PlacementPose) -> Result<Entity, LoadError> {
            Ok(self.0)
        }

        fn destroy(&mut self, _entity: Entity) {}
    }
}

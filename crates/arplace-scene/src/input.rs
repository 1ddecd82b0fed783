//! Surface taps and the debug placement shortcut

use arplace_core::{closest_hit, DetectedPlane, PlacementPose, SurfaceDetector};
use bevy::math::Ray3d;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::camera::MainCamera;
use crate::scene::SurfacePlane;
use crate::types::{DebugShortcut, Panels, Placement};

pub struct TapInputPlugin;

impl Plugin for TapInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (handle_surface_tap, handle_debug_shortcut));
    }
}

/// Casts screen points against the spawned surfaces. `screen_ray` maps a
/// viewport point to a world ray, normally through the main camera.
struct ScreenRaycaster<F> {
    screen_ray: F,
    planes: Vec<DetectedPlane>,
}

impl<F> ScreenRaycaster<F>
where
    F: Fn(Vec2) -> Option<Ray3d>,
{
    fn new<'a>(
        screen_ray: F,
        surfaces: impl IntoIterator<Item = (&'a SurfacePlane, &'a GlobalTransform)>,
    ) -> Self {
        Self {
            screen_ray,
            planes: surfaces
                .into_iter()
                .map(|(surface, transform)| surface.world_plane(transform))
                .collect(),
        }
    }
}

impl<F> SurfaceDetector for ScreenRaycaster<F>
where
    F: Fn(Vec2) -> Option<Ray3d>,
{
    fn raycast(&self, screen_point: Vec2) -> Option<PlacementPose> {
        let ray = (self.screen_ray)(screen_point)?;
        closest_hit(&self.planes, ray)
    }
}

/// First touch that began this frame, otherwise a left click. Nothing while
/// egui owns the pointer.
fn tap_position(
    egui_wants_pointer: bool,
    touches: &Touches,
    mouse_button: &ButtonInput<MouseButton>,
    window: Option<&Window>,
) -> Option<Vec2> {
    if egui_wants_pointer {
        return None;
    }
    if let Some(touch) = touches.iter_just_pressed().next() {
        return Some(touch.position());
    }
    if mouse_button.just_pressed(MouseButton::Left) {
        return window?.cursor_position();
    }
    None
}

fn handle_surface_tap(
    mut placement: ResMut<Placement>,
    mut panels: ResMut<Panels>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    surfaces: Query<(&SurfacePlane, &GlobalTransform)>,
    mut contexts: EguiContexts,
) {
    // Taps on the menus belong to egui
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);

    let Some(screen_point) = tap_position(
        egui_wants_pointer,
        &touch_input,
        &mouse_button,
        windows.single().ok(),
    ) else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let detector = ScreenRaycaster::new(
        |point: Vec2| camera.viewport_to_world(camera_transform, point).ok(),
        surfaces.iter(),
    );

    placement.handle_tap(screen_point, &detector, &mut *panels);
}

fn handle_debug_shortcut(
    shortcut: Res<DebugShortcut>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut placement: ResMut<Placement>,
    mut panels: ResMut<Panels>,
) {
    let Some(key) = shortcut.0 else {
        return;
    };
    if keyboard.just_pressed(key) {
        placement.place_at_debug_pose(&mut *panels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::touch::{TouchInput, TouchPhase};
    use bevy::input::InputPlugin;

    /// Touches after one frame in which a touch began at `position`
    fn touches_started_at(position: Vec2) -> Touches {
        let mut app = App::new();
        app.add_plugins(InputPlugin);
        app.world_mut().write_message(TouchInput {
            phase: TouchPhase::Started,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id: 0,
        });
        app.update();
        app.world().resource::<Touches>().clone()
    }

    fn left_click() -> ButtonInput<MouseButton> {
        let mut mouse_button = ButtonInput::<MouseButton>::default();
        mouse_button.press(MouseButton::Left);
        mouse_button
    }

    fn window_with_cursor(position: Vec2) -> Window {
        let mut window = Window::default();
        window.set_cursor_position(Some(position));
        window
    }

    #[test]
    fn test_touch_wins_over_click() {
        let touches = touches_started_at(Vec2::new(40.0, 60.0));
        let window = window_with_cursor(Vec2::new(300.0, 200.0));

        let tap = tap_position(false, &touches, &left_click(), Some(&window));
        assert_eq!(tap, Some(Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn test_click_uses_cursor_position() {
        let window = window_with_cursor(Vec2::new(300.0, 200.0));

        let tap = tap_position(false, &Touches::default(), &left_click(), Some(&window));
        assert_eq!(tap, Some(Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn test_click_without_cursor_is_not_a_tap() {
        let touches = Touches::default();
        assert_eq!(tap_position(false, &touches, &left_click(), None), None);
        assert_eq!(
            tap_position(false, &touches, &left_click(), Some(&Window::default())),
            None
        );
    }

    #[test]
    fn test_no_press_is_not_a_tap() {
        let window = window_with_cursor(Vec2::new(300.0, 200.0));
        let mut mouse_button = ButtonInput::<MouseButton>::default();
        mouse_button.press(MouseButton::Right);

        let tap = tap_position(false, &Touches::default(), &mouse_button, Some(&window));
        assert_eq!(tap, None);
    }

    #[test]
    fn test_pointer_over_egui_swallows_taps() {
        let touches = touches_started_at(Vec2::new(40.0, 60.0));
        let window = window_with_cursor(Vec2::new(300.0, 200.0));

        assert_eq!(tap_position(true, &touches, &left_click(), Some(&window)), None);
        assert_eq!(
            tap_position(true, &Touches::default(), &left_click(), Some(&window)),
            None
        );
    }

    #[test]
    fn test_screen_point_hits_nearest_spawned_surface() {
        let mut app = App::new();
        app.add_plugins(TransformPlugin);
        // A tabletop above a wide floor
        app.world_mut().spawn((
            SurfacePlane::rectangle(Vec2::splat(4.0)),
            Transform::from_xyz(0.0, 0.0, 0.0),
        ));
        app.world_mut().spawn((
            SurfacePlane::rectangle(Vec2::splat(1.0)),
            Transform::from_xyz(0.0, 0.75, 0.0),
        ));
        let camera = app
            .world_mut()
            .spawn(Transform::from_xyz(0.0, 3.0, 0.0).looking_at(Vec3::ZERO, Vec3::NEG_Z))
            .id();
        app.update();

        let camera_transform = *app.world().get::<GlobalTransform>(camera).unwrap();
        let mut surfaces = app
            .world_mut()
            .query::<(&SurfacePlane, &GlobalTransform)>();
        // Orthographic stand-in: screen pixels are centimeters across the view
        let screen_ray = |point: Vec2| {
            let offset = Vec3::new(point.x, -point.y, 0.0) * 0.01;
            Some(Ray3d::new(
                camera_transform.transform_point(offset),
                camera_transform.forward(),
            ))
        };
        let detector = ScreenRaycaster::new(screen_ray, surfaces.iter(app.world()));

        let on_table = detector.raycast(Vec2::new(20.0, 10.0)).unwrap();
        assert!((on_table.position - Vec3::new(0.2, 0.75, 0.1)).length() < 1e-4);

        let on_floor = detector.raycast(Vec2::new(150.0, 0.0)).unwrap();
        assert!((on_floor.position - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-4);

        assert!(detector.raycast(Vec2::new(500.0, 0.0)).is_none());
    }
}

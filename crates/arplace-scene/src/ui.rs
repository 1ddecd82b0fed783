//! Selection menu and manipulation panel using bevy_egui

use arplace_core::{Manipulation, Nudge};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::models::{PendingLoads, SceneSpawner};
use crate::types::{Panels, Placement, UiLayout};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_ui_layout)
            // Panels run in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(
                EguiPrimaryContextPass,
                (selection_menu_ui, manipulation_panel_ui).chain(),
            );
    }
}

/// Update UI layout based on window size
fn update_ui_layout(windows: Query<&Window>, mut ui_layout: ResMut<UiLayout>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        if (ui_layout.screen_width - width).abs() > 1.0
            || (ui_layout.screen_height - height).abs() > 1.0
        {
            ui_layout.update_from_window(width, height);
        }
    }
}

/// What the user asked for in the selection menu this frame
enum MenuAction {
    Select(usize),
    Cancel,
}

fn selection_menu_ui(
    mut contexts: EguiContexts,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingLoads>,
    mut placement: ResMut<Placement>,
    mut panels: ResMut<Panels>,
    ui_layout: Res<UiLayout>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let ui_scale = ui_layout.ui_scale();
    let menu_width = ui_layout.menu_width();
    let mut action = None;

    if panels.selection_menu {
        egui::Window::new("Choose a model")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                let catalog = placement.catalog();
                if catalog.is_empty() {
                    ui.label("No models configured");
                }
                for (index, entry) in catalog.entries().iter().enumerate() {
                    let button = egui::Button::new(
                        egui::RichText::new(entry.name.as_str()).size(16.0 * ui_scale),
                    )
                    .min_size(egui::vec2(menu_width, 32.0 * ui_scale));
                    if ui.add(button).on_hover_text(entry.url.as_str()).clicked() {
                        action = Some(MenuAction::Select(index));
                    }
                }
                ui.separator();
                if ui.button("Cancel").clicked() {
                    action = Some(MenuAction::Cancel);
                }
            });
    }

    if let Some(request) = placement.pending_load() {
        let name = placement
            .catalog()
            .get(request.index)
            .map(|entry| entry.name.as_str())
            .unwrap_or(request.url.as_str());
        egui::Window::new("Loading")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Loading {}", name));
                    if ui.small_button("Cancel").clicked() {
                        action = Some(MenuAction::Cancel);
                    }
                });
            });
    }

    let Some(action) = action else { return };
    let mut loader = SceneSpawner::new(&mut commands, &asset_server, &mut pending);
    match action {
        MenuAction::Select(index) => {
            // Rejected picks are logged by the controller
            let _ = placement.select_model(index, &mut loader, &mut *panels);
        }
        MenuAction::Cancel => placement.cancel(&mut loader, &mut *panels),
    }
}

fn manipulation_panel_ui(
    mut contexts: EguiContexts,
    mut placement: ResMut<Placement>,
    panels: Res<Panels>,
    ui_layout: Res<UiLayout>,
) {
    if !panels.manipulation_panel {
        return;
    }
    let Some(active) = placement.active_model() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let ui_scale = ui_layout.ui_scale();
    let position = active.transform.translation;
    let scale = active.transform.scale.x;
    let mut requested = None;

    egui::Window::new("Adjust model")
        .collapsible(true)
        .resizable(false)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            let button = |text: &str| {
                egui::Button::new(egui::RichText::new(text).size(14.0 * ui_scale))
                    .min_size(egui::vec2(72.0 * ui_scale, 28.0 * ui_scale))
            };

            ui.label("Move");
            for pair in Nudge::ALL.chunks(2) {
                ui.horizontal(|ui| {
                    for nudge in pair {
                        if ui.add(button(nudge.label())).clicked() {
                            requested = Some(Manipulation::nudge(*nudge));
                        }
                    }
                });
            }

            ui.separator();
            ui.label("Rotate");
            ui.horizontal(|ui| {
                if ui.add(button("⟲ Left")).clicked() {
                    requested = Some(Manipulation::rotate_left());
                }
                if ui.add(button("Right ⟳")).clicked() {
                    requested = Some(Manipulation::rotate_right());
                }
            });

            ui.separator();
            ui.label("Scale");
            ui.horizontal(|ui| {
                if ui.add(button("−")).clicked() {
                    requested = Some(Manipulation::shrink());
                }
                if ui.add(button("+")).clicked() {
                    requested = Some(Manipulation::grow());
                }
            });

            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "Position: [{:.2}, {:.2}, {:.2}]  Scale: {:.2}",
                    position.x, position.y, position.z, scale
                ))
                .small()
                .color(egui::Color32::GRAY),
            );
        });

    if let Some(manipulation) = requested {
        placement.apply(manipulation);
    }
}

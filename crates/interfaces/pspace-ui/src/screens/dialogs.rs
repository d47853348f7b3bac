use crate::theme::*;
use crate::utils::{cmd_button, ButtonKind};
use eframe::egui;
use pspace_app_core::SpaceSettingsVm;
use pspace_core::SpaceId;

pub enum Confirm {
    Pending,
    Accepted,
    Cancelled,
}

fn modal<'open>(title: &str) -> egui::Window<'open> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
}

pub fn confirm_delete(ctx: &egui::Context, id: SpaceId, name: &str) -> Confirm {
    let mut outcome = Confirm::Pending;
    modal("Remove space").show(ctx, |ui| {
        ui.label(
            egui::RichText::new(format!("Remove \"{name}\" (user {id})?")).color(COL_TEXT),
        );
        ui.label(
            egui::RichText::new("All apps and data inside the space are deleted from the device.")
                .size(10.0)
                .color(COL_WARN),
        );
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if cmd_button(ui, "REMOVE", ButtonKind::Danger, true).clicked() {
                outcome = Confirm::Accepted;
            }
            if cmd_button(ui, "CANCEL", ButtonKind::Outline, true).clicked() {
                outcome = Confirm::Cancelled;
            }
        });
    });
    outcome
}

/// Returns false once the window should close.
pub fn space_info(ctx: &egui::Context, vm: &SpaceSettingsVm) -> bool {
    let mut open = true;
    let mut close_clicked = false;
    modal("Space details").open(&mut open).show(ctx, |ui| {
        egui::Grid::new("space-info")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("NAME").size(10.0).color(COL_TEXT_DIM));
                ui.label(egui::RichText::new(&vm.name).color(COL_TEXT));
                ui.end_row();

                ui.label(egui::RichText::new("USER ID").size(10.0).color(COL_TEXT_DIM));
                ui.label(egui::RichText::new(vm.id.to_string()).monospace());
                ui.end_row();

                ui.label(egui::RichText::new("APPS").size(10.0).color(COL_TEXT_DIM));
                let apps = vm
                    .duplicated_apps
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "not loaded".into());
                ui.label(egui::RichText::new(apps).monospace());
                ui.end_row();
            });
        ui.add_space(8.0);
        close_clicked = cmd_button(ui, "CLOSE", ButtonKind::Outline, true).clicked();
    });
    open && !close_clicked
}

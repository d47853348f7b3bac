use crate::theme::*;
use crate::utils::{cmd_button, section_label, ButtonKind};
use eframe::egui;
use egui_taffy::bg::simple::{TuiBackground, TuiBuilderLogicWithBackground};
use egui_taffy::taffy::prelude::{auto, length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};
use pspace_app_core::{AppListVm, AppRowVm};
use pspace_core::SpaceId;

#[derive(Default)]
pub struct SpaceScreenResponse {
    pub toggled: Option<(String, bool)>,
    pub reload_clicked: bool,
    pub info_clicked: bool,
    pub delete_clicked: bool,
}

pub struct SpaceScreenVm<'v> {
    pub id: SpaceId,
    pub title: &'v str,
    pub apps: &'v AppListVm,
    /// Space actions are hidden while a lifecycle operation runs.
    pub show_space_menu: bool,
}

pub fn draw<'a>(tui: impl TuiBuilderLogic<'a>, vm: &SpaceScreenVm<'_>) -> SpaceScreenResponse {
    let mut resp = SpaceScreenResponse::default();

    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Column,
        size: percent(1.),
        min_size: taffy::Size {
            width: length(0.0),
            height: length(0.0),
        },
        gap: length(8.0),
        ..Default::default()
    })
    .add(|tui| {
        tui.style(taffy::Style {
            flex_direction: taffy::FlexDirection::Row,
            justify_content: Some(taffy::JustifyContent::SpaceBetween),
            align_items: Some(taffy::AlignItems::Center),
            size: taffy::Size {
                width: percent(1.),
                height: auto(),
            },
            flex_shrink: 0.0,
            ..Default::default()
        })
        .add(|tui| {
            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Column,
                gap: length(2.0),
                ..Default::default()
            })
            .add(|tui| {
                tui.label(
                    egui::RichText::new(vm.title)
                        .size(15.0)
                        .strong()
                        .color(COL_TEXT),
                );
                tui.label(
                    egui::RichText::new(format!("USER {}", vm.id))
                        .size(10.0)
                        .monospace()
                        .color(COL_TEXT_DIM),
                );
            });

            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Row,
                gap: length(6.0),
                ..Default::default()
            })
            .add(|tui| {
                let can_reload = match vm.apps {
                    AppListVm::Loading => false,
                    AppListVm::Loaded { rows, .. } => !rows.iter().any(|r| r.pending),
                    AppListVm::NotLoaded | AppListVm::Failed(_) => true,
                };
                resp.reload_clicked = tui
                    .ui(|ui| cmd_button(ui, "RELOAD APPS", ButtonKind::Outline, can_reload))
                    .clicked();
                if vm.show_space_menu {
                    resp.info_clicked = tui
                        .ui(|ui| cmd_button(ui, "INFO", ButtonKind::Outline, true))
                        .clicked();
                    resp.delete_clicked = tui
                        .ui(|ui| cmd_button(ui, "DELETE", ButtonKind::Danger, true))
                        .clicked();
                }
            });
        });

        tui.separator();

        tui.style(taffy::Style {
            flex_direction: taffy::FlexDirection::Column,
            flex_grow: 1.0,
            flex_basis: length(0.0),
            min_size: taffy::Size {
                width: percent(1.),
                height: length(0.0),
            },
            padding: length(8.0),
            gap: length(4.0),
            ..Default::default()
        })
        .bg_add(
            TuiBackground::new()
                .with_background_color(COL_BG_DARK)
                .with_border_color(COL_BORDER)
                .with_border_width(1.0),
            |tui| match vm.apps {
                AppListVm::NotLoaded | AppListVm::Loading => {
                    tui.style(taffy::Style {
                        flex_direction: taffy::FlexDirection::Row,
                        align_items: Some(taffy::AlignItems::Center),
                        gap: length(6.0),
                        ..Default::default()
                    })
                    .add(|tui| {
                        tui.ui_add(egui::Spinner::new());
                        tui.colored_label(COL_TEXT_DIM, "Reading installed apps...");
                    });
                }
                AppListVm::Failed(message) => {
                    tui.colored_label(COL_DANGER, format!("Could not read apps: {message}"));
                }
                AppListVm::Loaded {
                    rows,
                    enabled_count,
                } => {
                    tui.ui(|ui| {
                        section_label(
                            ui,
                            &format!("APPS ({enabled_count} OF {} ENABLED)", rows.len()),
                        )
                    });
                    if rows.is_empty() {
                        tui.colored_label(COL_TEXT_DIM, "No user apps installed on the device.");
                    } else {
                        resp.toggled = tui.ui(|ui| app_rows(ui, rows));
                    }
                }
            },
        );
    });

    resp
}

fn app_rows(ui: &mut egui::Ui, rows: &[AppRowVm]) -> Option<(String, bool)> {
    let mut toggled = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height(ui.available_height())
        .show(ui, |ui| {
            for row in rows {
                ui.horizontal(|ui| {
                    let mut enabled = row.enabled;
                    let text = egui::RichText::new(&row.label).color(COL_TEXT);
                    let changed = ui
                        .add_enabled(!row.pending, egui::Checkbox::new(&mut enabled, text))
                        .changed();
                    if changed {
                        toggled = Some((row.package_name.clone(), enabled));
                    }
                    if row.pending {
                        ui.add(egui::Spinner::new().size(10.0));
                    }
                    if row.label != row.package_name {
                        ui.label(
                            egui::RichText::new(&row.package_name)
                                .size(10.0)
                                .monospace()
                                .color(COL_TEXT_DIM),
                        );
                    }
                });
            }
        });
    toggled
}

use crate::components::forms;
use crate::theme::*;
use crate::utils::{cmd_button, ButtonKind};
use eframe::egui;
use egui_taffy::taffy::prelude::{length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};
use pspace_app_core::SpacePagesVm;

/// Returns true when the create button was pressed.
pub fn draw<'a>(tui: impl TuiBuilderLogic<'a>, vm: &SpacePagesVm, name: &mut String) -> bool {
    let mut create = false;

    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Column,
        size: percent(1.),
        max_size: taffy::Size {
            width: length(420.0),
            height: percent(1.),
        },
        gap: length(10.0),
        ..Default::default()
    })
    .add(|tui| {
        tui.label(
            egui::RichText::new("NEW SPACE")
                .size(15.0)
                .strong()
                .color(COL_TEXT),
        );

        if !vm.can_create {
            tui.colored_label(
                COL_WARN,
                format!(
                    "This device allows {} space(s) and all are in use. Remove one first.",
                    vm.space_limit
                ),
            );
            return;
        }

        tui.colored_label(
            COL_TEXT_DIM,
            format!("{} of {} spaces in use.", vm.space_count, vm.space_limit),
        );
        forms::text_field(&mut *tui, "NAME", name, "Space name");

        let valid = !name.trim().is_empty();
        create = tui
            .ui(|ui| cmd_button(ui, "CREATE", ButtonKind::Primary, valid))
            .clicked();
    });

    create
}

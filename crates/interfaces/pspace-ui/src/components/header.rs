use crate::theme::*;
use crate::utils::{cmd_button, ButtonKind};
use eframe::egui;
use egui_taffy::bg::simple::{TuiBackground, TuiBuilderLogicWithBackground};
use egui_taffy::taffy::prelude::{length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};

#[derive(Default)]
pub struct HeaderResponse {
    pub refresh_clicked: bool,
    pub settings_clicked: bool,
}

pub struct HeaderVm<'v> {
    pub device: &'v str,
    pub busy_status: Option<&'v str>,
    pub settings_open: bool,
}

pub fn draw<'a>(tui: impl TuiBuilderLogic<'a>, vm: &HeaderVm<'_>) -> HeaderResponse {
    let mut resp = HeaderResponse::default();

    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Row,
        justify_content: Some(taffy::JustifyContent::SpaceBetween),
        align_items: Some(taffy::AlignItems::Center),
        padding: length(6.0),
        size: taffy::Size {
            width: percent(1.),
            height: percent(1.),
        },
        ..Default::default()
    })
    .bg_add(
        TuiBackground::new()
            .with_background_color(COL_BG)
            .with_border_color(COL_BORDER)
            .with_border_width(1.0),
        |tui| {
            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Row,
                align_items: Some(taffy::AlignItems::Center),
                gap: length(8.0),
                ..Default::default()
            })
            .add(|tui| {
                tui.label(
                    egui::RichText::new("PARALLEL // SPACES")
                        .family(egui::FontFamily::Monospace)
                        .size(12.0)
                        .extra_letter_spacing(2.0)
                        .strong()
                        .color(COL_TEXT),
                );
                tui.label(
                    egui::RichText::new(format!("DEVICE: {}", vm.device))
                        .family(egui::FontFamily::Monospace)
                        .size(10.0)
                        .color(COL_TEXT_DIM),
                );
            });

            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Row,
                align_items: Some(taffy::AlignItems::Center),
                gap: length(6.0),
                ..Default::default()
            })
            .add(|tui| {
                match vm.busy_status {
                    Some(status) => {
                        tui.ui_add(egui::Spinner::new());
                        tui.label(egui::RichText::new(status).color(COL_WARN).size(10.0));
                    }
                    None => {
                        tui.label(
                            egui::RichText::new("STATUS: IDLE")
                                .color(COL_SUCCESS)
                                .size(10.0),
                        );
                    }
                }

                let idle = vm.busy_status.is_none();
                resp.refresh_clicked = tui
                    .ui(|ui| cmd_button(ui, "REFRESH", ButtonKind::Outline, idle && !vm.settings_open))
                    .clicked();
                let label = if vm.settings_open { "SPACES" } else { "SETTINGS" };
                resp.settings_clicked = tui
                    .ui(|ui| cmd_button(ui, label, ButtonKind::Outline, true))
                    .clicked();
            });
        },
    );

    resp
}

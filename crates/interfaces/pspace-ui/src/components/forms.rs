use crate::utils::section_label;
use eframe::egui;
use egui_taffy::taffy::prelude::{auto, length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};

fn field<'a, R>(
    tui: impl TuiBuilderLogic<'a>,
    label: &str,
    content: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Column,
        gap: length(2.0),
        size: taffy::Size {
            width: percent(1.),
            height: auto(),
        },
        ..Default::default()
    })
    .add(|tui| {
        tui.ui(|ui| section_label(ui, label));
        tui.ui(content)
    })
}

pub fn text_field<'a>(
    tui: impl TuiBuilderLogic<'a>,
    label: &str,
    value: &mut String,
    hint: &str,
) -> bool {
    field(tui, label, |ui| {
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(f32::INFINITY)
                .font(egui::FontId::monospace(12.0)),
        )
        .changed()
    })
}

pub fn millis_field<'a>(tui: impl TuiBuilderLogic<'a>, label: &str, value: &mut u64) {
    field(tui, label, |ui| {
        ui.add(
            egui::DragValue::new(value)
                .range(0..=pspace_config::MAX_SETTLE_MS)
                .speed(50.0)
                .suffix(" ms"),
        );
    });
}

pub fn seconds_field<'a>(tui: impl TuiBuilderLogic<'a>, label: &str, value: &mut u64, hint: &str) {
    field(tui, label, |ui| {
        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(value).range(0..=3600).suffix(" s"));
            ui.label(egui::RichText::new(hint).size(10.0).weak());
        });
    });
}

use crate::theme::*;
use crate::utils::section_label;
use eframe::egui;
use egui_taffy::bg::simple::{TuiBackground, TuiBuilderLogicWithBackground};
use egui_taffy::taffy::prelude::{auto, length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};
use pspace_app_core::{PageVm, SpacePagesVm};

/// Draws the page strip: one entry per space plus the trailing "new space" page.
/// Returns the index of a clicked page.
pub fn draw<'a>(tui: impl TuiBuilderLogic<'a>, vm: &SpacePagesVm) -> Option<usize> {
    let mut clicked = None;

    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Column,
        size: percent(1.),
        min_size: taffy::Size {
            width: percent(1.),
            height: length(0.0),
        },
        justify_content: Some(taffy::JustifyContent::SpaceBetween),
        align_items: Some(taffy::AlignItems::Stretch),
        padding: length(8.0),
        gap: length(8.0),
        ..Default::default()
    })
    .bg_add(
        TuiBackground::new()
            .with_background_color(COL_BG)
            .with_border_color(COL_BORDER)
            .with_border_width(1.0),
        |tui| {
            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Column,
                flex_grow: 1.0,
                flex_basis: length(0.0),
                min_size: taffy::Size {
                    width: percent(1.),
                    height: length(0.0),
                },
                overflow: taffy::Point {
                    x: taffy::Overflow::Hidden,
                    y: taffy::Overflow::Scroll,
                },
                gap: length(4.0),
                ..Default::default()
            })
            .add(|tui| {
                tui.ui(|ui| section_label(ui, "SPACES"));

                for (index, page) in vm.pages.iter().enumerate() {
                    let is_selected = index == vm.selected;
                    let (title, color) = match page {
                        PageVm::Space { title, .. } => (title.as_str(), COL_TEXT),
                        PageVm::NewSpace { .. } => ("+ NEW SPACE", COL_ACCENT),
                    };

                    let response = tui
                        .id(egui_taffy::tid(("page", index)))
                        .style(taffy::Style {
                            flex_direction: taffy::FlexDirection::Row,
                            align_items: Some(taffy::AlignItems::Center),
                            size: taffy::Size {
                                width: percent(1.),
                                height: length(30.0),
                            },
                            padding: length(4.0),
                            gap: length(8.0),
                            ..Default::default()
                        })
                        .bg_clickable(
                            TuiBackground::new()
                                .with_background_color(if is_selected {
                                    COL_ACCENT.linear_multiply(0.1)
                                } else {
                                    COL_BG
                                })
                                .with_border_color(if is_selected {
                                    COL_ACCENT
                                } else {
                                    COL_BORDER
                                })
                                .with_border_width(1.0),
                            |tui| {
                                if is_selected {
                                    tui.style(taffy::Style {
                                        size: taffy::Size {
                                            width: length(2.0),
                                            height: percent(1.),
                                        },
                                        flex_shrink: 0.0,
                                        ..Default::default()
                                    })
                                    .bg_add(
                                        TuiBackground::new().with_background_color(COL_ACCENT),
                                        |_| {},
                                    );
                                }
                                tui.label(
                                    egui::RichText::new(title)
                                        .size(12.0)
                                        .color(color)
                                        .monospace(),
                                );
                            },
                        );

                    if response.clicked() && !is_selected {
                        clicked = Some(index);
                    }
                }
            });

            tui.style(taffy::Style {
                flex_direction: taffy::FlexDirection::Column,
                gap: length(2.0),
                flex_shrink: 0.0,
                padding: length(4.0),
                size: taffy::Size {
                    width: percent(1.),
                    height: auto(),
                },
                ..Default::default()
            })
            .bg_add(
                TuiBackground::new()
                    .with_background_color(COL_BG_DARK)
                    .with_border_color(COL_BORDER)
                    .with_border_width(1.0),
                |tui| {
                    let usage = format!("{} / {} USED", vm.space_count, vm.space_limit);
                    tui.label(
                        egui::RichText::new(usage)
                            .size(10.0)
                            .monospace()
                            .color(if vm.can_create { COL_TEXT_DIM } else { COL_WARN }),
                    );
                    tui.label(
                        egui::RichText::new(format!("SYNCED {}", vm.refreshed_at))
                            .size(9.0)
                            .monospace()
                            .color(COL_TEXT_DIM),
                    );
                },
            );
        },
    );

    clicked
}

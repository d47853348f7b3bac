use crate::components::forms;
use crate::devices::ScanState;
use crate::theme::*;
use crate::utils::{cmd_button, section_label, ButtonKind};
use eframe::egui;
use egui_taffy::taffy::prelude::{auto, length, percent};
use egui_taffy::{taffy, TuiBuilderLogic};
use pspace_app_core::AppSettings;

#[derive(Default)]
pub struct SettingsResponse {
    pub save_clicked: bool,
    pub reset_clicked: bool,
    pub scan_clicked: bool,
}

/// Settings editor bound to an unsaved draft. `text` holds the string form
/// of fields whose draft value only changes once the text is valid.
pub struct SettingsText {
    pub serial: String,
    pub space_limit: String,
}

impl SettingsText {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            serial: settings.device_serial.clone().unwrap_or_default(),
            space_limit: settings
                .space_limit
                .map(|l| l.to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn draw<'a>(
    tui: impl TuiBuilderLogic<'a>,
    draft: &mut AppSettings,
    text: &mut SettingsText,
    scan: &ScanState,
    dirty: bool,
) -> SettingsResponse {
    let mut resp = SettingsResponse::default();

    tui.style(taffy::Style {
        flex_direction: taffy::FlexDirection::Column,
        size: percent(1.),
        max_size: taffy::Size {
            width: length(520.0),
            height: percent(1.),
        },
        overflow: taffy::Point {
            x: taffy::Overflow::Hidden,
            y: taffy::Overflow::Scroll,
        },
        gap: length(10.0),
        ..Default::default()
    })
    .add(|tui| {
        tui.label(
            egui::RichText::new("SETTINGS")
                .size(15.0)
                .strong()
                .color(COL_TEXT),
        );

        tui.ui(|ui| section_label(ui, "DEVICE"));
        forms::text_field(&mut *tui, "ADB EXECUTABLE", &mut draft.adb_path, "adb");

        tui.style(taffy::Style {
            flex_direction: taffy::FlexDirection::Row,
            align_items: Some(taffy::AlignItems::End),
            gap: length(6.0),
            size: taffy::Size {
                width: percent(1.),
                height: auto(),
            },
            ..Default::default()
        })
        .add(|tui| {
            tui.style(taffy::Style {
                flex_grow: 1.0,
                ..Default::default()
            })
            .add(|tui| {
                forms::text_field(
                    &mut *tui,
                    "DEVICE SERIAL",
                    &mut text.serial,
                    "Only device attached",
                );
            });
            resp.scan_clicked = tui
                .ui(|ui| {
                    cmd_button(
                        ui,
                        "SCAN",
                        ButtonKind::Outline,
                        *scan != ScanState::Scanning,
                    )
                })
                .clicked();
        });

        match scan {
            ScanState::Idle => {}
            ScanState::Scanning => {
                tui.colored_label(COL_TEXT_DIM, "Looking for devices...");
            }
            ScanState::Failed(message) => {
                tui.colored_label(COL_DANGER, message.as_str());
            }
            ScanState::Found(devices) if devices.is_empty() => {
                tui.colored_label(COL_WARN, "No devices attached.");
            }
            ScanState::Found(devices) => {
                tui.ui(|ui| {
                    ui.horizontal_wrapped(|ui| {
                        for serial in devices {
                            let selected = text.serial == *serial;
                            if ui.selectable_label(selected, serial).clicked() {
                                text.serial = serial.clone();
                            }
                        }
                    });
                });
            }
        }
        draft.device_serial = Some(text.serial.trim().to_string()).filter(|s| !s.is_empty());

        forms::text_field(
            &mut *tui,
            "EXTRA CREATE-USER ARGUMENTS",
            &mut draft.create_user_args,
            "e.g. --user-type android.os.usertype.full.SECONDARY",
        );
        if shlex::split(&draft.create_user_args).is_none() {
            tui.colored_label(COL_DANGER, "Unbalanced quotes in arguments.");
        }

        tui.separator();
        tui.ui(|ui| section_label(ui, "SPACES"));
        forms::text_field(
            &mut *tui,
            "DEFAULT SPACE NAME",
            &mut draft.default_space_name,
            pspace_config::DEFAULT_SPACE_NAME,
        );
        forms::text_field(
            &mut *tui,
            "SPACE LIMIT OVERRIDE",
            &mut text.space_limit,
            "Use the device limit",
        );
        match text.space_limit.trim() {
            "" => draft.space_limit = None,
            value => match value.parse::<usize>() {
                Ok(limit) => draft.space_limit = Some(limit),
                Err(_) => {
                    tui.colored_label(COL_DANGER, "Space limit must be a whole number.");
                }
            },
        }
        forms::seconds_field(
            &mut *tui,
            "CHECK FOR EXTERNAL CHANGES",
            &mut draft.poll_interval_secs,
            "0 disables",
        );

        tui.separator();
        tui.ui(|ui| section_label(ui, "SETTLE DELAYS"));
        forms::millis_field(
            &mut *tui,
            "AFTER CREATE",
            &mut draft.timings.create_settle_ms,
        );
        forms::millis_field(
            &mut *tui,
            "BEFORE DELETE",
            &mut draft.timings.delete_pre_delay_ms,
        );
        forms::millis_field(
            &mut *tui,
            "AFTER DELETE",
            &mut draft.timings.delete_settle_ms,
        );

        tui.separator();
        let valid = !draft.default_space_name.trim().is_empty()
            && !draft.adb_path.trim().is_empty()
            && shlex::split(&draft.create_user_args).is_some();
        tui.style(taffy::Style {
            flex_direction: taffy::FlexDirection::Row,
            gap: length(6.0),
            ..Default::default()
        })
        .add(|tui| {
            resp.save_clicked = tui
                .ui(|ui| cmd_button(ui, "SAVE", ButtonKind::Primary, dirty && valid))
                .clicked();
            resp.reset_clicked = tui
                .ui(|ui| cmd_button(ui, "DISCARD", ButtonKind::Outline, dirty))
                .clicked();
        });
    });

    resp
}

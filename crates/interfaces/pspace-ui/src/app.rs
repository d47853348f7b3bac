use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use crate::components::{header, sidebar};
use crate::devices::{DeviceScanner, ScanState};
use crate::screens::settings::SettingsText;
use crate::screens::{dialogs, new_space, settings, space};
use crate::theme::*;
use crate::utils::{cmd_button, ButtonKind};
use eframe::egui;
use egui_taffy::bg::simple::{TuiBackground, TuiBuilderLogicWithBackground};
use egui_taffy::taffy::prelude::{auto, length, percent};
use egui_taffy::{taffy, tui, TuiBuilderLogic};
use pspace_app_core::{
    viewmodel, AdbSpaceBackend, AppCommand, AppKernel, AppListState, AppSettings, AppState,
    FilePersistence, PageVm, SpacePagerVm,
};
use pspace_core::SpaceId;

const BUSY_REPAINT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Spaces,
    Settings,
}

struct SettingsDraft {
    settings: AppSettings,
    text: SettingsText,
}

impl SettingsDraft {
    fn new(settings: &AppSettings) -> Self {
        Self {
            settings: settings.clone(),
            text: SettingsText::from_settings(settings),
        }
    }
}

pub struct PspaceUiApp {
    kernel: AppKernel<AdbSpaceBackend, FilePersistence>,
    view: View,
    new_space_name: Option<String>,
    confirm_delete: Option<(SpaceId, String)>,
    space_info: Option<SpaceId>,
    settings_draft: Option<SettingsDraft>,
    scanner: DeviceScanner,
    rejection: Option<String>,
    last_poll: Instant,
}

impl PspaceUiApp {
    pub fn new(kernel: AppKernel<AdbSpaceBackend, FilePersistence>) -> Self {
        Self {
            kernel,
            view: View::Spaces,
            new_space_name: None,
            confirm_delete: None,
            space_info: None,
            settings_draft: None,
            scanner: DeviceScanner::new(),
            rejection: None,
            last_poll: Instant::now(),
        }
    }

    fn submit(&mut self, commands: Vec<AppCommand>) {
        for cmd in commands {
            if let Err(e) = self.kernel.dispatch(cmd) {
                tracing::warn!("Command rejected: {e}");
                self.rejection = Some(e.to_string());
            }
        }
    }

    /// Asks for a background re-read of the space list every poll interval,
    /// standing in for the device's user-added/removed broadcasts.
    /// Returns the time until the next check.
    fn poll_external_changes(&mut self, state: &AppState) -> Option<Duration> {
        let secs = state.settings.poll_interval_secs;
        if secs == 0 || state.snapshot.is_none() {
            return None;
        }
        let interval = Duration::from_secs(secs);
        let elapsed = self.last_poll.elapsed();
        if elapsed < interval {
            return Some(interval - elapsed);
        }

        self.last_poll = Instant::now();
        if let Err(e) = self.kernel.dispatch(AppCommand::NotifyExternalChange) {
            tracing::debug!("External change check skipped: {e}");
        }
        Some(interval)
    }
}

fn work_in_flight(state: &AppState, scanner: &DeviceScanner) -> bool {
    state.lifecycle.is_busy()
        || *scanner.state() == ScanState::Scanning
        || state.app_lists.values().any(|list| match list {
            AppListState::Loading => true,
            AppListState::Loaded { pending, .. } => !pending.is_empty(),
            AppListState::Failed(_) => false,
        })
}

impl eframe::App for PspaceUiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.kernel.tick();
        if self.scanner.poll() {
            ctx.request_repaint();
        }

        let state = self.kernel.state();
        let next_poll = self.poll_external_changes(&state);

        ctx.options_mut(|options| {
            options.max_passes = NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN);
        });
        ctx.style_mut(|style| {
            style.wrap_mode = Some(egui::TextWrapMode::Extend);
        });

        let pager = viewmodel::space_pager_vm(&state);
        let busy_status = viewmodel::busy_label(&state.lifecycle);
        let device = state
            .settings
            .device_serial
            .clone()
            .unwrap_or_else(|| "auto".into());
        let error = self.rejection.clone().or_else(|| state.last_error.clone());

        let mut commands = Vec::new();
        let mut scan_with: Option<AppSettings> = None;

        if let SpacePagerVm::Loaded(pages) = &pager {
            match pages.selected_page() {
                Some(PageVm::NewSpace { suggested_name }) => {
                    self.new_space_name
                        .get_or_insert_with(|| suggested_name.clone());
                }
                Some(PageVm::Space { id, .. }) => {
                    self.new_space_name = None;
                    if matches!(
                        viewmodel::app_list_vm(&state, *id),
                        viewmodel::AppListVm::NotLoaded
                    ) {
                        commands.push(AppCommand::LoadAppList {
                            space: *id,
                            force: false,
                        });
                    }
                }
                None => {}
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            tui(ui, ui.id().with("root"))
                .reserve_available_space()
                .style(taffy::Style {
                    flex_direction: taffy::FlexDirection::Column,
                    size: percent(1.),
                    min_size: taffy::Size {
                        width: percent(1.),
                        height: length(0.0),
                    },
                    ..Default::default()
                })
                .show(|tui| {
                    tui.style(taffy::Style {
                        size: taffy::Size {
                            width: percent(1.),
                            height: length(28.0),
                        },
                        flex_shrink: 0.0,
                        ..Default::default()
                    })
                    .add(|tui| {
                        let resp = header::draw(
                            tui,
                            &header::HeaderVm {
                                device: &device,
                                busy_status: busy_status.as_deref(),
                                settings_open: self.view == View::Settings,
                            },
                        );
                        if resp.refresh_clicked {
                            commands.push(AppCommand::Refresh);
                        }
                        if resp.settings_clicked {
                            self.view = match self.view {
                                View::Spaces => View::Settings,
                                View::Settings => View::Spaces,
                            };
                            self.settings_draft = None;
                        }
                    });

                    if let Some(message) = &error {
                        tui.style(taffy::Style {
                            flex_direction: taffy::FlexDirection::Row,
                            justify_content: Some(taffy::JustifyContent::SpaceBetween),
                            align_items: Some(taffy::AlignItems::Center),
                            size: taffy::Size {
                                width: percent(1.),
                                height: auto(),
                            },
                            flex_shrink: 0.0,
                            padding: length(6.0),
                            ..Default::default()
                        })
                        .bg_add(
                            TuiBackground::new()
                                .with_background_color(COL_DANGER.linear_multiply(0.1))
                                .with_border_color(COL_DANGER)
                                .with_border_width(1.0),
                            |tui| {
                                tui.colored_label(COL_DANGER, message.as_str());
                                if tui
                                    .ui(|ui| cmd_button(ui, "DISMISS", ButtonKind::Outline, true))
                                    .clicked()
                                {
                                    if self.rejection.take().is_none() {
                                        commands.push(AppCommand::DismissError);
                                    }
                                }
                            },
                        );
                    }

                    tui.style(taffy::Style {
                        flex_direction: taffy::FlexDirection::Row,
                        size: taffy::Size {
                            width: percent(1.),
                            height: auto(),
                        },
                        flex_grow: 1.0,
                        flex_basis: length(0.0),
                        min_size: taffy::Size {
                            width: percent(1.),
                            height: length(0.0),
                        },
                        overflow: taffy::Point {
                            x: taffy::Overflow::Hidden,
                            y: taffy::Overflow::Hidden,
                        },
                        ..Default::default()
                    })
                    .add(|tui| {
                        if self.view == View::Settings {
                            tui.style(taffy::Style {
                                flex_direction: taffy::FlexDirection::Column,
                                flex_grow: 1.0,
                                size: percent(1.),
                                padding: length(12.0),
                                ..Default::default()
                            })
                            .add(|tui| {
                                let draft = self
                                    .settings_draft
                                    .get_or_insert_with(|| SettingsDraft::new(&state.settings));
                                let dirty = draft.settings != state.settings;
                                let resp = settings::draw(
                                    tui,
                                    &mut draft.settings,
                                    &mut draft.text,
                                    self.scanner.state(),
                                    dirty,
                                );
                                if resp.scan_clicked {
                                    scan_with = Some(draft.settings.clone());
                                }
                                if resp.save_clicked {
                                    let name = draft.settings.default_space_name.trim().to_string();
                                    draft.settings.default_space_name = name;
                                    commands.push(AppCommand::SaveSettings(draft.settings.clone()));
                                }
                                if resp.reset_clicked {
                                    *draft = SettingsDraft::new(&state.settings);
                                }
                            });
                            return;
                        }

                        match &pager {
                            SpacePagerVm::Loading { status } => {
                                tui.style(taffy::Style {
                                    flex_direction: taffy::FlexDirection::Column,
                                    flex_grow: 1.0,
                                    justify_content: Some(taffy::JustifyContent::Center),
                                    align_items: Some(taffy::AlignItems::Center),
                                    gap: length(8.0),
                                    ..Default::default()
                                })
                                .add(|tui| match status {
                                    Some(status) => {
                                        tui.ui_add(egui::Spinner::new().size(24.0));
                                        tui.colored_label(COL_TEXT_DIM, status.as_str());
                                    }
                                    None => {
                                        tui.colored_label(
                                            COL_TEXT_DIM,
                                            "Spaces could not be read from the device.",
                                        );
                                        tui.colored_label(
                                            COL_TEXT_DIM,
                                            "Check the device settings, then press REFRESH.",
                                        );
                                    }
                                });
                            }
                            SpacePagerVm::Loaded(pages) => {
                                tui.style(taffy::Style {
                                    size: taffy::Size {
                                        width: length(200.0),
                                        height: percent(1.),
                                    },
                                    flex_shrink: 0.0,
                                    min_size: taffy::Size {
                                        width: length(200.0),
                                        height: length(0.0),
                                    },
                                    ..Default::default()
                                })
                                .add(|tui| {
                                    if let Some(index) = sidebar::draw(tui, pages) {
                                        commands.push(AppCommand::SelectPage(index));
                                    }
                                });

                                tui.style(taffy::Style {
                                    flex_direction: taffy::FlexDirection::Column,
                                    flex_grow: 1.0,
                                    size: percent(1.),
                                    flex_basis: length(0.0),
                                    min_size: taffy::Size {
                                        width: length(0.0),
                                        height: length(0.0),
                                    },
                                    overflow: taffy::Point {
                                        x: taffy::Overflow::Hidden,
                                        y: taffy::Overflow::Hidden,
                                    },
                                    padding: length(12.0),
                                    gap: length(8.0),
                                    ..Default::default()
                                })
                                .add(|tui| match pages.selected_page() {
                                    Some(PageVm::Space { id, title }) => {
                                        let apps = viewmodel::app_list_vm(&state, *id);
                                        let resp = space::draw(
                                            tui,
                                            &space::SpaceScreenVm {
                                                id: *id,
                                                title,
                                                apps: &apps,
                                                show_space_menu: pages.show_space_menu,
                                            },
                                        );
                                        if let Some((package, enabled)) = resp.toggled {
                                            commands.push(AppCommand::SetPackageEnabled {
                                                space: *id,
                                                package,
                                                enabled,
                                            });
                                        }
                                        if resp.reload_clicked {
                                            commands.push(AppCommand::LoadAppList {
                                                space: *id,
                                                force: true,
                                            });
                                        }
                                        if resp.info_clicked {
                                            self.space_info = Some(*id);
                                        }
                                        if resp.delete_clicked {
                                            self.confirm_delete = Some((*id, title.clone()));
                                        }
                                    }
                                    Some(PageVm::NewSpace { suggested_name }) => {
                                        let name = self
                                            .new_space_name
                                            .get_or_insert_with(|| suggested_name.clone());
                                        if new_space::draw(tui, pages, name) {
                                            commands.push(AppCommand::CreateSpace(name.clone()));
                                            self.new_space_name = None;
                                        }
                                    }
                                    None => {
                                        tui.colored_label(COL_TEXT_DIM, "NO PAGE SELECTED");
                                    }
                                });
                            }
                        }
                    });
                });
        });

        if let Some((id, name)) = self.confirm_delete.clone() {
            match dialogs::confirm_delete(ctx, id, &name) {
                dialogs::Confirm::Accepted => {
                    commands.push(AppCommand::DeleteSpace(id));
                    self.confirm_delete = None;
                }
                dialogs::Confirm::Cancelled => self.confirm_delete = None,
                dialogs::Confirm::Pending => {}
            }
        }
        if let Some(id) = self.space_info {
            let keep_open = viewmodel::space_settings_vm(&state, id)
                .is_some_and(|vm| dialogs::space_info(ctx, &vm));
            if !keep_open {
                self.space_info = None;
            }
        }

        if let Some(settings) = scan_with {
            self.scanner.start(&settings);
        }
        if !commands.is_empty() {
            self.submit(commands);
            ctx.request_repaint();
        }

        if work_in_flight(&self.kernel.state(), &self.scanner) {
            ctx.request_repaint_after(BUSY_REPAINT);
        } else if let Some(delay) = next_poll {
            ctx.request_repaint_after(delay);
        }
    }
}

impl Drop for PspaceUiApp {
    fn drop(&mut self) {
        self.kernel.shutdown();
    }
}

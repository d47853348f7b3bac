use chrono::{DateTime, Local, Utc};
use pspace_core::{IconHandle, SpaceId};

use crate::domain::{AppListState, AppState, LifecyclePhase, LifecycleState, SpaceOperation};

fn format_refreshed_at(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Status line for an in-flight operation, `None` while idle.
pub fn busy_label(lifecycle: &LifecycleState) -> Option<String> {
    let op = lifecycle.operation.as_ref()?;
    let detail = match (lifecycle.phase, op) {
        (LifecyclePhase::Idle, _) => return None,
        (LifecyclePhase::Submitting, SpaceOperation::Create { name }) => {
            format!("Creating \"{name}\"...")
        }
        (LifecyclePhase::Submitting, SpaceOperation::Delete { id }) => {
            format!("Removing space {id}...")
        }
        (LifecyclePhase::Settling, _) => "Waiting for the device to settle...".to_string(),
        (LifecyclePhase::Submitting | LifecyclePhase::Refreshing, _) => {
            format!("{}...", op.label())
        }
    };
    Some(detail)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageVm {
    Space { id: SpaceId, title: String },
    NewSpace { suggested_name: String },
}

#[derive(Debug, Clone)]
pub struct SpacePagesVm {
    pub pages: Vec<PageVm>,
    pub selected: usize,
    /// Delete/settings actions only make sense on a space page.
    pub show_space_menu: bool,
    pub can_create: bool,
    pub space_count: usize,
    pub space_limit: usize,
    pub refreshed_at: String,
}

impl SpacePagesVm {
    pub fn selected_page(&self) -> Option<&PageVm> {
        self.pages.get(self.selected)
    }

    pub fn selected_space(&self) -> Option<SpaceId> {
        match self.selected_page()? {
            PageVm::Space { id, .. } => Some(*id),
            PageVm::NewSpace { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SpacePagerVm {
    /// No snapshot yet, or an operation is rebuilding the list.
    Loading { status: Option<String> },
    Loaded(SpacePagesVm),
}

pub fn suggested_name(state: &AppState) -> String {
    pspace_core::suggested_space_name(&state.settings.default_space_name, state.space_count())
}

pub fn space_pager_vm(state: &AppState) -> SpacePagerVm {
    let snapshot = match &state.snapshot {
        Some(snapshot) if !state.lifecycle.is_busy() => snapshot,
        _ => {
            return SpacePagerVm::Loading {
                status: busy_label(&state.lifecycle),
            }
        }
    };

    let mut pages: Vec<PageVm> = snapshot
        .spaces()
        .iter()
        .map(|s| PageVm::Space {
            id: s.id,
            title: s.name.clone(),
        })
        .collect();
    let can_create = state.can_create_space();
    if can_create {
        pages.push(PageVm::NewSpace {
            suggested_name: suggested_name(state),
        });
    }

    let selected = state.selected_index.min(pages.len().saturating_sub(1));
    let show_space_menu = matches!(pages.get(selected), Some(PageVm::Space { .. }));

    SpacePagerVm::Loaded(SpacePagesVm {
        pages,
        selected,
        show_space_menu,
        can_create,
        space_count: snapshot.len(),
        space_limit: state.space_limit(),
        refreshed_at: format_refreshed_at(snapshot.fetched_at()),
    })
}

#[derive(Debug, Clone)]
pub struct AppRowVm {
    pub package_name: String,
    pub label: String,
    pub icon: Option<IconHandle>,
    pub enabled: bool,
    pub pending: bool,
}

#[derive(Debug, Clone)]
pub enum AppListVm {
    NotLoaded,
    Loading,
    Loaded { rows: Vec<AppRowVm>, enabled_count: usize },
    Failed(String),
}

pub fn app_list_vm(state: &AppState, space: SpaceId) -> AppListVm {
    match state.app_lists.get(&space) {
        None => AppListVm::NotLoaded,
        Some(AppListState::Loading) => AppListVm::Loading,
        Some(AppListState::Failed(message)) => AppListVm::Failed(message.clone()),
        Some(AppListState::Loaded { entries, pending }) => AppListVm::Loaded {
            rows: entries
                .iter()
                .map(|e| AppRowVm {
                    package_name: e.package_name.clone(),
                    label: e.label.clone(),
                    icon: e.icon.clone(),
                    enabled: e.enabled,
                    pending: pending.contains(&e.package_name),
                })
                .collect(),
            enabled_count: entries.iter().filter(|e| e.enabled).count(),
        },
    }
}

#[derive(Debug, Clone)]
pub struct SpaceSettingsVm {
    pub id: SpaceId,
    pub name: String,
    /// `None` until the space's app list has been loaded.
    pub duplicated_apps: Option<usize>,
}

pub fn space_settings_vm(state: &AppState, space: SpaceId) -> Option<SpaceSettingsVm> {
    let found = state.snapshot.as_ref()?.find(space)?;
    let duplicated_apps = match state.app_lists.get(&space) {
        Some(AppListState::Loaded { entries, .. }) => {
            Some(entries.iter().filter(|e| e.enabled).count())
        }
        _ => None,
    };
    Some(SpaceSettingsVm {
        id: found.id,
        name: found.name.clone(),
        duplicated_apps,
    })
}

use pspace_core::{AppEntry, SpaceId, SpaceListSnapshot};

use crate::domain::{AppSettings, LifecyclePhase, OperationId, SpaceOperation};

#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    Started { operation: SpaceOperation },
    PhaseChanged(LifecyclePhase),
    SpaceLimitResolved(usize),
    Refreshed(SpaceListSnapshot),
    Failed { message: String },
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum AppListEvent {
    LoadStarted,
    Loaded(Vec<AppEntry>),
    LoadFailed(String),
    ToggleStarted { package: String },
    Toggled { package: String, enabled: bool },
    ToggleFailed { package: String, message: String },
}

#[derive(Debug, Clone)]
pub enum DomainEvent {
    // Settings
    SettingsLoaded(AppSettings),
    SettingsChanged(AppSettings),

    // Orchestrated operations
    Lifecycle {
        op_id: OperationId,
        ev: LifecycleEvent,
    },
    /// Result of a refresh not tied to any operation, tagged with the
    /// [`AppState::generation`](crate::domain::AppState::generation) it started under.
    ExternalSnapshot {
        generation: u64,
        snapshot: SpaceListSnapshot,
    },

    // Pager
    PageSelected(usize),

    // App lists
    AppList {
        space: SpaceId,
        ev: AppListEvent,
    },

    // User-visible errors
    UserError(String),
    ErrorDismissed,
}

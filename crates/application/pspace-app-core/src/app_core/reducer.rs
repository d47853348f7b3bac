use std::collections::BTreeSet;

use pspace_core::{SpaceId, SpaceListSnapshot};

use crate::domain::{AppListState, AppState, LifecycleState, OperationId, SpaceOperation};

use super::events::{AppListEvent, DomainEvent, LifecycleEvent};

pub fn reduce(mut state: AppState, ev: DomainEvent) -> AppState {
    match ev {
        DomainEvent::SettingsLoaded(settings) | DomainEvent::SettingsChanged(settings) => {
            state.settings = settings;
            state.clamp_selected_index();
        }

        DomainEvent::Lifecycle { op_id, ev } => apply_lifecycle_event(&mut state, op_id, ev),

        DomainEvent::ExternalSnapshot {
            generation,
            snapshot,
        } => {
            if generation == state.generation && !state.lifecycle.is_busy() {
                publish_snapshot(&mut state, snapshot);
            }
        }

        DomainEvent::PageSelected(index) => {
            state.selected_index = index;
            state.clamp_selected_index();
        }

        DomainEvent::AppList { space, ev } => apply_app_list_event(&mut state, space, ev),

        DomainEvent::UserError(msg) => state.last_error = Some(msg),
        DomainEvent::ErrorDismissed => state.last_error = None,
    }
    state
}

fn publish_snapshot(state: &mut AppState, snapshot: SpaceListSnapshot) {
    state
        .app_lists
        .retain(|space, _| snapshot.contains(*space));
    state.snapshot = Some(snapshot);
    state.clamp_selected_index();
}

fn apply_lifecycle_event(state: &mut AppState, op_id: OperationId, ev: LifecycleEvent) {
    match ev {
        LifecycleEvent::Started { operation } => {
            state.lifecycle = LifecycleState {
                phase: operation.initial_phase(),
                operation: Some(operation),
                op_id: Some(op_id),
                return_page: state.selected_index,
            };
            state.generation += 1;
            state.last_error = None;
        }

        LifecycleEvent::PhaseChanged(phase) => state.lifecycle.phase = phase,

        LifecycleEvent::SpaceLimitResolved(limit) => state.device_space_limit = Some(limit),

        LifecycleEvent::Refreshed(snapshot) => {
            let lifecycle = std::mem::replace(&mut state.lifecycle, LifecycleState::idle());
            state.selected_index = match lifecycle.operation {
                Some(SpaceOperation::Delete { .. }) => 0,
                _ => lifecycle.return_page,
            };
            publish_snapshot(state, snapshot);
        }

        LifecycleEvent::Failed { message } => {
            state.lifecycle = LifecycleState::idle();
            state.last_error = Some(message);
        }

        LifecycleEvent::Cancelled => state.lifecycle = LifecycleState::idle(),
    }
}

fn apply_app_list_event(state: &mut AppState, space: SpaceId, ev: AppListEvent) {
    match ev {
        AppListEvent::LoadStarted => {
            state.app_lists.insert(space, AppListState::Loading);
        }

        AppListEvent::Loaded(entries) => {
            if state.snapshot.as_ref().is_some_and(|s| s.contains(space)) {
                state.app_lists.insert(
                    space,
                    AppListState::Loaded {
                        entries,
                        pending: BTreeSet::new(),
                    },
                );
            }
        }

        AppListEvent::LoadFailed(message) => {
            if state.snapshot.as_ref().is_some_and(|s| s.contains(space)) {
                state.app_lists.insert(space, AppListState::Failed(message));
            }
        }

        AppListEvent::ToggleStarted { package } => {
            if let Some(AppListState::Loaded { pending, .. }) = state.app_lists.get_mut(&space) {
                pending.insert(package);
            }
        }

        AppListEvent::Toggled { package, enabled } => {
            if let Some(AppListState::Loaded { entries, pending }) =
                state.app_lists.get_mut(&space)
            {
                pending.remove(&package);
                pspace_core::set_entry_enabled(entries, &package, enabled);
            }
        }

        AppListEvent::ToggleFailed { package, message } => {
            if let Some(AppListState::Loaded { pending, .. }) = state.app_lists.get_mut(&space) {
                pending.remove(&package);
            }
            state.last_error = Some(message);
        }
    }
}

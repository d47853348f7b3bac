use pspace_app_core::domain::{LifecyclePhase, LifecycleState};
use pspace_app_core::{
    busy_label, space_pager_vm, space_settings_vm, AppListState, AppState, PageVm, SpaceOperation,
    SpacePagerVm,
};
use pspace_core::{AppEntry, SpaceListSnapshot, SpaceRecord};

fn state_with(ids: &[i32], limit: usize) -> AppState {
    let mut state = AppState::default();
    state.device_space_limit = Some(limit);
    state.snapshot = Some(SpaceListSnapshot::from_records(
        ids.iter()
            .map(|&id| SpaceRecord {
                id,
                name: Some(format!("Space {id}")),
            })
            .collect(),
        "Space",
    ));
    state
}

fn loaded(state: &AppState) -> pspace_app_core::SpacePagesVm {
    match space_pager_vm(state) {
        SpacePagerVm::Loaded(vm) => vm,
        SpacePagerVm::Loading { .. } => panic!("pager still loading"),
    }
}

#[test]
fn pager_is_loading_until_first_snapshot() {
    let state = AppState::default();
    assert!(matches!(
        space_pager_vm(&state),
        SpacePagerVm::Loading { status: None }
    ));
}

#[test]
fn pager_shows_loading_placeholder_while_busy() {
    let mut state = state_with(&[10], 3);
    state.lifecycle = LifecycleState {
        phase: LifecyclePhase::Settling,
        operation: Some(SpaceOperation::Create {
            name: "Work".into(),
        }),
        op_id: Some(uuid::Uuid::new_v4()),
        return_page: 0,
    };

    match space_pager_vm(&state) {
        SpacePagerVm::Loading { status } => {
            assert_eq!(status.as_deref(), Some("Waiting for the device to settle..."));
        }
        SpacePagerVm::Loaded(_) => panic!("pager should be loading"),
    }
}

#[test]
fn new_space_page_is_offered_below_limit() {
    let vm = loaded(&state_with(&[10, 11], 3));
    assert!(vm.can_create);
    assert_eq!(vm.pages.len(), 3);
    assert_eq!(
        vm.pages[2],
        PageVm::NewSpace {
            suggested_name: "Space 3".into()
        }
    );
}

#[test]
fn new_space_page_is_hidden_at_limit() {
    let vm = loaded(&state_with(&[10, 11, 12], 3));
    assert!(!vm.can_create);
    assert_eq!(vm.pages.len(), 3);
    assert!(vm
        .pages
        .iter()
        .all(|p| matches!(p, PageVm::Space { .. })));
}

#[test]
fn space_menu_only_on_space_pages() {
    let mut state = state_with(&[10], 3);
    state.selected_index = 0;
    let vm = loaded(&state);
    assert!(vm.show_space_menu);
    assert_eq!(vm.selected_space(), Some(10));

    state.selected_index = 1;
    let vm = loaded(&state);
    assert!(!vm.show_space_menu);
    assert_eq!(vm.selected_space(), None);
}

#[test]
fn busy_label_follows_phase() {
    let mut lifecycle = LifecycleState {
        phase: LifecyclePhase::Submitting,
        operation: Some(SpaceOperation::Delete { id: 11 }),
        op_id: Some(uuid::Uuid::new_v4()),
        return_page: 0,
    };
    assert_eq!(busy_label(&lifecycle).as_deref(), Some("Removing space 11..."));

    lifecycle.phase = LifecyclePhase::Refreshing;
    assert_eq!(busy_label(&lifecycle).as_deref(), Some("Removing space..."));

    assert_eq!(busy_label(&LifecycleState::idle()), None);
}

#[test]
fn space_settings_count_duplicated_apps() {
    let mut state = state_with(&[10], 3);
    assert_eq!(space_settings_vm(&state, 10).unwrap().duplicated_apps, None);
    assert!(space_settings_vm(&state, 99).is_none());

    let entry = |pkg: &str, enabled| AppEntry {
        package_name: pkg.into(),
        label: pkg.into(),
        icon: None,
        enabled,
    };
    state.app_lists.insert(
        10,
        AppListState::Loaded {
            entries: vec![entry("a", true), entry("b", false), entry("c", true)],
            pending: Default::default(),
        },
    );
    let vm = space_settings_vm(&state, 10).unwrap();
    assert_eq!(vm.name, "Space 10");
    assert_eq!(vm.duplicated_apps, Some(2));
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pspace_app_core::{
    AppKernel, AppSettings, AppState, AppStore, BackendError, BackendOp, FilePersistence,
    SettingsRepo, SettleTimings, SpaceBackend,
};
use pspace_cli::settings::OverrideSettings;
use pspace_cli::{commands, SettingKey};
use pspace_core::{InstalledApp, SpaceId, SpaceRecord};

#[derive(Default)]
struct Device {
    users: Vec<SpaceRecord>,
    apps: HashMap<SpaceId, Vec<InstalledApp>>,
    reject_create: bool,
}

#[derive(Clone, Default)]
struct InMemoryDevice(Arc<Mutex<Device>>);

fn app(pkg: &str, label: &str) -> InstalledApp {
    InstalledApp {
        package_name: pkg.into(),
        label: label.into(),
        icon: None,
        is_system: false,
    }
}

#[async_trait::async_trait]
impl SpaceBackend for InMemoryDevice {
    async fn list_profiles(&self) -> Result<Vec<SpaceRecord>, BackendError> {
        Ok(self.0.lock().unwrap().users.clone())
    }

    async fn create_profile(&self, name: &str) -> Result<(), BackendError> {
        let mut d = self.0.lock().unwrap();
        if d.reject_create {
            return Err(BackendError::failure(
                BackendOp::CreateProfile,
                -1,
                "Error: couldn't create User.",
            ));
        }
        let id = d.users.iter().map(|u| u.id).max().unwrap_or(9) + 1;
        d.users.push(SpaceRecord {
            id,
            name: Some(name.into()),
        });
        Ok(())
    }

    async fn remove_profile(&self, id: SpaceId) -> Result<(), BackendError> {
        self.0.lock().unwrap().users.retain(|u| u.id != id);
        Ok(())
    }

    async fn source_profile_id(&self) -> Result<SpaceId, BackendError> {
        Ok(0)
    }

    async fn list_installed_apps(
        &self,
        profile: SpaceId,
    ) -> Result<Vec<InstalledApp>, BackendError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .apps
            .get(&profile)
            .cloned()
            .unwrap_or_default())
    }

    async fn duplicate_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError> {
        let mut d = self.0.lock().unwrap();
        let found = d.apps[&0].iter().find(|a| a.package_name == package).cloned();
        if let Some(a) = found {
            d.apps.entry(profile).or_default().push(a);
        }
        Ok(())
    }

    async fn remove_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError> {
        if let Some(apps) = self.0.lock().unwrap().apps.get_mut(&profile) {
            apps.retain(|a| a.package_name != package);
        }
        Ok(())
    }

    async fn profile_count_limit(&self) -> Result<usize, BackendError> {
        Ok(3)
    }
}

fn settings_repo(dir: &tempfile::TempDir) -> FilePersistence {
    let repo = FilePersistence::with_config_dir(dir.path());
    repo.save(&AppSettings {
        timings: SettleTimings::immediate(),
        ..AppSettings::default()
    })
    .unwrap();
    repo
}

fn kernel(
    device: &InMemoryDevice,
    dir: &tempfile::TempDir,
) -> AppKernel<InMemoryDevice, FilePersistence> {
    AppKernel::new(
        AppStore::new(AppState::default()),
        device.clone(),
        settings_repo(dir),
    )
}

#[tokio::test]
async fn create_list_and_remove_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let device = InMemoryDevice::default();

    let spaces = commands::cmd_spaces_list(&mut kernel(&device, &dir))
        .await
        .unwrap();
    assert!(spaces.is_empty());

    let spaces = commands::cmd_space_create(&mut kernel(&device, &dir), None)
        .await
        .unwrap();
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].name, "Space 1");

    let spaces = commands::cmd_space_create(&mut kernel(&device, &dir), Some("Work".into()))
        .await
        .unwrap();
    assert_eq!(spaces.len(), 2);

    let id = spaces[0].id;
    let spaces = commands::cmd_space_remove(&mut kernel(&device, &dir), id)
        .await
        .unwrap();
    assert_eq!(spaces.len(), 1);
    assert_eq!(spaces[0].name, "Work");

    let err = commands::cmd_space_remove(&mut kernel(&device, &dir), 999)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn backend_rejection_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let device = InMemoryDevice::default();
    device.0.lock().unwrap().reject_create = true;

    let err = commands::cmd_space_create(&mut kernel(&device, &dir), Some("Work".into()))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("couldn't create User"));
    assert!(device.0.lock().unwrap().users.is_empty());
}

#[tokio::test]
async fn enable_and_disable_apps() {
    let dir = tempfile::tempdir().unwrap();
    let device = InMemoryDevice::default();
    {
        let mut d = device.0.lock().unwrap();
        d.users.push(SpaceRecord { id: 10, name: None });
        d.apps
            .insert(0, vec![app("com.maps", "Maps"), app("com.chat", "chat")]);
    }

    let entries = commands::cmd_apps_list(&mut kernel(&device, &dir), 10)
        .await
        .unwrap();
    let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["chat", "Maps"]);
    assert!(entries.iter().all(|e| !e.enabled));

    let entry = commands::cmd_apps_set(&mut kernel(&device, &dir), 10, "com.maps".into(), true)
        .await
        .unwrap();
    assert!(entry.enabled);
    assert_eq!(device.0.lock().unwrap().apps[&10].len(), 1);

    let entry = commands::cmd_apps_set(&mut kernel(&device, &dir), 10, "com.maps".into(), false)
        .await
        .unwrap();
    assert!(!entry.enabled);
    assert!(device.0.lock().unwrap().apps[&10].is_empty());

    let err = commands::cmd_apps_set(&mut kernel(&device, &dir), 10, "com.nope".into(), true)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("com.nope"));
}

#[test]
fn settings_set_persists_and_overrides_apply_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePersistence::with_config_dir(dir.path());

    commands::cmd_settings_set(&repo, SettingKey::Serial, "emulator-5554").unwrap();
    commands::cmd_settings_set(&repo, SettingKey::CreateSettleMs, "7000").unwrap();
    let stored = repo.load().unwrap();
    assert_eq!(stored.device_serial.as_deref(), Some("emulator-5554"));
    assert_eq!(stored.timings.create_settle_ms, 7000);

    let overridden = OverrideSettings::new(
        FilePersistence::with_config_dir(dir.path()),
        Some("/opt/adb".into()),
        Some("R58M".into()),
    );
    let loaded = commands::cmd_settings_show(&overridden).unwrap();
    assert_eq!(loaded.adb_path, "/opt/adb");
    assert_eq!(loaded.device_serial.as_deref(), Some("R58M"));
    assert_eq!(loaded.timings.create_settle_ms, 7000);
    // Overrides are never written back.
    assert_eq!(repo.load().unwrap().adb_path, "adb");
}

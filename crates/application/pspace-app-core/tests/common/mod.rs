#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pspace_app_core::app_core::AppStore;
use pspace_app_core::domain::{AppSettings, AppState, SettleTimings};
use pspace_app_core::error::{BackendError, BackendOp};
use pspace_app_core::kernel::AppKernel;
use pspace_app_core::ports::{SettingsRepo, SpaceBackend};
use pspace_core::{InstalledApp, SpaceId, SpaceRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProfiles,
    CreateProfile(String),
    RemoveProfile(SpaceId),
    SourceProfile,
    ListInstalledApps(SpaceId),
    DuplicatePackage(String, SpaceId),
    RemovePackage(String, SpaceId),
    ProfileCountLimit,
}

#[derive(Default)]
pub struct FakeState {
    pub spaces: Vec<SpaceRecord>,
    pub next_id: SpaceId,
    pub source_id: SpaceId,
    pub apps: HashMap<SpaceId, Vec<InstalledApp>>,
    pub limit: usize,
    pub calls: Vec<(Call, tokio::time::Instant)>,

    pub fail_create: bool,
    pub fail_remove: bool,
    pub fail_list: bool,
    pub fail_duplicate: bool,
    pub fail_limit: bool,

    pub create_delay: Duration,
    pub list_delay: Duration,
    pub duplicate_delay: Duration,
    /// Answer `list_profiles` with the spaces present when the call started,
    /// as a device does, rather than when its delay ends.
    pub list_reads_at_start: bool,
}

/// In-memory backend. Clones share state, so tests keep a handle after
/// moving one into the kernel.
#[derive(Clone, Default)]
pub struct FakeBackend {
    pub inner: Arc<Mutex<FakeState>>,
}

pub fn app(pkg: &str, label: &str, is_system: bool) -> InstalledApp {
    InstalledApp {
        package_name: pkg.into(),
        label: label.into(),
        icon: None,
        is_system,
    }
}

impl FakeBackend {
    pub fn with_spaces(ids: &[SpaceId]) -> Self {
        let fake = Self::default();
        {
            let mut s = fake.state();
            s.spaces = ids
                .iter()
                .map(|&id| SpaceRecord {
                    id,
                    name: Some(format!("Space {id}")),
                })
                .collect();
            s.next_id = ids.iter().copied().max().unwrap_or(9) + 1;
            s.limit = 3;
        }
        fake
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn call_times(&self) -> Vec<(Call, tokio::time::Instant)> {
        self.state().calls.clone()
    }

    pub fn set_apps(&self, profile: SpaceId, apps: Vec<InstalledApp>) {
        self.state().apps.insert(profile, apps);
    }

    fn record(&self, call: Call) {
        self.state().calls.push((call, tokio::time::Instant::now()));
    }
}

#[async_trait::async_trait]
impl SpaceBackend for FakeBackend {
    async fn list_profiles(&self) -> Result<Vec<SpaceRecord>, BackendError> {
        self.record(Call::ListProfiles);
        let (delay, early) = {
            let s = self.state();
            (s.list_delay, s.list_reads_at_start.then(|| s.spaces.clone()))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let s = self.state();
        if s.fail_list {
            return Err(BackendError::failure(BackendOp::ListProfiles, -1, "list failed"));
        }
        Ok(early.unwrap_or_else(|| s.spaces.clone()))
    }

    async fn create_profile(&self, name: &str) -> Result<(), BackendError> {
        self.record(Call::CreateProfile(name.into()));
        let delay = self.state().create_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut s = self.state();
        if s.fail_create {
            return Err(BackendError::failure(
                BackendOp::CreateProfile,
                -1,
                "Error: couldn't create User.",
            ));
        }
        let id = s.next_id;
        s.next_id += 1;
        s.spaces.push(SpaceRecord {
            id,
            name: Some(name.into()),
        });
        Ok(())
    }

    async fn remove_profile(&self, id: SpaceId) -> Result<(), BackendError> {
        self.record(Call::RemoveProfile(id));
        let mut s = self.state();
        if s.fail_remove {
            return Err(BackendError::failure(BackendOp::RemoveProfile, -1, "remove failed"));
        }
        s.spaces.retain(|r| r.id != id);
        Ok(())
    }

    async fn source_profile_id(&self) -> Result<SpaceId, BackendError> {
        self.record(Call::SourceProfile);
        Ok(self.state().source_id)
    }

    async fn list_installed_apps(
        &self,
        profile: SpaceId,
    ) -> Result<Vec<InstalledApp>, BackendError> {
        self.record(Call::ListInstalledApps(profile));
        Ok(self.state().apps.get(&profile).cloned().unwrap_or_default())
    }

    async fn duplicate_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError> {
        self.record(Call::DuplicatePackage(package.into(), profile));
        let delay = self.state().duplicate_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let mut s = self.state();
        if s.fail_duplicate {
            return Err(BackendError::failure(
                BackendOp::DuplicatePackage,
                -1,
                "install-existing failed",
            ));
        }
        let source = s.source_id;
        let copied = s
            .apps
            .get(&source)
            .and_then(|apps| apps.iter().find(|a| a.package_name == package).cloned());
        if let Some(app) = copied {
            s.apps.entry(profile).or_default().push(app);
        }
        Ok(())
    }

    async fn remove_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError> {
        self.record(Call::RemovePackage(package.into(), profile));
        if let Some(apps) = self.state().apps.get_mut(&profile) {
            apps.retain(|a| a.package_name != package);
        }
        Ok(())
    }

    async fn profile_count_limit(&self) -> Result<usize, BackendError> {
        self.record(Call::ProfileCountLimit);
        let s = self.state();
        if s.fail_limit {
            return Err(BackendError::Unavailable {
                op: BackendOp::ProfileCountLimit,
                message: "no device".into(),
            });
        }
        Ok(s.limit)
    }
}

#[derive(Clone)]
pub struct MemorySettings {
    pub stored: Arc<Mutex<AppSettings>>,
}

impl MemorySettings {
    pub fn immediate() -> Self {
        Self {
            stored: Arc::new(Mutex::new(AppSettings {
                timings: SettleTimings::immediate(),
                ..AppSettings::default()
            })),
        }
    }
}

impl SettingsRepo for MemorySettings {
    fn load(&self) -> anyhow::Result<AppSettings> {
        Ok(self.stored.lock().unwrap().clone())
    }

    fn save(&self, settings: &AppSettings) -> anyhow::Result<()> {
        *self.stored.lock().unwrap() = settings.clone();
        Ok(())
    }
}

pub type TestKernel = AppKernel<FakeBackend, MemorySettings>;

pub fn kernel_with(fake: &FakeBackend, settings: MemorySettings) -> TestKernel {
    AppKernel::new(AppStore::new(AppState::default()), fake.clone(), settings)
}

/// Ticks until `pred` holds or `timeout` elapses.
pub fn pump_until(
    kernel: &mut TestKernel,
    timeout: Duration,
    pred: impl Fn(&AppState) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        kernel.tick();
        if pred(&kernel.state()) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

pub fn idle(state: &AppState) -> bool {
    !state.lifecycle.is_busy()
}

/// A kernel that has finished its initial load.
pub fn loaded_kernel(fake: &FakeBackend) -> TestKernel {
    let mut kernel = kernel_with(fake, MemorySettings::immediate());
    kernel
        .dispatch(pspace_app_core::AppCommand::LoadInitialState)
        .expect("initial load starts");
    assert!(
        pump_until(&mut kernel, Duration::from_secs(5), |s| idle(s)
            && s.snapshot.is_some()),
        "initial load did not finish"
    );
    kernel
}

pub fn space_ids(state: &AppState) -> Vec<SpaceId> {
    state
        .snapshot
        .as_ref()
        .map(|s| s.spaces().iter().map(|sp| sp.id).collect())
        .unwrap_or_default()
}

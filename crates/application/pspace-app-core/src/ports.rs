use pspace_core::{InstalledApp, SpaceId, SpaceRecord};

use crate::domain::AppSettings;
use crate::error::BackendError;

/// The privileged service that owns users and per-user packages.
#[async_trait::async_trait]
pub trait SpaceBackend: Send + Sync + 'static {
    /// Parallel spaces, excluding the source profile.
    async fn list_profiles(&self) -> Result<Vec<SpaceRecord>, BackendError>;
    async fn create_profile(&self, name: &str) -> Result<(), BackendError>;
    async fn remove_profile(&self, id: SpaceId) -> Result<(), BackendError>;
    /// The profile this panel acts from; apps are duplicated out of it.
    async fn source_profile_id(&self) -> Result<SpaceId, BackendError>;
    async fn list_installed_apps(&self, profile: SpaceId)
        -> Result<Vec<InstalledApp>, BackendError>;
    async fn duplicate_package(&self, package: &str, profile: SpaceId)
        -> Result<(), BackendError>;
    async fn remove_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError>;
    async fn profile_count_limit(&self) -> Result<usize, BackendError>;

    /// Applies connection settings. Called at boot and whenever settings change.
    fn configure(&self, _settings: &AppSettings) {}
}

pub trait SettingsRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<AppSettings>;
    fn save(&self, settings: &AppSettings) -> anyhow::Result<()>;
}

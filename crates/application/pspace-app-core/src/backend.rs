use std::sync::RwLock;

use pspace_core::{IconHandle, InstalledApp, SpaceId, SpaceRecord};
use pspace_infra::{AdbClient, AdbError, UserEntry};
use tracing::{debug, warn};

use crate::domain::AppSettings;
use crate::error::{BackendError, BackendOp};
use crate::ports::SpaceBackend;

/// The device owner. Never offered as a space, even when the panel runs as
/// another user.
const SYSTEM_USER_ID: SpaceId = 0;
/// `UserInfo.FLAG_MANAGED_PROFILE`; work profiles belong to their parent user.
const FLAG_MANAGED_PROFILE: u32 = 0x20;

#[derive(Debug, Clone)]
struct AdbConfig {
    client: AdbClient,
    create_args: Vec<String>,
}

impl AdbConfig {
    fn from_settings(settings: &AppSettings) -> Self {
        let create_args = shlex::split(&settings.create_user_args).unwrap_or_else(|| {
            warn!(
                "Ignoring unparsable create-user arguments: {:?}",
                settings.create_user_args
            );
            Vec::new()
        });
        Self {
            client: AdbClient::new(settings.adb_path.as_str())
                .with_serial(settings.device_serial.clone()),
            create_args,
        }
    }
}

/// [`SpaceBackend`] over `adb shell pm`. Every user other than the one the
/// device is currently running as is a space.
pub struct AdbSpaceBackend {
    config: RwLock<AdbConfig>,
}

impl Default for AdbSpaceBackend {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

impl AdbSpaceBackend {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            config: RwLock::new(AdbConfig::from_settings(settings)),
        }
    }

    fn config(&self) -> AdbConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn client(&self) -> AdbClient {
        self.config().client
    }

    /// Serials of attached devices, for device selection.
    pub async fn devices(&self) -> Result<Vec<String>, AdbError> {
        self.client().devices().await
    }
}

fn map_err(op: BackendOp) -> impl FnOnce(AdbError) -> BackendError {
    move |e| match e {
        AdbError::Spawn { .. } | AdbError::Timeout { .. } => BackendError::Unavailable {
            op,
            message: e.to_string(),
        },
        other => BackendError::failure(op, other.status(), other.to_string()),
    }
}

fn is_managed_profile(user: &UserEntry) -> bool {
    user.flags
        .as_deref()
        .and_then(|flags| u32::from_str_radix(flags, 16).ok())
        .is_some_and(|flags| flags & FLAG_MANAGED_PROFILE != 0)
}

fn spaces_from_users(users: Vec<UserEntry>, current: SpaceId) -> Vec<SpaceRecord> {
    users
        .into_iter()
        .filter(|u| u.id != current && u.id != SYSTEM_USER_ID)
        .filter(|u| {
            let managed = is_managed_profile(u);
            if managed {
                debug!(user = u.id, "Skipping managed profile");
            }
            !managed
        })
        .map(|u| SpaceRecord {
            id: u.id,
            name: u.name,
        })
        .collect()
}

fn to_installed_app(entry: pspace_infra::PackageEntry) -> InstalledApp {
    InstalledApp {
        label: entry.package_name.clone(),
        package_name: entry.package_name,
        icon: entry.apk_path.map(IconHandle),
        is_system: entry.is_system,
    }
}

#[async_trait::async_trait]
impl SpaceBackend for AdbSpaceBackend {
    async fn list_profiles(&self) -> Result<Vec<SpaceRecord>, BackendError> {
        let client = self.client();
        let (users, current) = tokio::try_join!(
            async { client.list_users().await.map_err(map_err(BackendOp::ListProfiles)) },
            async {
                client
                    .current_user()
                    .await
                    .map_err(map_err(BackendOp::ListProfiles))
            },
        )?;
        Ok(spaces_from_users(users, current))
    }

    async fn create_profile(&self, name: &str) -> Result<(), BackendError> {
        let config = self.config();
        let id = config
            .client
            .create_user(name, &config.create_args)
            .await
            .map_err(map_err(BackendOp::CreateProfile))?;
        debug!(id, name, "Created user");
        Ok(())
    }

    async fn remove_profile(&self, id: SpaceId) -> Result<(), BackendError> {
        self.client()
            .remove_user(id)
            .await
            .map_err(map_err(BackendOp::RemoveProfile))
    }

    async fn source_profile_id(&self) -> Result<SpaceId, BackendError> {
        self.client()
            .current_user()
            .await
            .map_err(map_err(BackendOp::SourceProfile))
    }

    async fn list_installed_apps(
        &self,
        profile: SpaceId,
    ) -> Result<Vec<InstalledApp>, BackendError> {
        let packages = self
            .client()
            .list_packages(profile)
            .await
            .map_err(map_err(BackendOp::ListInstalledApps))?;
        Ok(packages.into_iter().map(to_installed_app).collect())
    }

    async fn duplicate_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError> {
        self.client()
            .install_existing(package, profile)
            .await
            .map_err(map_err(BackendOp::DuplicatePackage))
    }

    async fn remove_package(&self, package: &str, profile: SpaceId) -> Result<(), BackendError> {
        self.client()
            .uninstall_for_user(package, profile)
            .await
            .map_err(map_err(BackendOp::RemovePackage))
    }

    async fn profile_count_limit(&self) -> Result<usize, BackendError> {
        let max = self
            .client()
            .max_users()
            .await
            .map_err(map_err(BackendOp::ProfileCountLimit))?;
        // The owner counts towards the device maximum but is not a space.
        Ok(max.saturating_sub(1))
    }

    fn configure(&self, settings: &AppSettings) {
        let next = AdbConfig::from_settings(settings);
        debug!(
            adb = %settings.adb_path,
            serial = ?next.client.serial(),
            "Reconfiguring adb backend"
        );
        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_failures_map_to_unavailable() {
        let err = map_err(BackendOp::ListProfiles)(AdbError::Timeout {
            command: "shell pm list users".into(),
            secs: 10,
        });
        assert!(matches!(
            err,
            BackendError::Unavailable {
                op: BackendOp::ListProfiles,
                ..
            }
        ));
    }

    #[test]
    fn rejections_carry_negative_status() {
        let err = map_err(BackendOp::CreateProfile)(AdbError::Rejected {
            command: "shell pm create-user".into(),
            code: 1,
            message: "Error: couldn't create User.".into(),
        });
        match err {
            BackendError::Failure { op, status, message } => {
                assert_eq!(op, BackendOp::CreateProfile);
                assert_eq!(status, -1);
                assert!(message.contains("couldn't create User"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn user(id: SpaceId, flags: &str) -> UserEntry {
        UserEntry {
            id,
            name: Some(format!("User {id}")),
            flags: Some(flags.into()),
            running: true,
        }
    }

    #[test]
    fn owner_current_user_and_work_profiles_are_not_spaces() {
        let users = vec![
            user(0, "c13"),
            user(10, "1010"),
            user(11, "410"),
            user(12, "1030"),
        ];

        // Running as a secondary user: neither the owner nor ourselves.
        let ids: Vec<_> = spaces_from_users(users.clone(), 10)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![11]);

        let ids: Vec<_> = spaces_from_users(users, 0)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn package_entries_become_installed_apps() {
        let app = to_installed_app(pspace_infra::PackageEntry {
            package_name: "com.example".into(),
            apk_path: Some("/data/app/com.example-1/base.apk".into()),
            is_system: false,
        });
        assert_eq!(app.label, "com.example");
        assert_eq!(
            app.icon,
            Some(IconHandle("/data/app/com.example-1/base.apk".into()))
        );
        assert!(!app.is_system);
    }

    #[test]
    fn unparsable_create_args_are_dropped() {
        let settings = AppSettings {
            create_user_args: "--profileOf \"0".into(),
            ..AppSettings::default()
        };
        assert!(AdbConfig::from_settings(&settings).create_args.is_empty());

        let settings = AppSettings {
            create_user_args: "--profileOf 0 --managed".into(),
            ..AppSettings::default()
        };
        assert_eq!(
            AdbConfig::from_settings(&settings).create_args,
            vec!["--profileOf", "0", "--managed"]
        );
    }
}

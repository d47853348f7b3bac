use std::sync::Arc;

use pspace_core::{AppEntry, SpaceId};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::app_core::{AppListEvent, DomainEvent};
use crate::error::BackendError;
use crate::ports::SpaceBackend;

/// Computes a space's app list: the source profile's non-system apps, each
/// marked enabled if it is also installed in `target`.
pub async fn load_app_list<B: SpaceBackend + ?Sized>(
    backend: &B,
    target: SpaceId,
) -> Result<Vec<AppEntry>, BackendError> {
    let source_id = backend.source_profile_id().await?;
    let (source, installed) = tokio::try_join!(
        backend.list_installed_apps(source_id),
        backend.list_installed_apps(target),
    )?;
    debug!(
        source = source_id,
        target,
        source_apps = source.len(),
        target_apps = installed.len(),
        "Computing app list"
    );
    Ok(pspace_core::compute_app_list(&source, &installed))
}

/// Duplicates `package` into `target` when `enabled`, removes it otherwise.
pub async fn toggle_package<B: SpaceBackend + ?Sized>(
    backend: &B,
    target: SpaceId,
    package: &str,
    enabled: bool,
) -> Result<(), BackendError> {
    if enabled {
        backend.duplicate_package(package, target).await
    } else {
        backend.remove_package(package, target).await
    }
}

pub struct AppListWorker<B> {
    backend: Arc<B>,
    tx: mpsc::Sender<DomainEvent>,
    shutdown: CancellationToken,
}

impl<B: SpaceBackend> AppListWorker<B> {
    pub fn new(
        backend: Arc<B>,
        tx: mpsc::Sender<DomainEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            backend,
            tx,
            shutdown,
        }
    }

    pub fn start_load(&self, space: SpaceId) -> anyhow::Result<()> {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let cancel = self.shutdown.clone();

        crate::async_runtime::spawn_worker("pspace-app-list", async move {
            let res = tokio::select! {
                _ = cancel.cancelled() => return,
                res = load_app_list(backend.as_ref(), space) => res,
            };
            let ev = match res {
                Ok(entries) => AppListEvent::Loaded(entries),
                Err(e) => {
                    warn!(space, "Failed to load app list: {e}");
                    AppListEvent::LoadFailed(e.to_string())
                }
            };
            let _ = tx.send(DomainEvent::AppList { space, ev }).await;
        })
    }

    pub fn start_toggle(&self, space: SpaceId, package: String, enabled: bool) -> anyhow::Result<()> {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let cancel = self.shutdown.clone();

        crate::async_runtime::spawn_worker("pspace-toggle-package", async move {
            let res = tokio::select! {
                _ = cancel.cancelled() => return,
                res = toggle_package(backend.as_ref(), space, &package, enabled) => res,
            };
            let ev = match res {
                Ok(()) => AppListEvent::Toggled { package, enabled },
                Err(e) => {
                    warn!(space, package = %package, "Failed to update package: {e}");
                    AppListEvent::ToggleFailed {
                        package,
                        message: e.to_string(),
                    }
                }
            };
            let _ = tx.send(DomainEvent::AppList { space, ev }).await;
        })
    }
}

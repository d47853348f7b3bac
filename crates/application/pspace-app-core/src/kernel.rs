use std::sync::Arc;

use pspace_core::SpaceId;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app_core::{AppCommand, AppListEvent, AppStore, DomainEvent, LifecycleEvent};
use crate::app_list::AppListWorker;
use crate::domain::{AppListState, AppState, OperationId, SpaceOperation};
use crate::error::OrchestratorError;
use crate::orchestrator::SpaceLifecycleOrchestrator;
use crate::ports::{SettingsRepo, SpaceBackend};

/// Single writer of [`AppState`].
///
/// Commands are validated and applied synchronously in [`AppKernel::dispatch`];
/// background results are applied when the owner calls [`AppKernel::tick`].
pub struct AppKernel<B, S> {
    pub store: AppStore,
    backend: Arc<B>,
    settings: Arc<S>,
    orchestrator: SpaceLifecycleOrchestrator<B>,
    app_lists: AppListWorker<B>,
    shutdown: CancellationToken,

    tx: mpsc::Sender<DomainEvent>,
    rx: mpsc::Receiver<DomainEvent>,
}

impl<B, S> AppKernel<B, S>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    pub fn new(store: AppStore, backend: B, settings: S) -> Self {
        let (tx, rx) = mpsc::channel(pspace_config::EVENT_CHANNEL_CAPACITY);
        let backend = Arc::new(backend);
        let shutdown = CancellationToken::new();
        Self {
            store,
            orchestrator: SpaceLifecycleOrchestrator::new(
                backend.clone(),
                tx.clone(),
                shutdown.clone(),
            ),
            app_lists: AppListWorker::new(backend.clone(), tx.clone(), shutdown.clone()),
            backend,
            settings: Arc::new(settings),
            shutdown,
            tx,
            rx,
        }
    }

    pub fn dispatch(&mut self, cmd: AppCommand) -> Result<(), OrchestratorError> {
        match cmd {
            AppCommand::LoadInitialState => {
                self.ensure_idle()?;
                let load_error = match self.settings.load() {
                    Ok(settings) => {
                        self.backend.configure(&settings);
                        self.store.apply(DomainEvent::SettingsLoaded(settings));
                        None
                    }
                    Err(e) => {
                        warn!("Failed to load settings, using defaults: {e:#}");
                        self.backend.configure(&self.store.state().settings);
                        Some(format!("Failed to load settings: {e:#}"))
                    }
                };
                self.start_operation(SpaceOperation::Load)?;
                if let Some(message) = load_error {
                    self.store.apply(DomainEvent::UserError(message));
                }
                Ok(())
            }

            AppCommand::Refresh => {
                self.ensure_idle()?;
                self.start_operation(SpaceOperation::Refresh)
            }

            AppCommand::CreateSpace(name) => {
                self.ensure_idle()?;
                let name = pspace_core::validate_space_name(&name)?;
                let state = self.store.state();
                if state.snapshot.is_none() {
                    return Err(OrchestratorError::NotLoaded);
                }
                if !state.can_create_space() {
                    return Err(OrchestratorError::LimitReached {
                        limit: state.space_limit(),
                    });
                }
                self.start_operation(SpaceOperation::Create { name })
            }

            AppCommand::DeleteSpace(id) => {
                self.ensure_idle()?;
                self.ensure_known_space(&self.store.state(), id)?;
                self.start_operation(SpaceOperation::Delete { id })
            }

            AppCommand::NotifyExternalChange => {
                let state = self.store.state();
                if state.lifecycle.is_busy() {
                    debug!("Ignoring external change notification while busy");
                    return Ok(());
                }
                self.orchestrator
                    .start_external_refresh(
                        state.generation,
                        state.settings.default_space_name,
                    )
                    .map_err(|e| OrchestratorError::Worker(e.to_string()))
            }

            AppCommand::SelectPage(index) => {
                self.store.apply(DomainEvent::PageSelected(index));
                Ok(())
            }

            AppCommand::LoadAppList { space, force } => {
                let state = self.store.state();
                self.ensure_known_space(&state, space)?;
                self.ensure_not_deleting(&state, space)?;
                match state.app_lists.get(&space) {
                    Some(AppListState::Loading) => return Ok(()),
                    Some(AppListState::Loaded { .. }) if !force => return Ok(()),
                    // A reload would discard the confirmation of an in-flight toggle.
                    Some(AppListState::Loaded { pending, .. }) => {
                        if let Some(package) = pending.first() {
                            return Err(OrchestratorError::PackageBusy(package.clone()));
                        }
                    }
                    _ => {}
                }

                self.store.apply(DomainEvent::AppList {
                    space,
                    ev: AppListEvent::LoadStarted,
                });
                if let Err(e) = self.app_lists.start_load(space) {
                    self.store.apply(DomainEvent::AppList {
                        space,
                        ev: AppListEvent::LoadFailed(e.to_string()),
                    });
                    return Err(OrchestratorError::Worker(e.to_string()));
                }
                Ok(())
            }

            AppCommand::SetPackageEnabled {
                space,
                package,
                enabled,
            } => {
                let state = self.store.state();
                self.ensure_known_space(&state, space)?;
                self.ensure_not_deleting(&state, space)?;
                let Some(AppListState::Loaded { entries, pending }) = state.app_lists.get(&space)
                else {
                    return Err(OrchestratorError::UnknownPackage { space, package });
                };
                let Some(entry) = entries.iter().find(|e| e.package_name == package) else {
                    return Err(OrchestratorError::UnknownPackage { space, package });
                };
                if pending.contains(&package) {
                    return Err(OrchestratorError::PackageBusy(package));
                }
                if entry.enabled == enabled {
                    return Ok(());
                }

                self.store.apply(DomainEvent::AppList {
                    space,
                    ev: AppListEvent::ToggleStarted {
                        package: package.clone(),
                    },
                });
                if let Err(e) = self.app_lists.start_toggle(space, package.clone(), enabled) {
                    self.store.apply(DomainEvent::AppList {
                        space,
                        ev: AppListEvent::ToggleFailed {
                            package,
                            message: e.to_string(),
                        },
                    });
                    return Err(OrchestratorError::Worker(e.to_string()));
                }
                Ok(())
            }

            AppCommand::SaveSettings(settings) => {
                self.backend.configure(&settings);
                self.store
                    .apply(DomainEvent::SettingsChanged(settings.clone()));

                let repo = self.settings.clone();
                let tx = self.tx.clone();
                std::thread::Builder::new()
                    .name("pspace-save-settings".into())
                    .spawn(move || {
                        if let Err(e) = repo.save(&settings) {
                            let _ = tx.blocking_send(DomainEvent::UserError(format!(
                                "Failed to save settings: {e:#}"
                            )));
                        }
                    })
                    .map_err(|e| OrchestratorError::Worker(e.to_string()))?;
                Ok(())
            }

            AppCommand::DismissError => {
                self.store.apply(DomainEvent::ErrorDismissed);
                Ok(())
            }
        }
    }

    /// Applies queued background results. Events from superseded operations,
    /// and external refresh results that arrive while busy, are discarded.
    pub fn tick(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            match &ev {
                DomainEvent::Lifecycle { op_id, .. } => {
                    let current = self.store.read(|s| s.lifecycle.op_id);
                    if current != Some(*op_id) {
                        debug!(%op_id, "Discarding event from stale operation");
                        continue;
                    }
                }
                DomainEvent::ExternalSnapshot { generation, .. } => {
                    let (busy, current) =
                        self.store.read(|s| (s.lifecycle.is_busy(), s.generation));
                    if busy || *generation != current {
                        debug!(
                            generation = *generation,
                            current,
                            "Discarding outdated external refresh result"
                        );
                        continue;
                    }
                }
                _ => {}
            }
            self.store.apply(ev);
        }
    }

    pub fn state(&self) -> AppState {
        self.store.state()
    }

    pub fn is_busy(&self) -> bool {
        self.store.read(|s| s.lifecycle.is_busy())
    }

    pub fn sender(&self) -> mpsc::Sender<DomainEvent> {
        self.tx.clone()
    }

    /// Cancels in-flight backend calls and settle delays.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn ensure_idle(&self) -> Result<(), OrchestratorError> {
        if self.is_busy() {
            return Err(OrchestratorError::Busy);
        }
        Ok(())
    }

    fn ensure_known_space(&self, state: &AppState, id: SpaceId) -> Result<(), OrchestratorError> {
        match &state.snapshot {
            Some(snapshot) if snapshot.contains(id) => Ok(()),
            _ => Err(OrchestratorError::InvalidReference(id)),
        }
    }

    fn ensure_not_deleting(&self, state: &AppState, id: SpaceId) -> Result<(), OrchestratorError> {
        match &state.lifecycle.operation {
            Some(SpaceOperation::Delete { id: deleting }) if *deleting == id => {
                Err(OrchestratorError::Busy)
            }
            _ => Ok(()),
        }
    }

    fn start_operation(&mut self, operation: SpaceOperation) -> Result<(), OrchestratorError> {
        let op_id: OperationId = uuid::Uuid::new_v4();
        let settings = self.store.state().settings;
        info!(%op_id, ?operation, "Starting space operation");
        self.store.apply(DomainEvent::Lifecycle {
            op_id,
            ev: LifecycleEvent::Started {
                operation: operation.clone(),
            },
        });

        if let Err(e) = self.orchestrator.start(
            op_id,
            operation,
            settings.timings,
            settings.default_space_name,
        ) {
            self.store.apply(DomainEvent::Lifecycle {
                op_id,
                ev: LifecycleEvent::Failed {
                    message: format!("Failed to start space worker: {e:#}"),
                },
            });
            return Err(OrchestratorError::Worker(e.to_string()));
        }
        Ok(())
    }
}

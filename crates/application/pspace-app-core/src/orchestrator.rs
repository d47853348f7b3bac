use std::future::Future;
use std::sync::Arc;

use pspace_core::SpaceListSnapshot;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app_core::{DomainEvent, LifecycleEvent};
use crate::domain::{LifecyclePhase, OperationId, SettleTimings, SpaceOperation};
use crate::ports::SpaceBackend;

/// Runs create/delete/refresh operations against the backend.
///
/// The orchestrator itself holds no busy state. The kernel owns the
/// lifecycle phase and only starts an operation while idle; this type drives
/// the backend calls and settle delays and reports progress as
/// [`DomainEvent::Lifecycle`] events tagged with the operation id.
pub struct SpaceLifecycleOrchestrator<B> {
    backend: Arc<B>,
    tx: mpsc::Sender<DomainEvent>,
    shutdown: CancellationToken,
}

impl<B: SpaceBackend> SpaceLifecycleOrchestrator<B> {
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

    pub fn start(
        &self,
        op_id: OperationId,
        op: SpaceOperation,
        timings: SettleTimings,
        default_name: String,
    ) -> anyhow::Result<()> {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let cancel = self.shutdown.clone();
        let thread_name = match op {
            SpaceOperation::Load | SpaceOperation::Refresh => "pspace-refresh",
            SpaceOperation::Create { .. } => "pspace-create-space",
            SpaceOperation::Delete { .. } => "pspace-delete-space",
        };

        crate::async_runtime::spawn_worker(thread_name, async move {
            run_operation(
                backend.as_ref(),
                &tx,
                &cancel,
                op_id,
                op,
                &timings,
                &default_name,
            )
            .await;
        })
    }

    /// Re-queries the space list outside of any orchestrated operation.
    ///
    /// The result arrives as [`DomainEvent::ExternalSnapshot`] tagged with
    /// `generation`; the kernel drops it if an operation started in the
    /// meantime, even one that has already finished.
    pub fn start_external_refresh(
        &self,
        generation: u64,
        default_name: String,
    ) -> anyhow::Result<()> {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let cancel = self.shutdown.clone();

        crate::async_runtime::spawn_worker("pspace-external-refresh", async move {
            let res = tokio::select! {
                _ = cancel.cancelled() => return,
                res = backend.list_profiles() => res,
            };
            match res {
                Ok(records) => {
                    let snapshot = SpaceListSnapshot::from_records(records, &default_name);
                    let _ = tx
                        .send(DomainEvent::ExternalSnapshot {
                            generation,
                            snapshot,
                        })
                        .await;
                }
                Err(e) => warn!("External refresh failed: {e}"),
            }
        })
    }
}

enum Interrupt {
    Cancelled,
    Failed(String),
}

async fn guarded<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = T>,
) -> Result<T, Interrupt> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Interrupt::Cancelled),
        v = fut => Ok(v),
    }
}

async fn emit(tx: &mpsc::Sender<DomainEvent>, op_id: OperationId, ev: LifecycleEvent) {
    let _ = tx.send(DomainEvent::Lifecycle { op_id, ev }).await;
}

/// Drives one operation to completion and reports its outcome.
///
/// Always ends with exactly one of `Refreshed`, `Failed` or `Cancelled`.
/// The refresh is issued strictly after the settle delay of a mutation.
pub async fn run_operation<B: SpaceBackend + ?Sized>(
    backend: &B,
    tx: &mpsc::Sender<DomainEvent>,
    cancel: &CancellationToken,
    op_id: OperationId,
    op: SpaceOperation,
    timings: &SettleTimings,
    default_name: &str,
) {
    info!(%op_id, "{}", op.label());
    let outcome = drive(backend, tx, cancel, op_id, &op, timings, default_name).await;
    let ev = match outcome {
        Ok(snapshot) => {
            info!(%op_id, spaces = snapshot.len(), "Space list refreshed");
            LifecycleEvent::Refreshed(snapshot)
        }
        Err(Interrupt::Failed(message)) => {
            warn!(%op_id, "{} failed: {message}", op.label());
            LifecycleEvent::Failed { message }
        }
        Err(Interrupt::Cancelled) => {
            debug!(%op_id, "Operation cancelled");
            LifecycleEvent::Cancelled
        }
    };
    emit(tx, op_id, ev).await;
}

async fn drive<B: SpaceBackend + ?Sized>(
    backend: &B,
    tx: &mpsc::Sender<DomainEvent>,
    cancel: &CancellationToken,
    op_id: OperationId,
    op: &SpaceOperation,
    timings: &SettleTimings,
    default_name: &str,
) -> Result<SpaceListSnapshot, Interrupt> {
    match op {
        SpaceOperation::Load => match guarded(cancel, backend.profile_count_limit()).await? {
            Ok(limit) => emit(tx, op_id, LifecycleEvent::SpaceLimitResolved(limit)).await,
            Err(e) => warn!("Could not read space limit, using fallback: {e}"),
        },
        SpaceOperation::Refresh => {}
        SpaceOperation::Create { name } => {
            guarded(cancel, backend.create_profile(name))
                .await?
                .map_err(|e| Interrupt::Failed(e.to_string()))?;
            emit(tx, op_id, LifecycleEvent::PhaseChanged(LifecyclePhase::Settling)).await;
            guarded(cancel, tokio::time::sleep(timings.create_settle())).await?;
        }
        SpaceOperation::Delete { id } => {
            guarded(cancel, tokio::time::sleep(timings.delete_pre_delay())).await?;
            guarded(cancel, backend.remove_profile(*id))
                .await?
                .map_err(|e| Interrupt::Failed(e.to_string()))?;
            emit(tx, op_id, LifecycleEvent::PhaseChanged(LifecyclePhase::Settling)).await;
            guarded(cancel, tokio::time::sleep(timings.delete_settle())).await?;
        }
    }

    if matches!(op, SpaceOperation::Create { .. } | SpaceOperation::Delete { .. }) {
        emit(tx, op_id, LifecycleEvent::PhaseChanged(LifecyclePhase::Refreshing)).await;
    }

    let records = guarded(cancel, backend.list_profiles())
        .await?
        .map_err(|e| Interrupt::Failed(e.to_string()))?;
    Ok(SpaceListSnapshot::from_records(records, default_name))
}

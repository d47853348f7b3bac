pub mod app_core;
pub mod app_list;
mod async_runtime;
pub mod backend;
pub mod domain;
pub mod error;
pub mod kernel;
pub mod orchestrator;
pub mod persistence;
pub mod ports;
pub mod viewmodel;

pub use app_core::*;
pub use backend::AdbSpaceBackend;
pub use domain::{
    AppListState, AppSettings, AppState, LifecyclePhase, LifecycleState, OperationId,
    SettleTimings, SpaceOperation,
};
pub use error::{BackendError, BackendOp, OrchestratorError};
pub use kernel::AppKernel;
pub use persistence::FilePersistence;
pub use ports::*;
pub use viewmodel::*;

use std::fmt;

use pspace_core::{SpaceId, SpaceNameError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp {
    ListProfiles,
    CreateProfile,
    RemoveProfile,
    SourceProfile,
    ListInstalledApps,
    DuplicatePackage,
    RemovePackage,
    ProfileCountLimit,
}

impl fmt::Display for BackendOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendOp::ListProfiles => "listProfiles",
            BackendOp::CreateProfile => "createProfile",
            BackendOp::RemoveProfile => "removeProfile",
            BackendOp::SourceProfile => "sourceProfile",
            BackendOp::ListInstalledApps => "listInstalledApps",
            BackendOp::DuplicatePackage => "duplicatePackage",
            BackendOp::RemovePackage => "removePackage",
            BackendOp::ProfileCountLimit => "profileCountLimit",
        };
        f.write_str(name)
    }
}

/// A privileged operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{op}() failed with status {status}: {message}")]
    Failure {
        op: BackendOp,
        status: i32,
        message: String,
    },
    #[error("{op}() could not reach the backend: {message}")]
    Unavailable { op: BackendOp, message: String },
}

impl BackendError {
    pub fn failure(op: BackendOp, status: i32, message: impl Into<String>) -> Self {
        Self::Failure {
            op,
            status,
            message: message.into(),
        }
    }

    pub fn op(&self) -> BackendOp {
        match self {
            BackendError::Failure { op, .. } | BackendError::Unavailable { op, .. } => *op,
        }
    }
}

/// Requests rejected before or while talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("Another space operation is still in progress")]
    Busy,
    #[error("Space list has not been loaded yet")]
    NotLoaded,
    #[error("Space {0} is not in the current space list")]
    InvalidReference(SpaceId),
    #[error(transparent)]
    InvalidName(#[from] SpaceNameError),
    #[error("Space limit of {limit} reached")]
    LimitReached { limit: usize },
    #[error("Package {package} is not listed for space {space}")]
    UnknownPackage { space: SpaceId, package: String },
    #[error("Package {0} is already being updated")]
    PackageBusy(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Failed to start background work: {0}")]
    Worker(String),
}

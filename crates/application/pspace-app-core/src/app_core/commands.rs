use pspace_core::SpaceId;

use crate::domain::AppSettings;

#[derive(Debug, Clone)]
pub enum AppCommand {
    // Boot
    LoadInitialState,

    // Space lifecycle
    Refresh,
    CreateSpace(String),
    DeleteSpace(SpaceId),
    /// Something outside the panel may have changed the user list.
    NotifyExternalChange,

    // Pager
    SelectPage(usize),

    // App lists
    LoadAppList { space: SpaceId, force: bool },
    SetPackageEnabled {
        space: SpaceId,
        package: String,
        enabled: bool,
    },

    // Settings
    SaveSettings(AppSettings),

    DismissError,
}

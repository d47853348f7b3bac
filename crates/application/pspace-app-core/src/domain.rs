use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use pspace_core::{AppEntry, SpaceId, SpaceListSnapshot};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type OperationId = Uuid;

fn default_adb_path() -> String {
    "adb".to_string()
}

fn default_space_name() -> String {
    pspace_config::DEFAULT_SPACE_NAME.to_string()
}

fn default_poll_interval() -> u64 {
    pspace_config::DEFAULT_POLL_INTERVAL_SECS
}

/// Fixed waits around space mutations.
///
/// The backend goes through an unstable period after creating or removing a
/// user; these delays are a heuristic for riding it out, not a readiness
/// signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleTimings {
    pub create_settle_ms: u64,
    pub delete_pre_delay_ms: u64,
    pub delete_settle_ms: u64,
}

impl Default for SettleTimings {
    fn default() -> Self {
        Self {
            create_settle_ms: pspace_config::DEFAULT_CREATE_SETTLE_MS,
            delete_pre_delay_ms: pspace_config::DEFAULT_DELETE_PRE_DELAY_MS,
            delete_settle_ms: pspace_config::DEFAULT_DELETE_SETTLE_MS,
        }
    }
}

impl SettleTimings {
    pub fn immediate() -> Self {
        Self {
            create_settle_ms: 0,
            delete_pre_delay_ms: 0,
            delete_settle_ms: 0,
        }
    }

    pub fn create_settle(&self) -> Duration {
        Duration::from_millis(pspace_config::clamp_settle_ms(self.create_settle_ms))
    }

    pub fn delete_pre_delay(&self) -> Duration {
        Duration::from_millis(pspace_config::clamp_settle_ms(self.delete_pre_delay_ms))
    }

    pub fn delete_settle(&self) -> Duration {
        Duration::from_millis(pspace_config::clamp_settle_ms(self.delete_settle_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_adb_path")]
    pub adb_path: String,
    #[serde(default)]
    pub device_serial: Option<String>,
    #[serde(default)]
    pub timings: SettleTimings,
    #[serde(default = "default_space_name")]
    pub default_space_name: String,
    /// Overrides the limit reported by the device.
    #[serde(default)]
    pub space_limit: Option<usize>,
    /// Extra `pm create-user` arguments, shell-quoted.
    #[serde(default)]
    pub create_user_args: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            adb_path: default_adb_path(),
            device_serial: None,
            timings: SettleTimings::default(),
            default_space_name: default_space_name(),
            space_limit: None,
            create_user_args: String::new(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    /// The mutating backend call (and any pre-delay) is in flight.
    Submitting,
    /// Waiting out the post-mutation settle delay.
    Settling,
    /// Re-querying the space list.
    Refreshing,
}

impl LifecyclePhase {
    pub fn is_busy(self) -> bool {
        self != LifecyclePhase::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceOperation {
    /// First load: resolves the space limit, then lists spaces.
    Load,
    Refresh,
    Create { name: String },
    Delete { id: SpaceId },
}

impl SpaceOperation {
    pub fn initial_phase(&self) -> LifecyclePhase {
        match self {
            SpaceOperation::Load | SpaceOperation::Refresh => LifecyclePhase::Refreshing,
            SpaceOperation::Create { .. } | SpaceOperation::Delete { .. } => {
                LifecyclePhase::Submitting
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpaceOperation::Load => "Loading spaces",
            SpaceOperation::Refresh => "Refreshing spaces",
            SpaceOperation::Create { .. } => "Creating space",
            SpaceOperation::Delete { .. } => "Removing space",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleState {
    pub phase: LifecyclePhase,
    pub operation: Option<SpaceOperation>,
    pub op_id: Option<OperationId>,
    /// Pager index to restore once the operation publishes its snapshot.
    pub return_page: usize,
}

impl LifecycleState {
    pub fn idle() -> Self {
        Self {
            phase: LifecyclePhase::Idle,
            operation: None,
            op_id: None,
            return_page: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppListState {
    Loading,
    Loaded {
        entries: Vec<AppEntry>,
        /// Packages with an enable/disable call in flight.
        pending: BTreeSet<String>,
    },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: AppSettings,
    pub lifecycle: LifecycleState,

    /// Last published space list; `None` until the first refresh completes.
    pub snapshot: Option<SpaceListSnapshot>,
    /// Pager position: space pages first, then the new-space page.
    pub selected_index: usize,
    /// Limit reported by the device, if resolved.
    pub device_space_limit: Option<usize>,
    /// Bumped whenever an orchestrated operation starts. External refreshes
    /// carry the value they were started under and are discarded once it moves.
    pub generation: u64,

    pub app_lists: HashMap<SpaceId, AppListState>,
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(AppSettings::default())
    }
}

impl AppState {
    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            settings,
            lifecycle: LifecycleState::idle(),
            snapshot: None,
            selected_index: 0,
            device_space_limit: None,
            generation: 0,
            app_lists: HashMap::new(),
            last_error: None,
        }
    }

    /// Settings override, then the device value, then the built-in default.
    pub fn space_limit(&self) -> usize {
        self.settings
            .space_limit
            .or(self.device_space_limit)
            .unwrap_or(pspace_config::DEFAULT_SPACE_LIMIT)
    }

    pub fn space_count(&self) -> Option<usize> {
        self.snapshot.as_ref().map(SpaceListSnapshot::len)
    }

    pub fn can_create_space(&self) -> bool {
        self.space_count()
            .is_some_and(|count| pspace_core::can_create_space(count, self.space_limit()))
    }

    /// Space pages plus the trailing new-space page when creation is allowed.
    pub fn page_count(&self) -> usize {
        self.space_count().unwrap_or(0) + usize::from(self.can_create_space())
    }

    pub fn clamp_selected_index(&mut self) {
        self.selected_index = self
            .selected_index
            .min(self.page_count().saturating_sub(1));
    }
}

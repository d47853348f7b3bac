use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod diff;
pub mod limits;

pub use diff::{compute_app_list, set_entry_enabled};
pub use limits::{can_create_space, suggested_space_name, validate_space_name, SpaceNameError};

/// Android user id of a profile.
pub type SpaceId = i32;

pub type PackageName = String;

/// A profile as reported by the backend, before display defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRecord {
    pub id: SpaceId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
}

/// Last known list of spaces. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceListSnapshot {
    spaces: Vec<Space>,
    fetched_at: DateTime<Utc>,
}

impl SpaceListSnapshot {
    /// Builds a snapshot from backend records. Records without a usable name
    /// get `default_name`.
    pub fn from_records(records: Vec<SpaceRecord>, default_name: &str) -> Self {
        let spaces = records
            .into_iter()
            .map(|r| Space {
                id: r.id,
                name: r
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| default_name.to_string()),
            })
            .collect();
        Self {
            spaces,
            fetched_at: Utc::now(),
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Space> {
        self.spaces.get(index)
    }

    pub fn find(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SpaceId) -> bool {
        self.find(id).is_some()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Equal when the same spaces are listed, regardless of order or fetch time.
impl PartialEq for SpaceListSnapshot {
    fn eq(&self, other: &Self) -> bool {
        if self.spaces.len() != other.spaces.len() {
            return false;
        }
        let mut a: Vec<&Space> = self.spaces.iter().collect();
        let mut b: Vec<&Space> = other.spaces.iter().collect();
        a.sort_by_key(|s| s.id);
        b.sort_by_key(|s| s.id);
        a == b
    }
}

/// Opaque reference to an app icon. For the ADB backend this is the APK path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconHandle(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub package_name: PackageName,
    pub label: String,
    pub icon: Option<IconHandle>,
    pub is_system: bool,
}

/// One row of a space's app list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    pub package_name: PackageName,
    pub label: String,
    pub icon: Option<IconHandle>,
    /// Installed in the target space.
    pub enabled: bool,
}

use crate::{AppEntry, InstalledApp};
use std::collections::HashSet;

/// Builds the app list shown for a target space.
///
/// Every non-system app of the source profile becomes one entry, enabled when
/// the target profile has the same package installed. Entries are ordered by
/// lowercase label; equal labels fall back to the package name.
pub fn compute_app_list(source: &[InstalledApp], target: &[InstalledApp]) -> Vec<AppEntry> {
    let installed: HashSet<&str> = target
        .iter()
        .filter(|app| !app.is_system)
        .map(|app| app.package_name.as_str())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries: Vec<AppEntry> = source
        .iter()
        .filter(|app| !app.is_system)
        .filter(|app| seen.insert(app.package_name.as_str()))
        .map(|app| AppEntry {
            package_name: app.package_name.clone(),
            label: app.label.clone(),
            icon: app.icon.clone(),
            enabled: installed.contains(app.package_name.as_str()),
        })
        .collect();

    entries.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.package_name.cmp(&b.package_name))
    });
    entries
}

/// Records a confirmed enable/disable. Returns false when the package is not listed.
pub fn set_entry_enabled(entries: &mut [AppEntry], package_name: &str, enabled: bool) -> bool {
    match entries.iter_mut().find(|e| e.package_name == package_name) {
        Some(entry) => {
            entry.enabled = enabled;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(pkg: &str, label: &str) -> InstalledApp {
        InstalledApp {
            package_name: pkg.to_string(),
            label: label.to_string(),
            icon: None,
            is_system: false,
        }
    }

    #[test]
    fn duplicate_source_packages_are_listed_once() {
        let source = vec![app("com.a", "A"), app("com.a", "A")];
        let list = compute_app_list(&source, &[]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn set_entry_enabled_reports_unknown_package() {
        let mut list = compute_app_list(&[app("com.a", "A")], &[]);
        assert!(set_entry_enabled(&mut list, "com.a", true));
        assert!(list[0].enabled);
        assert!(!set_entry_enabled(&mut list, "com.missing", true));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub id: i32,
    pub name: Option<String>,
    pub flags: Option<String>,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub package_name: String,
    pub apk_path: Option<String>,
    pub is_system: bool,
}

/// Serials of attached devices in the `device` state.
pub fn parse_devices_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.starts_with("List of devices"))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let serial = parts.next()?;
            match parts.next() {
                Some("device") => Some(serial.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// Parses `pm list users`:
///
/// ```text
/// Users:
///     UserInfo{0:Owner:c13} running
///     UserInfo{10:null:1010}
/// ```
pub fn parse_users_output(output: &str) -> Vec<UserEntry> {
    output
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let start = trimmed.find("UserInfo{")? + "UserInfo{".len();
            let end = trimmed.rfind('}')?;
            if end <= start {
                return None;
            }
            let inner = &trimmed[start..end];
            let running = trimmed[end + 1..].trim() == "running";

            let (id_part, rest) = inner.split_once(':').unwrap_or((inner, ""));
            let id = id_part.trim().parse::<i32>().ok()?;

            // Names may contain ':'; the flags are always the last segment.
            let (name, flags) = match rest.rsplit_once(':') {
                Some((name, flags)) => (name, Some(flags.to_string())),
                None => (rest, None),
            };
            let name = match name.trim() {
                "" | "null" => None,
                other => Some(other.to_string()),
            };

            Some(UserEntry {
                id,
                name,
                flags,
                running,
            })
        })
        .collect()
}

/// Parses `am get-current-user`.
pub fn parse_current_user_output(output: &str) -> Option<i32> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .and_then(|l| l.parse().ok())
}

/// Extracts the id from `Success: created user id 11`.
pub fn parse_created_user_id(output: &str) -> Option<i32> {
    output.lines().find_map(|line| {
        let line = line.trim();
        if !line.starts_with("Success") {
            return None;
        }
        let (_, tail) = line.rsplit_once("id")?;
        tail.trim().parse().ok()
    })
}

/// Parses `pm get-max-users` (`Maximum supported users: 4`).
pub fn parse_max_users_output(output: &str) -> Option<usize> {
    output.lines().find_map(|line| {
        let (_, value) = line.split_once(':')?;
        value.trim().parse().ok()
    })
}

/// Returns the first line that marks a `pm` rejection, if any.
pub fn find_pm_failure(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| {
            l.starts_with("Failure")
                || l.starts_with("Error")
                || l.starts_with("Exception")
                || l.contains("Unknown package")
        })
        .map(str::to_string)
}

/// Parses `pm list packages -f`.
pub fn parse_package_list_output(output: &str) -> Vec<PackageEntry> {
    let mut apps = Vec::new();
    for raw in output.lines() {
        let line = raw.trim();
        let Some(payload) = line.strip_prefix("package:") else {
            continue;
        };

        if let Some((apk_path, pkg)) = payload.rsplit_once('=') {
            let pkg = pkg.trim();
            if pkg.is_empty() {
                continue;
            }
            let apk_path = apk_path.trim().to_string();
            apps.push(PackageEntry {
                package_name: pkg.to_string(),
                is_system: is_system_path(&apk_path),
                apk_path: Some(apk_path),
            });
        } else if !payload.trim().is_empty() {
            apps.push(PackageEntry {
                package_name: payload.trim().to_string(),
                apk_path: None,
                is_system: false,
            });
        }
    }
    apps
}

fn is_system_path(path: &str) -> bool {
    path.starts_with("/system/")
        || path.starts_with("/product/")
        || path.starts_with("/vendor/")
        || path.starts_with("/system_ext/")
        || path.starts_with("/apex/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_devices_in_device_state_only() {
        let output = "List of devices attached\nR58M123\tdevice\nemulator-5554\toffline\nZY22\tunauthorized\n\n";
        assert_eq!(parse_devices_output(output), vec!["R58M123".to_string()]);
    }

    #[test]
    fn parses_pm_list_users_output() {
        let output = "Users:\n\tUserInfo{0:Owner:c13} running\n\tUserInfo{10:null:1010}\n\tUserInfo{11:Work: Main:1030} running\n";
        let users = parse_users_output(output);
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].id, 0);
        assert_eq!(users[0].name.as_deref(), Some("Owner"));
        assert!(users[0].running);
        assert_eq!(users[1].name, None);
        assert!(!users[1].running);
        assert_eq!(users[2].name.as_deref(), Some("Work: Main"));
        assert_eq!(users[2].flags.as_deref(), Some("1030"));
    }

    #[test]
    fn parses_created_user_id() {
        assert_eq!(parse_created_user_id("Success: created user id 11\n"), Some(11));
        assert_eq!(parse_created_user_id("Error: couldn't create User.\n"), None);
    }

    #[test]
    fn parses_current_user_and_max_users() {
        assert_eq!(parse_current_user_output("\n0\n"), Some(0));
        assert_eq!(parse_current_user_output("oops"), None);
        assert_eq!(parse_max_users_output("Maximum supported users: 4\n"), Some(4));
    }

    #[test]
    fn detects_pm_failures() {
        assert_eq!(
            find_pm_failure("Failure [DELETE_FAILED_INTERNAL_ERROR]\n").as_deref(),
            Some("Failure [DELETE_FAILED_INTERNAL_ERROR]")
        );
        assert!(find_pm_failure("Error: couldn't remove user id 12").is_some());
        assert!(find_pm_failure("Package com.a installed for user: 11\n").is_none());
        assert!(find_pm_failure("Success\n").is_none());
    }

    #[test]
    fn parses_pm_list_packages_output() {
        let output = "package:/data/app/~~x==/com.example-y==/base.apk=com.example\npackage:/system/app/Sys.apk=com.android.sys\nnoise\n";
        let items = parse_package_list_output(output);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].package_name, "com.example");
        assert!(!items[0].is_system);
        assert!(items[1].is_system);
    }
}

//! Thin async wrapper around the `adb` executable and the `pm`/`am` shell
//! commands used to manage users and per-user packages.

use std::time::Duration;

use camino::Utf8PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub mod parse;
pub mod runner;

pub use parse::{PackageEntry, UserEntry};
use runner::{describe, run_command, CommandOutput};

#[derive(Debug, Error)]
pub enum AdbError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("adb {command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("adb {command} exited with status {code}: {stderr}")]
    Exit {
        command: String,
        code: i32,
        stderr: String,
    },
    #[error("adb {command} was rejected: {message}")]
    Rejected {
        command: String,
        code: i32,
        message: String,
    },
    #[error("unexpected output from adb {command}: {output}")]
    Parse { command: String, output: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AdbError {
    /// Negative status code in the style of the platform's user manager.
    pub fn status(&self) -> i32 {
        match self {
            AdbError::Exit { code, .. } | AdbError::Rejected { code, .. } if *code > 0 => -*code,
            _ => -1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdbClient {
    program: Utf8PathBuf,
    serial: Option<String>,
    timeout: Duration,
    user_timeout: Duration,
}

impl Default for AdbClient {
    fn default() -> Self {
        Self::new("adb")
    }
}

impl AdbClient {
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            serial: None,
            timeout: Duration::from_secs(pspace_config::ADB_COMMAND_TIMEOUT_SECS),
            user_timeout: Duration::from_secs(pspace_config::ADB_USER_COMMAND_TIMEOUT_SECS),
        }
    }

    pub fn with_serial(mut self, serial: Option<String>) -> Self {
        self.serial = serial.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, user_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.user_timeout = user_timeout;
        self
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    fn args_for(&self, tail: &[&str]) -> Vec<String> {
        let mut args = Vec::with_capacity(tail.len() + 2);
        if let Some(serial) = &self.serial {
            args.push("-s".to_string());
            args.push(serial.clone());
        }
        args.extend(tail.iter().map(|s| s.to_string()));
        args
    }

    async fn exec(&self, args: Vec<String>, timeout: Duration) -> Result<CommandOutput, AdbError> {
        let output = run_command(self.program.as_str(), &args, timeout).await?;
        if let Some(message) = parse::find_pm_failure(&output.combined()) {
            return Err(AdbError::Rejected {
                command: describe(&args),
                code: output.exit_code.unwrap_or(1).max(1),
                message,
            });
        }
        if !output.success() {
            return Err(AdbError::Exit {
                command: describe(&args),
                code: output.exit_code.unwrap_or(-1),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    async fn shell(&self, cmd: &[&str], timeout: Duration) -> Result<CommandOutput, AdbError> {
        let mut tail = vec!["shell"];
        tail.extend_from_slice(cmd);
        self.exec(self.args_for(&tail), timeout).await
    }

    /// Attached devices in the `device` state. Ignores the configured serial.
    pub async fn devices(&self) -> Result<Vec<String>, AdbError> {
        let output = self
            .exec(vec!["devices".to_string()], self.timeout)
            .await?;
        Ok(parse::parse_devices_output(&output.stdout))
    }

    pub async fn list_users(&self) -> Result<Vec<UserEntry>, AdbError> {
        let output = self.shell(&["pm", "list", "users"], self.timeout).await?;
        let users = parse::parse_users_output(&output.stdout);
        debug!("parsed {} users", users.len());
        Ok(users)
    }

    pub async fn current_user(&self) -> Result<i32, AdbError> {
        let output = self.shell(&["am", "get-current-user"], self.timeout).await?;
        parse::parse_current_user_output(&output.stdout).ok_or_else(|| AdbError::Parse {
            command: "am get-current-user".into(),
            output: output.stdout.trim().to_string(),
        })
    }

    /// Creates a user and returns its id. `extra_args` go before the name,
    /// e.g. `--profileOf 0`.
    pub async fn create_user(&self, name: &str, extra_args: &[String]) -> Result<i32, AdbError> {
        let quoted = shlex::try_quote(name)
            .map_err(|_| AdbError::InvalidArgument(format!("unquotable user name {name:?}")))?;
        let mut cmd: Vec<&str> = vec!["pm", "create-user"];
        cmd.extend(extra_args.iter().map(String::as_str));
        cmd.push(&quoted);

        let output = self.shell(&cmd, self.user_timeout).await?;
        parse::parse_created_user_id(&output.combined()).ok_or_else(|| {
            warn!("pm create-user succeeded without reporting an id");
            AdbError::Parse {
                command: "pm create-user".into(),
                output: output.stdout.trim().to_string(),
            }
        })
    }

    pub async fn remove_user(&self, user_id: i32) -> Result<(), AdbError> {
        let id = user_id.to_string();
        self.shell(&["pm", "remove-user", &id], self.user_timeout)
            .await?;
        Ok(())
    }

    pub async fn list_packages(&self, user_id: i32) -> Result<Vec<PackageEntry>, AdbError> {
        let id = user_id.to_string();
        let output = self
            .shell(&["pm", "list", "packages", "-f", "--user", &id], self.timeout)
            .await?;
        Ok(parse::parse_package_list_output(&output.stdout))
    }

    /// Makes an already-installed package available to another user.
    pub async fn install_existing(&self, package: &str, user_id: i32) -> Result<(), AdbError> {
        validate_package_name(package)?;
        let id = user_id.to_string();
        self.shell(
            &["pm", "install-existing", "--user", &id, package],
            self.timeout,
        )
        .await?;
        Ok(())
    }

    pub async fn uninstall_for_user(&self, package: &str, user_id: i32) -> Result<(), AdbError> {
        validate_package_name(package)?;
        let id = user_id.to_string();
        self.shell(&["pm", "uninstall", "--user", &id, package], self.timeout)
            .await?;
        Ok(())
    }

    pub async fn max_users(&self) -> Result<usize, AdbError> {
        let output = self.shell(&["pm", "get-max-users"], self.timeout).await?;
        parse::parse_max_users_output(&output.stdout).ok_or_else(|| AdbError::Parse {
            command: "pm get-max-users".into(),
            output: output.stdout.trim().to_string(),
        })
    }
}

/// Package names reach the device shell unquoted.
fn validate_package_name(package: &str) -> Result<(), AdbError> {
    let valid = !package.is_empty()
        && package
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AdbError::InvalidArgument(format!(
            "invalid package name {package:?}"
        )))
    }
}

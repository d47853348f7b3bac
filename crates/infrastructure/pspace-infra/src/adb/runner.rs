use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use super::AdbError;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr; `pm` is inconsistent about which one it uses.
    pub fn combined(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Runs `program` with `args`, draining both pipes, and kills it when
/// `timeout` elapses.
pub async fn run_command(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<CommandOutput, AdbError> {
    debug!("exec {} {}", program, args.join(" "));

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| AdbError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(res) => res.map_err(|source| AdbError::Spawn {
            program: program.to_string(),
            source,
        })?,
        Err(_) => {
            return Err(AdbError::Timeout {
                command: describe(args),
                secs: timeout.as_secs(),
            })
        }
    };

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
    })
}

/// Short human-readable form of an adb invocation for error messages.
pub(crate) fn describe(args: &[String]) -> String {
    let skip = if args.first().map(String::as_str) == Some("-s") {
        2
    } else {
        0
    };
    args.iter()
        .skip(skip)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

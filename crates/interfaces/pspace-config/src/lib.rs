//! Central configuration constants for runtime limits and defaults.

/// Wait after a successful create before re-querying the space list (ms).
///
/// The system recreates its activities several times while the new user is
/// provisioned; five seconds covers that window on the reference devices.
pub const DEFAULT_CREATE_SETTLE_MS: u64 = 5_000;

/// Wait before issuing a remove so the backend is quiescent (ms).
pub const DEFAULT_DELETE_PRE_DELAY_MS: u64 = 500;

/// Wait after a successful remove before re-querying the space list (ms).
pub const DEFAULT_DELETE_SETTLE_MS: u64 = 2_000;

/// Upper bound accepted for any configured settle delay (ms).
pub const MAX_SETTLE_MS: u64 = 60_000;

/// Display name used when the backend reports a space without a name, and
/// as the prefix of suggested names for new spaces.
pub const DEFAULT_SPACE_NAME: &str = "Space";

/// Space count limit used when neither the device nor the settings provide one.
pub const DEFAULT_SPACE_LIMIT: usize = 3;

/// Capacity of the kernel's domain event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Default timeout for a single adb invocation (seconds).
pub const ADB_COMMAND_TIMEOUT_SECS: u64 = 10;

/// Timeout for `pm create-user` and `pm remove-user`, which can take a while (seconds).
pub const ADB_USER_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Default interval between external-change polls in the desktop UI (seconds).
/// Zero disables polling.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Clamp a configured settle delay into the accepted range.
pub fn clamp_settle_ms(v: u64) -> u64 {
    v.min(MAX_SETTLE_MS)
}

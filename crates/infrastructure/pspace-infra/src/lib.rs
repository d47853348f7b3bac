pub mod adb;

// Re-exports for convenience
pub use adb::{AdbClient, AdbError, PackageEntry, UserEntry};

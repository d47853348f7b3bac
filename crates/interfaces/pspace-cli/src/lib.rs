pub mod commands;
pub mod settings;

use clap::ValueEnum;

/// Settings addressable from `pspace-cli settings set`.
#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum SettingKey {
    AdbPath,
    Serial,
    DefaultName,
    SpaceLimit,
    CreateUserArgs,
    PollInterval,
    CreateSettleMs,
    DeletePreDelayMs,
    DeleteSettleMs,
}

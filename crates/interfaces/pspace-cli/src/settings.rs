use anyhow::{anyhow, Context, Result};
use pspace_app_core::{AppSettings, SettingsRepo};

use crate::SettingKey;

/// Applies per-invocation `--adb` / `--serial` flags on top of stored settings.
/// Saving writes through to the wrapped repository unchanged.
pub struct OverrideSettings<S> {
    inner: S,
    adb_path: Option<String>,
    serial: Option<String>,
}

impl<S: SettingsRepo> OverrideSettings<S> {
    pub fn new(inner: S, adb_path: Option<String>, serial: Option<String>) -> Self {
        Self {
            inner,
            adb_path,
            serial,
        }
    }
}

impl<S: SettingsRepo> SettingsRepo for OverrideSettings<S> {
    fn load(&self) -> Result<AppSettings> {
        let mut settings = self.inner.load()?;
        if let Some(adb) = &self.adb_path {
            settings.adb_path = adb.clone();
        }
        if let Some(serial) = &self.serial {
            settings.device_serial = Some(serial.clone());
        }
        Ok(settings)
    }

    fn save(&self, settings: &AppSettings) -> Result<()> {
        self.inner.save(settings)
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_ms(value: &str) -> Result<u64> {
    let ms: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a number of milliseconds"))?;
    if ms > pspace_config::MAX_SETTLE_MS {
        return Err(anyhow!(
            "Settle delays are limited to {} ms",
            pspace_config::MAX_SETTLE_MS
        ));
    }
    Ok(ms)
}

/// Updates one field of `settings` from its command-line text form.
/// `none` (or an empty value) clears optional fields.
pub fn apply_setting(settings: &mut AppSettings, key: SettingKey, value: &str) -> Result<()> {
    match key {
        SettingKey::AdbPath => {
            settings.adb_path = optional(value).ok_or_else(|| anyhow!("adb path cannot be empty"))?
        }
        SettingKey::Serial => settings.device_serial = optional(value),
        SettingKey::DefaultName => {
            settings.default_space_name = pspace_core::validate_space_name(value)?
        }
        SettingKey::SpaceLimit => {
            settings.space_limit = optional(value)
                .map(|v| v.parse::<usize>())
                .transpose()
                .with_context(|| format!("'{value}' is not a valid space limit"))?
        }
        SettingKey::CreateUserArgs => {
            shlex::split(value).ok_or_else(|| anyhow!("Unbalanced quotes in '{value}'"))?;
            settings.create_user_args = value.trim().to_string();
        }
        SettingKey::PollInterval => {
            settings.poll_interval_secs = value
                .trim()
                .parse()
                .with_context(|| format!("'{value}' is not a number of seconds"))?
        }
        SettingKey::CreateSettleMs => settings.timings.create_settle_ms = parse_ms(value)?,
        SettingKey::DeletePreDelayMs => settings.timings.delete_pre_delay_ms = parse_ms(value)?,
        SettingKey::DeleteSettleMs => settings.timings.delete_settle_ms = parse_ms(value)?,
    }
    Ok(())
}

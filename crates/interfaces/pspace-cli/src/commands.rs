use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pspace_app_core::{
    busy_label, suggested_name, AppCommand, AppKernel, AppListState, AppSettings, AppState,
    SettingsRepo, SpaceBackend,
};
use pspace_core::{AppEntry, Space, SpaceId};

use crate::settings::apply_setting;
use crate::SettingKey;

const POLL: Duration = Duration::from_millis(50);

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Ticks the kernel until `done` holds, showing the current operation.
/// Ctrl-C cancels in-flight work.
async fn wait_for<B, S>(
    kernel: &mut AppKernel<B, S>,
    idle_message: &str,
    done: impl Fn(&AppState) -> bool,
) -> Result<AppState>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    let pb = spinner();
    loop {
        kernel.tick();
        let state = kernel.state();
        if done(&state) {
            pb.finish_and_clear();
            return Ok(state);
        }
        pb.set_message(busy_label(&state.lifecycle).unwrap_or_else(|| idle_message.to_string()));

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                kernel.shutdown();
                pb.abandon_with_message("Interrupted");
                bail!("Interrupted");
            }
            _ = tokio::time::sleep(POLL) => {}
        }
    }
}

fn idle(state: &AppState) -> bool {
    !state.lifecycle.is_busy()
}

fn check_error(state: &AppState) -> Result<()> {
    match &state.last_error {
        Some(message) => Err(anyhow!(message.clone())),
        None => Ok(()),
    }
}

/// Runs the initial load and returns the settled state.
pub async fn load<B, S>(kernel: &mut AppKernel<B, S>) -> Result<AppState>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    kernel.dispatch(AppCommand::LoadInitialState)?;
    let state = wait_for(kernel, "Loading spaces...", idle).await?;
    check_error(&state)?;
    if state.snapshot.is_none() {
        bail!("Space list is unavailable");
    }
    Ok(state)
}

fn spaces_of(state: &AppState) -> Vec<Space> {
    state
        .snapshot
        .as_ref()
        .map(|s| s.spaces().to_vec())
        .unwrap_or_default()
}

pub async fn cmd_spaces_list<B, S>(kernel: &mut AppKernel<B, S>) -> Result<Vec<Space>>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    let state = load(kernel).await?;
    let spaces = spaces_of(&state);

    println!(
        ":: Spaces ({} of {})",
        spaces.len(),
        state.space_limit()
    );
    if spaces.is_empty() {
        println!("   No spaces. Create one with `pspace-cli spaces create`.");
    }
    for space in &spaces {
        println!("   {:>4}  {}", space.id, space.name);
    }
    Ok(spaces)
}

pub async fn cmd_space_create<B, S>(
    kernel: &mut AppKernel<B, S>,
    name: Option<String>,
) -> Result<Vec<Space>>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    let state = load(kernel).await?;
    let name = name.unwrap_or_else(|| suggested_name(&state));

    println!(":: Creating space \"{}\"", name.trim());
    kernel.dispatch(AppCommand::CreateSpace(name))?;
    let state = wait_for(kernel, "Creating space...", idle).await?;
    check_error(&state)?;

    let spaces = spaces_of(&state);
    println!("   Done. {} space(s) on the device.", spaces.len());
    Ok(spaces)
}

pub async fn cmd_space_remove<B, S>(kernel: &mut AppKernel<B, S>, id: SpaceId) -> Result<Vec<Space>>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    let state = load(kernel).await?;
    let name = state
        .snapshot
        .as_ref()
        .and_then(|s| s.find(id))
        .map(|s| s.name.clone())
        .ok_or_else(|| anyhow!("Space {id} not found"))?;

    println!(":: Removing space {id} ({name})");
    kernel.dispatch(AppCommand::DeleteSpace(id))?;
    let state = wait_for(kernel, "Removing space...", idle).await?;
    check_error(&state)?;

    let spaces = spaces_of(&state);
    println!("   Done. {} space(s) left.", spaces.len());
    Ok(spaces)
}

async fn load_app_list<B, S>(kernel: &mut AppKernel<B, S>, space: SpaceId) -> Result<Vec<AppEntry>>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    kernel.dispatch(AppCommand::LoadAppList { space, force: true })?;
    let state = wait_for(kernel, "Listing apps...", |s| {
        !matches!(s.app_lists.get(&space), Some(AppListState::Loading) | None)
    })
    .await?;
    match state.app_lists.get(&space) {
        Some(AppListState::Loaded { entries, .. }) => Ok(entries.clone()),
        Some(AppListState::Failed(message)) => Err(anyhow!(message.clone()))
            .with_context(|| format!("Failed to list apps for space {space}")),
        _ => bail!("App list for space {space} is unavailable"),
    }
}

pub async fn cmd_apps_list<B, S>(kernel: &mut AppKernel<B, S>, space: SpaceId) -> Result<Vec<AppEntry>>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    load(kernel).await?;
    let entries = load_app_list(kernel, space).await?;

    let enabled = entries.iter().filter(|e| e.enabled).count();
    println!(
        ":: Apps for space {space} ({enabled} of {} enabled)",
        entries.len()
    );
    for entry in &entries {
        let mark = if entry.enabled { "x" } else { " " };
        if entry.label == entry.package_name {
            println!("   [{mark}] {}", entry.package_name);
        } else {
            println!("   [{mark}] {} ({})", entry.label, entry.package_name);
        }
    }
    Ok(entries)
}

pub async fn cmd_apps_set<B, S>(
    kernel: &mut AppKernel<B, S>,
    space: SpaceId,
    package: String,
    enabled: bool,
) -> Result<AppEntry>
where
    B: SpaceBackend,
    S: SettingsRepo,
{
    load(kernel).await?;
    load_app_list(kernel, space).await?;

    let verb = if enabled { "Enabling" } else { "Disabling" };
    println!(":: {verb} {package} in space {space}");
    kernel.dispatch(AppCommand::SetPackageEnabled {
        space,
        package: package.clone(),
        enabled,
    })?;

    let pending = |s: &AppState| match s.app_lists.get(&space) {
        Some(AppListState::Loaded { pending, .. }) => pending.contains(&package),
        _ => false,
    };
    let state = wait_for(kernel, "Updating package...", |s| !pending(s)).await?;
    check_error(&state)?;

    let entry = match state.app_lists.get(&space) {
        Some(AppListState::Loaded { entries, .. }) => {
            entries.iter().find(|e| e.package_name == package).cloned()
        }
        _ => None,
    }
    .ok_or_else(|| anyhow!("Package {package} disappeared from space {space}"))?;
    println!("   Done.");
    Ok(entry)
}

pub async fn cmd_devices(backend: &pspace_app_core::AdbSpaceBackend) -> Result<Vec<String>> {
    let devices = backend
        .devices()
        .await
        .context("Failed to list attached devices")?;
    if devices.is_empty() {
        println!(":: No devices attached");
    } else {
        println!(":: Attached devices");
        for serial in &devices {
            println!("   {serial}");
        }
    }
    Ok(devices)
}

pub fn cmd_settings_show(repo: &impl SettingsRepo) -> Result<AppSettings> {
    let settings = repo.load()?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(settings)
}

pub fn cmd_settings_set(
    repo: &impl SettingsRepo,
    key: SettingKey,
    value: &str,
) -> Result<AppSettings> {
    let mut settings = repo.load()?;
    apply_setting(&mut settings, key, value)?;
    repo.save(&settings).context("Failed to save settings")?;
    println!(":: Saved {key:?}");
    Ok(settings)
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use pspace_app_core::{AdbSpaceBackend, AppKernel, AppState, AppStore, FilePersistence, SettingsRepo};
use pspace_cli::settings::OverrideSettings;
use pspace_cli::{commands, SettingKey};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about = "Manage parallel spaces on an Android device over adb")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Device serial (overrides the saved setting)
    #[arg(short, long, global = true, env = "ANDROID_SERIAL")]
    serial: Option<String>,
    /// Path to the adb executable (overrides the saved setting)
    #[arg(long, global = true)]
    adb: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list and remove spaces
    Spaces {
        #[command(subcommand)]
        command: SpaceCommands,
    },
    /// Show and change which apps are available in a space
    Apps {
        #[command(subcommand)]
        command: AppCommands,
    },
    /// List attached devices
    Devices,
    /// Show or change saved settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SpaceCommands {
    List,
    Create {
        /// Display name; defaults to the next suggested name
        name: Option<String>,
    },
    #[command(alias = "rm")]
    Remove { id: i32 },
}

#[derive(Subcommand)]
enum AppCommands {
    List { space: i32 },
    Enable { space: i32, package: String },
    Disable { space: i32, package: String },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show,
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let settings = OverrideSettings::new(FilePersistence::new(), cli.adb, cli.serial);

    let new_kernel = |settings: OverrideSettings<FilePersistence>| {
        AppKernel::new(
            AppStore::new(AppState::default()),
            AdbSpaceBackend::default(),
            settings,
        )
    };

    match cli.command {
        Commands::Spaces { command } => {
            let mut kernel = new_kernel(settings);
            match command {
                SpaceCommands::List => {
                    commands::cmd_spaces_list(&mut kernel).await?;
                }
                SpaceCommands::Create { name } => {
                    commands::cmd_space_create(&mut kernel, name).await?;
                }
                SpaceCommands::Remove { id } => {
                    commands::cmd_space_remove(&mut kernel, id).await?;
                }
            }
        }
        Commands::Apps { command } => {
            let mut kernel = new_kernel(settings);
            match command {
                AppCommands::List { space } => {
                    commands::cmd_apps_list(&mut kernel, space).await?;
                }
                AppCommands::Enable { space, package } => {
                    commands::cmd_apps_set(&mut kernel, space, package, true).await?;
                }
                AppCommands::Disable { space, package } => {
                    commands::cmd_apps_set(&mut kernel, space, package, false).await?;
                }
            }
        }
        Commands::Devices => {
            let backend = AdbSpaceBackend::from_settings(&settings.load()?);
            commands::cmd_devices(&backend).await?;
        }
        Commands::Settings { command } => match command {
            SettingsCommands::Show => {
                commands::cmd_settings_show(&settings)?;
            }
            SettingsCommands::Set { key, value } => {
                commands::cmd_settings_set(&FilePersistence::new(), key, &value)?;
            }
        },
    }

    Ok(())
}

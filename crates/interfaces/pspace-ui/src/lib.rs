mod app;
mod components;
mod devices;
mod screens;
mod theme;
mod utils;

use pspace_app_core::{AdbSpaceBackend, AppKernel, AppState, AppStore, FilePersistence};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn run() -> eframe::Result<()> {
    setup_logging();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([820.0, 600.0])
            .with_min_inner_size([640.0, 460.0])
            .with_title("PARALLEL // SPACES"),
        ..Default::default()
    };

    eframe::run_native(
        "Parallel Spaces",
        options,
        Box::new(|cc| {
            theme::setup(&cc.egui_ctx);

            let mut kernel = AppKernel::new(
                AppStore::new(AppState::default()),
                AdbSpaceBackend::default(),
                FilePersistence::new(),
            );
            if let Err(e) = kernel.dispatch(pspace_app_core::AppCommand::LoadInitialState) {
                tracing::error!("Failed to start initial load: {e}");
            }

            Ok(Box::new(app::PspaceUiApp::new(kernel)))
        }),
    )
}

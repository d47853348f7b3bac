use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use pspace_app_core::{AdbSpaceBackend, AppSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Found(Vec<String>),
    Failed(String),
}

/// Lists attached devices off the UI thread.
pub struct DeviceScanner {
    tx: Sender<ScanState>,
    rx: Receiver<ScanState>,
    state: ScanState,
}

impl DeviceScanner {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            state: ScanState::Idle,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn start(&mut self, settings: &AppSettings) {
        if self.state == ScanState::Scanning {
            return;
        }
        self.state = ScanState::Scanning;

        let tx = self.tx.clone();
        let backend = AdbSpaceBackend::from_settings(settings);
        let spawned = thread::Builder::new()
            .name("pspace-device-scan".into())
            .spawn(move || {
                let result = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| format!("Failed to start runtime: {e}"))
                    .and_then(|rt| rt.block_on(backend.devices()).map_err(|e| e.to_string()));
                let state = match result {
                    Ok(devices) => ScanState::Found(devices),
                    Err(message) => {
                        tracing::warn!("Device scan failed: {message}");
                        ScanState::Failed(message)
                    }
                };
                let _ = tx.send(state);
            });
        if let Err(e) = spawned {
            self.state = ScanState::Failed(format!("Failed to spawn device scan: {e}"));
        }
    }

    /// Applies finished scans. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(state) = self.rx.try_recv() {
            changed |= state != self.state;
            self.state = state;
        }
        changed
    }
}

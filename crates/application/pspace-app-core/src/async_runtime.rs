use anyhow::{Context, Result};
use std::future::Future;
use std::sync::OnceLock;

static RUNTIME: OnceLock<std::result::Result<tokio::runtime::Runtime, String>> = OnceLock::new();

pub(crate) fn runtime() -> Result<&'static tokio::runtime::Runtime> {
    match RUNTIME.get_or_init(|| tokio::runtime::Runtime::new().map_err(|e| e.to_string())) {
        Ok(rt) => Ok(rt),
        Err(message) => Err(anyhow::anyhow!(message.clone())),
    }
}

/// Drives `fut` to completion on a named background thread.
pub(crate) fn spawn_worker<F>(name: &str, fut: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let rt = runtime()?;
    std::thread::Builder::new()
        .name(name.into())
        .spawn(move || rt.block_on(fut))
        .with_context(|| format!("Failed to spawn {name} worker thread"))?;
    Ok(())
}

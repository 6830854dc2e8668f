pub mod session;
pub mod status;
pub mod video;
pub mod webcams;

use std::sync::Arc;

use anyhow::{Context, Result};
use blurface_application::SessionUseCase;
use blurface_infrastructure::ClientConfig;
use blurface_interaction::{FileDownloadTrigger, HttpVideoApi};

/// Wires the HTTP client and the file download trigger into a use case.
pub fn build_usecase(config: &ClientConfig) -> Result<Arc<SessionUseCase>> {
    let api = HttpVideoApi::from_config(config).context("Failed to create HTTP client")?;
    let downloads = FileDownloadTrigger::new(config.download_dir());

    Ok(Arc::new(SessionUseCase::new(
        Arc::new(api),
        Arc::new(downloads),
    )))
}

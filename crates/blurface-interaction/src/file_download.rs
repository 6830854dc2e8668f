//! Saves processed videos into a local directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use blurface_core::api::{DownloadRequest, DownloadTrigger};
use blurface_core::error::{ApiError, ApiResult};
use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;

/// Streams a download URL to `<dir>/<file_name>`.
#[derive(Clone)]
pub struct FileDownloadTrigger {
    client: Client,
    dir: PathBuf,
}

impl FileDownloadTrigger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadTrigger for FileDownloadTrigger {
    async fn trigger(&self, request: &DownloadRequest) -> ApiResult<()> {
        let target = self.dir.join(&request.file_name);
        tracing::info!("[Download] {} -> {:?}", request.url, target);

        let response = self
            .client
            .get(&request.url)
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
            ));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ApiError::transport(format!("Failed to create {:?}: {}", self.dir, e)))?;
        let mut file = tokio::fs::File::create(&target)
            .await
            .map_err(|e| ApiError::transport(format!("Failed to create {:?}: {}", target, e)))?;

        let mut written = 0usize;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ApiError::transport(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ApiError::transport(format!("Failed to write {:?}: {}", target, e)))?;
            written += chunk.len();
        }
        file.flush()
            .await
            .map_err(|e| ApiError::transport(format!("Failed to write {:?}: {}", target, e)))?;

        tracing::info!("[Download] Saved {} bytes to {:?}", written, target);
        Ok(())
    }
}

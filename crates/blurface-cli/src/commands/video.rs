use std::path::Path;

use anyhow::{Context, Result};
use blurface_application::SessionUseCase;
use blurface_core::api::{UploadFile, UploadedVideo};
use blurface_core::media::VideoInfo;

pub async fn info(usecase: &SessionUseCase, path: &str) -> Result<()> {
    let info = usecase.load_video_info(path).await?;
    print_info(&info);
    Ok(())
}

pub async fn upload(usecase: &SessionUseCase, file: &Path) -> Result<()> {
    let uploaded = upload_file(usecase, file).await?;

    println!("Uploaded to: {}", uploaded.file_path);
    if let Some(info) = &uploaded.video_info {
        print_info(info);
    }
    Ok(())
}

/// Reads `file` and sends it to the service.
pub async fn upload_file(usecase: &SessionUseCase, file: &Path) -> Result<UploadedVideo> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{:?} has no file name", file))?;

    let uploaded = usecase
        .upload_video(UploadFile {
            file_name,
            content_type: None,
            content,
        })
        .await?;
    Ok(uploaded)
}

fn print_info(info: &VideoInfo) {
    println!("File:       {}", info.filename);
    if let (Some(width), Some(height)) = (info.width, info.height) {
        println!("Resolution: {}x{}", width, height);
    }
    if let Some(fps) = info.fps {
        println!("FPS:        {:.2}", fps);
    }
    if let Some(frame_count) = info.frame_count {
        println!("Frames:     {}", frame_count);
    }
    if let Some(duration) = &info.duration_str {
        println!("Duration:   {}", duration);
    }
    if let Some(format) = &info.format {
        println!("Format:     {}", format);
    }
}

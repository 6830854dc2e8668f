use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use blurface_application::{DetectionPoller, SessionUseCase};
use blurface_core::session::SourceDescriptor;
use blurface_core::settings::{
    BlurMethod, BlurSettingsUpdate, DetectionSettingsUpdate, DisplaySettingsUpdate, FaceSelection,
};
use clap::{ArgGroup, Args};
use tokio_util::sync::CancellationToken;

use super::video::upload_file;

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["webcam", "file", "upload"])))]
pub struct RunArgs {
    /// Webcam device id
    #[arg(long)]
    webcam: Option<u32>,

    /// Video file path as seen by the service
    #[arg(long)]
    file: Option<String>,

    /// Local video file to upload and process
    #[arg(long)]
    upload: Option<PathBuf>,

    /// Blur method: gaussian, pixelate or solid
    #[arg(long)]
    method: Option<BlurMethod>,

    /// Blur intensity
    #[arg(long)]
    intensity: Option<u32>,

    /// Only blur these face indices (comma separated)
    #[arg(long, value_delimiter = ',')]
    faces: Vec<u32>,

    /// Minimum detector confidence, between 0 and 1
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Detector model: 0 short range, 1 full range
    #[arg(long)]
    model: Option<u8>,

    /// Do not draw detection boxes on the stream
    #[arg(long)]
    no_detections: bool,

    /// Stream the unblurred picture
    #[arg(long)]
    no_blur: bool,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration: Option<u64>,

    /// Save one processed frame to this JPEG file before closing
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Download the processed video before closing
    #[arg(long)]
    download: bool,
}

impl RunArgs {
    fn blur_update(&self) -> BlurSettingsUpdate {
        let mut update = BlurSettingsUpdate::new();
        if let Some(method) = self.method {
            update = update.with_method(method);
        }
        if let Some(intensity) = self.intensity {
            update = update.with_intensity(intensity);
        }
        if !self.faces.is_empty() {
            update = update.with_selected_faces(FaceSelection::only(self.faces.iter().copied()));
        }
        update
    }

    fn detection_update(&self) -> Option<DetectionSettingsUpdate> {
        if self.min_confidence.is_none() && self.model.is_none() {
            return None;
        }
        let mut update = DetectionSettingsUpdate::new();
        if let Some(min_confidence) = self.min_confidence {
            update = update.with_min_confidence(min_confidence);
        }
        if let Some(model) = self.model {
            update = update.with_model_selection(model);
        }
        Some(update)
    }
}

/// Opens a session for the requested source and keeps it running until
/// Ctrl-C or `--duration`. The session is closed however the run ends.
pub async fn run(usecase: Arc<SessionUseCase>, poll_interval: Duration, args: RunArgs) -> Result<()> {
    let source = resolve_source(&usecase, &args).await?;
    let session_id = usecase.create_session(source).await?;
    println!("Session: {}", session_id);

    let outcome = drive(&usecase, poll_interval, &args).await;
    usecase.shutdown().await;

    if let Some(error) = usecase.store().error() {
        tracing::warn!("{}", error);
    }
    outcome
}

async fn resolve_source(usecase: &SessionUseCase, args: &RunArgs) -> Result<SourceDescriptor> {
    if let Some(device_id) = args.webcam {
        usecase.load_webcams().await;
        return Ok(SourceDescriptor::webcam(device_id));
    }

    if let Some(local) = &args.upload {
        let uploaded = upload_file(usecase, local).await?;
        return Ok(SourceDescriptor::file(uploaded.file_path));
    }

    let file_path = args.file.clone().context("No source given")?;
    usecase.load_video_info(&file_path).await?;
    Ok(SourceDescriptor::file(file_path))
}

async fn drive(usecase: &Arc<SessionUseCase>, poll_interval: Duration, args: &RunArgs) -> Result<()> {
    usecase.settings().update_blur_settings(args.blur_update()).await?;
    if let Some(detection) = args.detection_update() {
        usecase.settings().update_detection_settings(detection).await?;
    }
    usecase.settings().update_display_settings(
        DisplaySettingsUpdate::new()
            .with_draw_detections(!args.no_detections)
            .with_apply_blur(!args.no_blur),
    );

    println!("Source: {}", usecase.views().current_source());
    if let Some(url) = usecase.views().stream_url() {
        println!("Stream: {}", url);
    }

    let cancel = CancellationToken::new();
    let poller = DetectionPoller::spawn(usecase.clone(), poll_interval, cancel.clone());
    let mut report = tokio::time::interval(Duration::from_secs(1));

    let deadline = async {
        match args.duration {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                println!();
                break;
            }
            _ = report.tick() => {
                let detections = usecase.store().read(|state| state.detections.clone());
                println!(
                    "frame {:>6}  faces {}",
                    detections.frame_id,
                    detections.face_count()
                );
            }
        }
    }

    cancel.cancel();
    if let Err(e) = poller.await {
        tracing::warn!("Detection poller ended abnormally: {}", e);
    }

    if let Some(path) = &args.snapshot {
        if let Some(frame) = usecase.capture_frame().await? {
            tokio::fs::write(path, &frame.jpeg)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Snapshot: {:?} ({} faces)", path, frame.detections.face_count());
        }
    }

    if args.download {
        if let Some(request) = usecase.download_video().await? {
            println!("Downloaded: {}", request.file_name);
        }
    }

    Ok(())
}

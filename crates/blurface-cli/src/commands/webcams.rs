use anyhow::{Result, bail};
use blurface_application::SessionUseCase;

pub async fn list(usecase: &SessionUseCase) -> Result<()> {
    usecase.load_webcams().await;
    if let Some(error) = usecase.store().error() {
        bail!(error);
    }

    let webcams = usecase.store().read(|state| state.webcams.clone());
    if webcams.is_empty() {
        println!("No webcam available");
        return Ok(());
    }

    for webcam in webcams {
        println!(
            "[{}] {} ({}x{} @ {:.0} fps)",
            webcam.device_id, webcam.name, webcam.width, webcam.height, webcam.fps
        );
    }

    Ok(())
}

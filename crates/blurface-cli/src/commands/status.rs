use anyhow::{Context, Result};
use blurface_application::SessionUseCase;

pub async fn show(usecase: &SessionUseCase) -> Result<()> {
    let status = usecase
        .status()
        .await
        .with_context(|| format!("Service at {} is not reachable", usecase.endpoints().base_url()))?;

    println!("Service: {}", usecase.endpoints().base_url());
    println!("Status:  {}", status.status);
    println!("Version: {}", status.version);

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use blurface_infrastructure::{ClientConfig, ConfigService};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::session::RunArgs;

#[derive(Parser)]
#[command(name = "blurface")]
#[command(about = "Blurface CLI - drive a remote face-blurring video session", long_about = None)]
struct Cli {
    /// Root URL of the processing service (overrides config and environment)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG is used otherwise
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the processing service is reachable
    Status,
    /// List the webcams known to the service
    Webcams,
    /// Video files on the service
    Video {
        #[command(subcommand)]
        action: VideoAction,
    },
    /// Open a session, stream detections, then close it
    Run(RunArgs),
}

#[derive(Subcommand)]
enum VideoAction {
    /// Show metadata of a video file on the service
    Info {
        /// Path of the file as seen by the service
        path: String,
    },
    /// Upload a local video file
    Upload {
        /// Local file to upload
        file: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };

    let mut config = service.load().context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    tracing::debug!("Using configuration: {:?}", config);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let usecase = commands::build_usecase(&config)?;

    match cli.command {
        Commands::Status => commands::status::show(&usecase).await?,
        Commands::Webcams => commands::webcams::list(&usecase).await?,
        Commands::Video { action } => match action {
            VideoAction::Info { path } => commands::video::info(&usecase, &path).await?,
            VideoAction::Upload { file } => commands::video::upload(&usecase, &file).await?,
        },
        Commands::Run(args) => {
            commands::session::run(usecase, config.detection_poll_interval(), args).await?
        }
    }

    Ok(())
}

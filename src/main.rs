use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod engines;
mod error;
mod extract;
mod outcome;
mod preprocessing;
mod recognizer;
mod reconcile;
mod scanner;
mod server;

use scanner::{LabelScanner, ScanReport};

#[derive(Parser, Debug)]
#[command(name = "label-ocr")]
#[command(about = "Read price, net quantity and origin from packaged-goods label photos")]
#[command(version)]
pub struct Args {
    /// Label image to scan
    pub image: Option<PathBuf>,

    /// Run as an HTTP server instead of scanning one image
    #[arg(long, env = "LABEL_OCR_SERVE")]
    pub serve: bool,

    /// Host address to bind to
    #[arg(long, env = "LABEL_OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "LABEL_OCR_PORT", default_value = "9292")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "LABEL_OCR_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Tesseract language(s), `+`-joined
    #[arg(long, env = "LABEL_OCR_TESSERACT_LANGUAGE", default_value = "eng+hin")]
    pub tesseract_language: String,

    /// Tesseract page segmentation mode
    #[arg(long, env = "LABEL_OCR_PAGE_SEG_MODE", default_value = "6")]
    pub page_seg_mode: u8,

    /// Path to tessdata directory (uses TESSDATA_PREFIX env var if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Apply adaptive contrast enhancement before binarization
    #[arg(long, env = "LABEL_OCR_ENHANCE_CONTRAST")]
    pub enhance_contrast: bool,

    /// Write the preprocessed image to this path
    #[arg(long, env = "LABEL_OCR_SAVE_PROCESSED")]
    pub save_processed: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // stdout is reserved for the JSON report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let serve = args.serve;
    let image = args.image.clone();
    let config = config::Config::from(args);

    if serve {
        tracing::info!("Starting label-ocr v{}", env!("CARGO_PKG_VERSION"));
        server::run(config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(image) = image else {
        eprintln!("Usage: label-ocr <IMAGE>");
        return Ok(ExitCode::FAILURE);
    };

    if !image.exists() {
        eprintln!("Error: Image file {} does not exist", image.display());
        return Ok(ExitCode::FAILURE);
    }

    let report = tokio::task::spawn_blocking(move || {
        let result = LabelScanner::from_config(&config).and_then(|scanner| {
            let scan = scanner.scan(&image);
            scanner.shutdown();
            scan
        });
        ScanReport::from(result)
    })
    .await?;

    println!("{}", serde_json::to_string(&report)?);
    Ok(ExitCode::SUCCESS)
}

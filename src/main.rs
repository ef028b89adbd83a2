use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod analysis;
mod commands;
mod config;
mod engine;
mod engines;
mod error;
mod files;
mod preprocessing;
mod preview;

#[derive(Parser, Debug)]
#[command(name = "ocr-enhance")]
#[command(about = "Image enhancement for better OCR results")]
#[command(version)]
pub struct Args {
    /// Tesseract executable used for OCR
    #[arg(long, global = true, env = "TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: String,

    /// Default language for OCR (e.g., "eng", "deu", "eng+fra")
    #[arg(long, global = true, env = "OCR_LANGUAGE", default_value = "eng")]
    pub language: String,

    /// Path to tessdata directory (uses TESSDATA_PREFIX env var if not set)
    #[arg(long, global = true, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for OCR text and JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::from(&args);
    tracing::debug!("ocr-enhance v{} ({:?})", env!("CARGO_PKG_VERSION"), config);

    let result = commands::run(args.command, &config);
    if let Err(err) = &result {
        if let Some(err) = err.downcast_ref::<error::Error>() {
            tracing::debug!("Failed with {}", err.code());
        }
    }
    result
}

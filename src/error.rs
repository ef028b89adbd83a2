use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to process image: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed enhancement parameters: {0}")]
    Params(#[from] serde_json::Error),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("OCR engine failed: {0}")]
    EngineFailed(String),
}

impl Error {
    /// Short machine-readable code, logged alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::Image(_) => "IMAGE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Params(_) => "PARAMS_ERROR",
            Error::EngineUnavailable(_) => "ENGINE_UNAVAILABLE",
            Error::EngineFailed(_) => "ENGINE_FAILED",
        }
    }
}

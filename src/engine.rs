use crate::error::Error;
use image::DynamicImage;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Output encodings an OCR engine can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text
    #[default]
    Text,
    /// hOCR (HTML with layout)
    Hocr,
    /// Searchable PDF
    Pdf,
    /// Tab separated word data
    Tsv,
    /// ALTO XML
    Alto,
    /// PAGE XML; passed through to the engine unverified
    Page,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Hocr => "hocr",
            Self::Pdf => "pdf",
            Self::Tsv => "tsv",
            Self::Alto => "alto",
            Self::Page => "page",
        }
    }

    /// Whether the engine returns raw bytes rather than a string
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Pdf | Self::Hocr)
    }

    /// File extension for saving output in this format
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Text | Self::Page => "txt",
            Self::Hocr => "hocr",
            Self::Pdf => "pdf",
            Self::Tsv => "tsv",
            Self::Alto => "xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "hocr" => Ok(Self::Hocr),
            "pdf" => Ok(Self::Pdf),
            "tsv" => Ok(Self::Tsv),
            "alto" => Ok(Self::Alto),
            "page" => Ok(Self::Page),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single OCR call
#[derive(Debug, Clone)]
pub struct OcrRequest {
    /// Language code(s), e.g. "eng" or "eng+deu"
    pub language: String,
    pub format: OutputFormat,
    /// Extra engine options, whitespace separated
    pub config: Option<String>,
}

impl Default for OcrRequest {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            format: OutputFormat::Text,
            config: None,
        }
    }
}

/// Engine output in its native encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutput {
    Text(String),
    Binary(Vec<u8>),
}

impl OcrOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    /// The output as text, if it is textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the output to a file, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.as_bytes())?;
        Ok(())
    }
}

/// Text extraction service backed by an OCR engine
pub trait OcrEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "tesseract")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the engine
    fn description(&self) -> &'static str;

    /// Extract text from an image in the requested format
    fn extract(&self, image: &DynamicImage, request: &OcrRequest) -> Result<OcrOutput, Error>;

    /// Languages the engine has data for
    fn supported_languages(&self) -> Result<Vec<String>, Error>;
}

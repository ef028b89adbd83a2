use crate::Args;

/// Runtime configuration shared by all commands
#[derive(Debug, Clone)]
pub struct Config {
    /// Tesseract executable (name on PATH or full path)
    pub tesseract_cmd: String,
    /// Default OCR language code (e.g. "eng", "deu+fra")
    pub language: String,
    /// Explicit tessdata directory, passed as --tessdata-dir
    pub tessdata_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            language: "eng".to_string(),
            tessdata_path: None,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            tesseract_cmd: args.tesseract_cmd.clone(),
            language: args.language.clone(),
            tessdata_path: args.tessdata_path.clone(),
        }
    }
}

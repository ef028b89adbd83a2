//! Tesseract engine implementation
//!
//! Runs the `tesseract` command-line tool once per request. The image is
//! written to a temporary PNG and the engine output is read back from the
//! file tesseract creates next to the requested output base.

use crate::config::Config;
use crate::engine::{OcrEngine, OcrOutput, OcrRequest, OutputFormat};
use crate::error::Error;
use image::DynamicImage;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Base name tesseract appends its extension to
const OUTPUT_BASE: &str = "output";

/// Tesseract OCR engine driven through its CLI
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    /// Executable name or path
    command: String,
    /// Directory passed as --tessdata-dir
    tessdata_path: Option<String>,
}

impl TesseractEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            tessdata_path: config.tessdata_path.clone(),
        }
    }

    /// Config files selecting the output renderer, and the extension of
    /// the file tesseract writes for them
    fn renderer(format: OutputFormat) -> (&'static [&'static str], &'static str) {
        match format {
            OutputFormat::Text => (&["txt"], "txt"),
            OutputFormat::Hocr => (&["hocr"], "hocr"),
            OutputFormat::Pdf => (&["pdf"], "pdf"),
            OutputFormat::Tsv => (&["tsv"], "tsv"),
            OutputFormat::Alto => (&["alto"], "xml"),
            // Unverified: hands the "page" config to tesseract and reads the text output
            OutputFormat::Page => (&["page", "txt"], "txt"),
        }
    }

    /// Full argument list for one tesseract run
    fn build_args(&self, input: &Path, output_base: &Path, request: &OcrRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.as_os_str().to_owned(),
            output_base.as_os_str().to_owned(),
            "-l".into(),
            request.language.as_str().into(),
        ];

        if let Some(dir) = &self.tessdata_path {
            args.push("--tessdata-dir".into());
            args.push(dir.into());
        }

        if let Some(config) = &request.config {
            args.extend(config.split_whitespace().map(OsString::from));
        }

        let (configs, _) = Self::renderer(request.format);
        args.extend(configs.iter().map(OsString::from));
        args
    }

    fn run(&self, args: &[OsString]) -> Result<std::process::Output, Error> {
        tracing::debug!("Running {} {:?}", self.command, args);
        Command::new(&self.command).args(args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::EngineUnavailable(format!(
                    "'{}' not found; install tesseract or pass --tesseract-cmd",
                    self.command
                ))
            } else {
                Error::EngineUnavailable(format!("Failed to start '{}': {}", self.command, e))
            }
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn description(&self) -> &'static str {
        "Tesseract OCR via the command-line tool"
    }

    fn extract(&self, image: &DynamicImage, request: &OcrRequest) -> Result<OcrOutput, Error> {
        let workdir = tempfile::Builder::new().prefix("ocr-enhance").tempdir()?;
        let input = workdir.path().join("input.png");
        image.save(&input)?;

        let output_base = workdir.path().join(OUTPUT_BASE);
        let args = self.build_args(&input, &output_base, request);

        tracing::debug!(
            "Processing image: {}x{}, language: {}, format: {}",
            image.width(),
            image.height(),
            request.language,
            request.format
        );

        let output = self.run(&args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::EngineFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let (_, extension) = Self::renderer(request.format);
        let result_path = output_file(&output_base, extension);
        let bytes = fs::read(&result_path).map_err(|e| {
            Error::EngineFailed(format!(
                "Expected output {} was not produced: {}",
                result_path.display(),
                e
            ))
        })?;

        tracing::debug!("Tesseract produced {} bytes of {}", bytes.len(), request.format);

        if request.format.is_binary() {
            Ok(OcrOutput::Binary(bytes))
        } else {
            Ok(OcrOutput::Text(String::from_utf8_lossy(&bytes).into_owned()))
        }
    }

    fn supported_languages(&self) -> Result<Vec<String>, Error> {
        let output = self.run(&[OsString::from("--list-langs")])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::EngineFailed(format!(
                "{} --list-langs failed: {}",
                self.command,
                stderr.trim()
            )));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn output_file(output_base: &Path, extension: &str) -> PathBuf {
    let mut name = output_base.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Parse `tesseract --list-langs` output; the first line is a header
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

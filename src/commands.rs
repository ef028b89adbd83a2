//! Command-line modes
//!
//! Each subcommand resolves its input images, enhances them and writes the
//! results. Progress is logged; data meant for piping goes to stdout.

use crate::analysis;
use crate::config::Config;
use crate::engine::{OcrOutput, OcrRequest, OutputFormat};
use crate::engines;
use crate::files::{self, ENHANCED_SUFFIX};
use crate::preprocessing::{EnhancementParams, Enhancer, Preset};
use crate::preview;
use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use image::DynamicImage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const COMPARISON_SUFFIX: &str = "_comparison";
const PARAMS_SUFFIX: &str = "_params";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze images and enhance them automatically
    Auto(AutoArgs),
    /// Enhance images with explicit parameters
    Manual(ManualArgs),
    /// Enhance every image in a directory
    Batch(BatchArgs),
    /// Render a grid of enhancement variations for one image
    Preview(PreviewArgs),
    /// Enhance an image with a text preset
    Preset(PresetArgs),
    /// Print image metrics and the parameters auto mode would use
    Analyze(AnalyzeArgs),
    /// Enhance an image and extract its text
    Ocr(OcrArgs),
    /// List the languages the OCR engine has data for
    Languages,
}

#[derive(clap::Args, Debug)]
pub struct AutoArgs {
    /// Input image or directory
    pub input_path: PathBuf,

    /// Output image path or directory
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Also write a side-by-side comparison image
    #[arg(short, long)]
    pub compare: bool,

    /// Write the chosen parameters next to each output as <name>_params.json
    #[arg(long)]
    pub save_params: bool,
}

/// Enhancement parameters as command-line flags
#[derive(clap::Args, Debug, Clone)]
pub struct ParamArgs {
    /// Brightness (0.5-1.5)
    #[arg(short, long, default_value_t = 1.0)]
    pub brightness: f32,

    /// Contrast (0.5-2.0)
    #[arg(long, default_value_t = 1.0)]
    pub contrast: f32,

    /// Sharpness (0.0-2.0)
    #[arg(short, long, default_value_t = 1.0)]
    pub sharpness: f32,

    /// Color (0.0-2.0)
    #[arg(long, default_value_t = 1.0)]
    pub color: f32,

    /// Apply denoising
    #[arg(long)]
    pub denoise: bool,

    /// Binarize image (black and white)
    #[arg(long)]
    pub binarize: bool,

    /// Binarization threshold (0-255)
    #[arg(long, default_value_t = 128)]
    pub binarize_threshold: u8,

    /// Deskew image
    #[arg(long)]
    pub deskew: bool,

    /// Resize factor (e.g. 1.5 for 150%)
    #[arg(long)]
    pub resize_factor: Option<f32>,
}

impl From<&ParamArgs> for EnhancementParams {
    fn from(args: &ParamArgs) -> Self {
        Self {
            brightness: args.brightness,
            contrast: args.contrast,
            sharpness: args.sharpness,
            color: args.color,
            denoise: args.denoise,
            binarize: args.binarize,
            binarize_threshold: args.binarize_threshold,
            deskew: args.deskew,
            resize_factor: args.resize_factor,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ManualArgs {
    /// Input image or directory
    pub input_path: PathBuf,

    /// Output image path or directory
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Also write a side-by-side comparison image
    #[arg(short, long)]
    pub compare: bool,

    #[command(flatten)]
    pub params: ParamArgs,

    /// JSON file with enhancement parameters (overrides the flags)
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Save the parameters in use to a JSON file
    #[arg(long)]
    pub save_params: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    #[default]
    Auto,
    Manual,
}

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Directory containing images
    pub input_dir: PathBuf,

    /// Directory for enhanced images
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Enhancement mode
    #[arg(long, value_enum, default_value_t = BatchMode::Auto)]
    pub mode: BatchMode,

    /// JSON file with enhancement parameters (manual mode)
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Also write comparisons into <output_dir>/comparisons
    #[arg(short, long)]
    pub compare: bool,
}

#[derive(clap::Args, Debug)]
pub struct PreviewArgs {
    /// Input image
    pub input_path: PathBuf,

    /// Output image path
    #[arg(short, long)]
    pub output_path: PathBuf,

    /// Render a single preview of these parameters instead of the grid
    #[arg(long)]
    pub params_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PresetArgs {
    /// Input image
    pub input_path: PathBuf,

    /// Output image path (default: <name>_preset<id>.<ext> next to the input)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Preset name or id: 0=mixed, 1=document, 2=text, 3=receipt
    #[arg(short, long, default_value = "0")]
    pub preset: String,

    /// Also write a side-by-side comparison image
    #[arg(short, long)]
    pub compare: bool,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Input image
    pub input_path: PathBuf,
}

/// How to prepare an image before OCR
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnhanceMode {
    /// Run OCR on the image as loaded
    #[default]
    None,
    /// Analyze the image and pick parameters
    Auto,
    /// Use the preset selected with --preset
    Preset,
}

#[derive(clap::Args, Debug)]
pub struct OcrArgs {
    /// Input image
    pub input_path: PathBuf,

    /// Output format: text, hocr, pdf, tsv, alto or page
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// OCR language (defaults to --language)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Write OCR output here instead of stdout
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Enhancement to apply before OCR
    #[arg(long, value_enum, default_value_t = EnhanceMode::None)]
    pub enhance: EnhanceMode,

    /// Preset name or id used with --enhance preset
    #[arg(long, default_value = "0")]
    pub preset: String,

    /// JSON file with enhancement parameters (takes precedence over --enhance)
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Extra options passed to the OCR engine, e.g. "--psm 6"
    #[arg(long)]
    pub config: Option<String>,

    /// Also save the enhanced image that was sent to the engine
    #[arg(long)]
    pub save_enhanced: Option<PathBuf>,
}

/// Dispatch a parsed command
pub fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Auto(args) => auto_mode(&args),
        Command::Manual(args) => manual_mode(&args),
        Command::Batch(args) => batch_mode(&args),
        Command::Preview(args) => preview_mode(&args),
        Command::Preset(args) => preset_mode(&args),
        Command::Analyze(args) => analyze_mode(&args),
        Command::Ocr(args) => ocr_mode(&args, config),
        Command::Languages => languages_mode(config),
    }
}

fn auto_mode(args: &AutoArgs) -> anyhow::Result<()> {
    let paths = image_paths(&args.input_path, args.recursive)?;

    for path in &paths {
        tracing::info!("Processing: {}", path.display());
        let original = files::load_image(path)?;
        let result = analysis::auto_enhance_image(&original)?;
        tracing::debug!("Metrics for {}: {:?}", path.display(), result.metrics);

        let output = files::output_path(path, args.output_path.as_deref(), ENHANCED_SUFFIX);
        save_enhanced(&original, &result.image, &output, args.compare)?;

        if args.save_params {
            let params_path = files::sibling_path(&output, PARAMS_SUFFIX, "json");
            result.params.save(&params_path)?;
            tracing::info!("Saved parameters: {}", params_path.display());
        }
    }

    Ok(())
}

fn manual_mode(args: &ManualArgs) -> anyhow::Result<()> {
    let params = match &args.params_file {
        Some(path) => {
            let params = EnhancementParams::load(path)
                .with_context(|| format!("Error loading parameters from {}", path.display()))?;
            tracing::info!("Loaded parameters from: {}", path.display());
            params
        }
        None => EnhancementParams::from(&args.params),
    };

    if let Some(path) = &args.save_params {
        params
            .save(path)
            .with_context(|| format!("Error saving parameters to {}", path.display()))?;
        tracing::info!("Saved parameters to: {}", path.display());
    }

    let paths = image_paths(&args.input_path, args.recursive)?;
    let enhancer = Enhancer::new(params);

    for path in &paths {
        tracing::info!("Processing: {}", path.display());
        let original = files::load_image(path)?;
        let enhanced = enhancer.enhance(&original)?;

        let output = files::output_path(path, args.output_path.as_deref(), ENHANCED_SUFFIX);
        save_enhanced(&original, &enhanced, &output, args.compare)?;
    }

    Ok(())
}

fn batch_mode(args: &BatchArgs) -> anyhow::Result<()> {
    let paths = image_paths(&args.input_dir, args.recursive)?;
    if paths.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let outputs = match args.mode {
        BatchMode::Auto => analysis::batch_auto_enhance(&paths, &args.output_dir)?,
        BatchMode::Manual => {
            let params = match &args.params_file {
                Some(path) => EnhancementParams::load(path).with_context(|| {
                    format!("Error loading parameters from {}", path.display())
                })?,
                None => EnhancementParams::default(),
            };
            let enhancer = Enhancer::new(params);

            let mut outputs = Vec::with_capacity(paths.len());
            for path in &paths {
                tracing::info!("Processing: {}", path.display());
                let enhanced = enhancer.enhance(&files::load_image(path)?)?;
                let output = files::output_path(path, Some(&args.output_dir), ENHANCED_SUFFIX);
                files::save_image(&enhanced, &output)?;
                outputs.push(output);
            }
            outputs
        }
    };

    tracing::info!("Enhanced {} images in {:?} mode", outputs.len(), args.mode);

    if args.compare {
        let comparison_dir = args.output_dir.join("comparisons");
        for (i, (input, output)) in paths.iter().zip(&outputs).enumerate() {
            tracing::info!("Creating comparison {}/{}", i + 1, paths.len());
            let original = files::load_image(input)?;
            let enhanced = files::load_image(output)?;
            let comparison = preview::comparison_image(&original, &enhanced);

            let name = files::suffixed_file_name(&output.with_extension("png"), COMPARISON_SUFFIX);
            let comparison_path = comparison_dir.join(name);
            files::save_image(&DynamicImage::ImageRgb8(comparison), &comparison_path)?;
        }
    }

    Ok(())
}

fn preview_mode(args: &PreviewArgs) -> anyhow::Result<()> {
    if !args.input_path.is_file() {
        bail!(crate::error::Error::NotFound(args.input_path.clone()));
    }

    let original = files::load_image(&args.input_path)?;

    if let Some(path) = &args.params_file {
        let params = EnhancementParams::load(path)
            .with_context(|| format!("Error loading parameters from {}", path.display()))?;
        let (max_width, max_height) = preview::PREVIEW_SIZE;
        let thumb = Enhancer::new(params).preview(&original, max_width, max_height)?;
        files::save_image(&thumb, &args.output_path)?;
        tracing::info!("Saved preview: {}", args.output_path.display());
        return Ok(());
    }

    let grid = preview::preview_grid(&original, &preview::default_variations())?;
    files::save_image(&DynamicImage::ImageRgb8(grid), &args.output_path)?;
    tracing::info!("Saved preview grid: {}", args.output_path.display());
    Ok(())
}

fn preset_mode(args: &PresetArgs) -> anyhow::Result<()> {
    let preset = Preset::from_arg_or_default(&args.preset);
    tracing::info!("Applying preset {}: {}", preset.as_str(), preset.display_name());

    let original = files::load_image(&args.input_path)?;
    let enhanced = Enhancer::new(preset.params()).enhance(&original)?;

    let output = match &args.output_path {
        Some(path) => path.clone(),
        None => files::output_path(&args.input_path, None, &format!("_preset{}", preset.id())),
    };
    save_enhanced(&original, &enhanced, &output, args.compare)
}

#[derive(Serialize)]
struct AnalysisReport {
    metrics: analysis::ImageMetrics,
    suggested_params: EnhancementParams,
}

fn analyze_mode(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let metrics = analysis::analyze_path(&args.input_path)?;
    let suggested_params = analysis::determine_optimal_params(&metrics);
    let report = AnalysisReport {
        metrics,
        suggested_params,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn ocr_mode(args: &OcrArgs, config: &Config) -> anyhow::Result<()> {
    let format: OutputFormat = args.format.parse()?;
    let request = OcrRequest {
        language: args.lang.clone().unwrap_or_else(|| config.language.clone()),
        format,
        config: args.config.clone(),
    };

    let original = files::load_image(&args.input_path)?;
    let image = prepare_for_ocr(&original, args)?;

    if let Some(path) = &args.save_enhanced {
        files::save_image(&image, path)?;
        tracing::info!("Saved enhanced image: {}", path.display());
    }

    let engine = engines::from_config(config);
    tracing::info!(
        "Running {} OCR ({}, {})",
        engine.name(),
        request.language,
        request.format
    );
    let output = engine
        .extract(&image, &request)
        .with_context(|| format!("OCR failed for {}", args.input_path.display()))?;

    write_ocr_output(&output, format, &args.input_path, args.output_path.as_deref())
}

fn languages_mode(config: &Config) -> anyhow::Result<()> {
    let engine = engines::from_config(config);
    for language in engine.supported_languages()? {
        println!("{}", language);
    }
    Ok(())
}

/// Apply the enhancement requested for OCR
fn prepare_for_ocr(original: &DynamicImage, args: &OcrArgs) -> anyhow::Result<DynamicImage> {
    if let Some(path) = &args.params_file {
        let params = EnhancementParams::load(path)
            .with_context(|| format!("Error loading parameters from {}", path.display()))?;
        return Ok(Enhancer::new(params).enhance(original)?);
    }

    let image = match args.enhance {
        EnhanceMode::None => original.clone(),
        EnhanceMode::Auto => analysis::auto_enhance_image(original)?.image,
        EnhanceMode::Preset => {
            let preset = Preset::from_arg_or_default(&args.preset);
            Enhancer::new(preset.params()).enhance(original)?
        }
    };
    Ok(image)
}

/// Text goes to stdout unless an output path is given; binary output
/// without a path is written next to the input.
fn write_ocr_output(
    output: &OcrOutput,
    format: OutputFormat,
    input: &Path,
    output_path: Option<&Path>,
) -> anyhow::Result<()> {
    if output.is_empty() {
        tracing::warn!("OCR produced no output for {}", input.display());
    }

    let target = match (output_path, output.as_text()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(text)) => {
            print!("{}", text);
            return Ok(());
        }
        (None, None) => input.with_extension(format.file_extension()),
    };

    if same_file(&target, input) {
        bail!(
            "Refusing to overwrite the input image with OCR output: {}",
            input.display()
        );
    }

    output.write_to(&target)?;
    tracing::info!("Saved {} output ({} bytes): {}", format, output.len(), target.display());
    Ok(())
}

/// Whether two paths name the same file; existing files are compared by
/// their canonical paths
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Resolve the input into image paths, logging when nothing matches
fn image_paths(input: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    let paths = files::collect_image_paths(input, recursive)?;
    if paths.is_empty() {
        tracing::warn!("No supported image files found.");
    } else {
        tracing::info!("Found {} image(s).", paths.len());
    }
    Ok(paths)
}

/// Save an enhanced image and optionally its comparison with the original
fn save_enhanced(
    original: &DynamicImage,
    enhanced: &DynamicImage,
    output: &Path,
    compare: bool,
) -> anyhow::Result<()> {
    files::save_image(enhanced, output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    tracing::info!("Saved: {}", output.display());

    if compare {
        let comparison = preview::comparison_image(original, enhanced);
        let comparison_path = files::sibling_path(output, COMPARISON_SUFFIX, "png");
        files::save_image(&DynamicImage::ImageRgb8(comparison), &comparison_path)?;
        tracing::info!("Saved comparison: {}", comparison_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn write_page(path: &Path) {
        RgbImage::from_fn(48, 32, |x, y| {
            if y % 8 < 2 && x % 6 < 3 {
                Rgb([30, 30, 30])
            } else {
                Rgb([180, 180, 180])
            }
        })
        .save(path)
        .unwrap();
    }

    fn ocr_args(input: &Path) -> OcrArgs {
        OcrArgs {
            input_path: input.to_path_buf(),
            format: "text".to_string(),
            lang: None,
            output_path: None,
            enhance: EnhanceMode::None,
            preset: "0".to_string(),
            params_file: None,
            config: None,
            save_enhanced: None,
        }
    }

    #[test]
    fn test_param_args_convert() {
        let args = ParamArgs {
            brightness: 1.2,
            contrast: 1.0,
            sharpness: 0.5,
            color: 1.0,
            denoise: true,
            binarize: false,
            binarize_threshold: 128,
            deskew: false,
            resize_factor: Some(2.0),
        };
        let params = EnhancementParams::from(&args);
        assert_eq!(params.brightness, 1.2);
        assert_eq!(params.sharpness, 0.5);
        assert!(params.denoise);
        assert_eq!(params.resize_factor, Some(2.0));
    }

    #[test]
    fn test_manual_mode_with_params_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.png");
        write_page(&input);

        let params_path = dir.path().join("params.json");
        EnhancementParams {
            binarize: true,
            binarize_threshold: 100,
            ..Default::default()
        }
        .save(&params_path)
        .unwrap();

        let args = ManualArgs {
            input_path: input.clone(),
            output_path: None,
            recursive: false,
            compare: true,
            params: ParamArgs {
                brightness: 1.0,
                contrast: 1.0,
                sharpness: 1.0,
                color: 1.0,
                denoise: false,
                binarize: false,
                binarize_threshold: 128,
                deskew: false,
                resize_factor: None,
            },
            params_file: Some(params_path),
            save_params: None,
        };
        manual_mode(&args).unwrap();

        let output = dir.path().join("page_enhanced.png");
        let enhanced = image::open(&output).unwrap().to_luma8();
        assert!(enhanced.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(dir.path().join("page_enhanced_comparison.png").exists());
    }

    #[test]
    fn test_preset_default_output_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("receipt.png");
        write_page(&input);

        preset_mode(&PresetArgs {
            input_path: input,
            output_path: None,
            preset: "receipt".to_string(),
            compare: false,
        })
        .unwrap();

        assert!(dir.path().join("receipt_preset3.png").exists());
    }

    #[test]
    fn test_prepare_for_ocr_modes() {
        let original = DynamicImage::ImageLuma8(GrayImage::from_pixel(20, 20, Luma([40])));
        let mut args = ocr_args(Path::new("unused.png"));

        let untouched = prepare_for_ocr(&original, &args).unwrap();
        assert_eq!(untouched.as_bytes(), original.as_bytes());

        args.enhance = EnhanceMode::Auto;
        let auto = prepare_for_ocr(&original, &args).unwrap();
        let before = analysis::analyze_image(&original).brightness;
        let after = analysis::analyze_image(&auto).brightness;
        assert!(after > before);
    }

    #[test]
    fn test_ocr_rejects_unknown_format_before_loading() {
        let mut args = ocr_args(Path::new("/missing/scan.png"));
        args.format = "docx".to_string();

        let err = ocr_mode(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported output format: docx"));
    }

    #[test]
    fn test_binary_output_written_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.png");

        write_ocr_output(
            &OcrOutput::Binary(b"%PDF-1.5".to_vec()),
            OutputFormat::Pdf,
            &input,
            None,
        )
        .unwrap();

        assert_eq!(fs::read(dir.path().join("scan.pdf")).unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn test_output_never_overwrites_input_through_another_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.png");
        fs::write(&input, b"image bytes").unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir(&nested).unwrap();

        for target in [dir.path().join(".").join("scan.png"), nested.join("..").join("scan.png")] {
            let result = write_ocr_output(
                &OcrOutput::Binary(b"%PDF".to_vec()),
                OutputFormat::Pdf,
                &input,
                Some(&target),
            );
            assert!(result.is_err(), "{} overwrote the input", target.display());
        }
        assert_eq!(fs::read(&input).unwrap(), b"image bytes");
    }

    #[test]
    fn test_output_never_overwrites_input() {
        let input = Path::new("/tmp/scan.png");
        let result = write_ocr_output(
            &OcrOutput::Text("text".to_string()),
            OutputFormat::Text,
            input,
            Some(input),
        );
        assert!(result.is_err());
    }
}

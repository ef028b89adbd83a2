use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable knobs applied to an image before OCR.
///
/// Multipliers are 1.0 and flags are false by default, which means
/// "leave the image alone". The serialized form is a flat JSON object
/// whose keys match the field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhancementParams {
    /// Brightness multiplier (typical range 0.5 to 1.5)
    pub brightness: f32,
    /// Contrast multiplier (typical range 0.5 to 2.0)
    pub contrast: f32,
    /// Sharpness multiplier (typical range 0.0 to 2.0)
    pub sharpness: f32,
    /// Color saturation multiplier (typical range 0.0 to 2.0)
    pub color: f32,
    pub denoise: bool,
    pub binarize: bool,
    /// Pixels below this value become black when binarizing
    pub binarize_threshold: u8,
    pub deskew: bool,
    /// Scale factor applied before any other step
    pub resize_factor: Option<f32>,
}

impl Default for EnhancementParams {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            color: 1.0,
            denoise: false,
            binarize: false,
            binarize_threshold: 128,
            deskew: false,
            resize_factor: None,
        }
    }
}

impl EnhancementParams {
    /// True when applying these parameters leaves an image unchanged
    pub fn is_neutral(&self) -> bool {
        self.resize().is_none()
            && self.brightness == 1.0
            && self.contrast == 1.0
            && self.color == 1.0
            && self.sharpness == 1.0
            && !self.denoise
            && !self.deskew
            && !self.binarize
    }

    /// Effective resize factor; non-positive factors are ignored
    pub fn resize(&self) -> Option<f32> {
        self.resize_factor.filter(|f| *f > 0.0)
    }

    /// Human-readable list of the adjustments that differ from neutral
    pub fn describe_changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if let Some(factor) = self.resize() {
            changes.push(format!("Resize({:.2}x)", factor));
        }
        if self.brightness != 1.0 {
            changes.push(format!("Brightness={:.2}", self.brightness));
        }
        if self.contrast != 1.0 {
            changes.push(format!("Contrast={:.2}", self.contrast));
        }
        if self.color != 1.0 {
            changes.push(format!("Color={:.2}", self.color));
        }
        if self.sharpness != 1.0 {
            changes.push(format!("Sharpness={:.2}", self.sharpness));
        }
        if self.denoise {
            changes.push("Denoise".to_string());
        }
        if self.deskew {
            changes.push("Deskew".to_string());
        }
        if self.binarize {
            changes.push(format!("Binarize(t={})", self.binarize_threshold));
        }
        changes
    }

    /// Read parameters from a JSON file
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write parameters to a JSON file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::debug!("Saved enhancement parameters to {}", path.display());
        Ok(())
    }
}

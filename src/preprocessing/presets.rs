use super::params::EnhancementParams;
use crate::error::Error;
use std::str::FromStr;

/// Predefined enhancement settings for common kinds of text images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Photos or pages mixing text with other content
    #[default]
    MixedContent,
    /// Scanned text documents
    Document,
    /// Pure text, maximum contrast
    TextOnly,
    /// Receipts and faded thermal paper
    Receipt,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::MixedContent,
        Preset::Document,
        Preset::TextOnly,
        Preset::Receipt,
    ];

    /// Look up a preset by numeric id (0-3)
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Resolve a command-line preset argument (name or id). Anything
    /// unrecognized falls back to the mixed content preset.
    pub fn from_arg_or_default(arg: &str) -> Self {
        arg.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown preset '{}', using {}",
                arg,
                Self::default().display_name()
            );
            Self::default()
        })
    }

    pub fn id(&self) -> u8 {
        match self {
            Self::MixedContent => 0,
            Self::Document => 1,
            Self::TextOnly => 2,
            Self::Receipt => 3,
        }
    }

    /// Short name, as accepted by `parse`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MixedContent => "mixed",
            Self::Document => "document",
            Self::TextOnly => "text",
            Self::Receipt => "receipt",
        }
    }

    /// Display name shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MixedContent => "Mixed Content with Text Enhancement",
            Self::Document => "Document Text Enhancement",
            Self::TextOnly => "Pure Text Enhancement",
            Self::Receipt => "Receipt Text Enhancement",
        }
    }

    /// Enhancement parameters for this preset.
    /// None of the presets binarize or deskew.
    pub fn params(&self) -> EnhancementParams {
        let (brightness, contrast, sharpness, color) = match self {
            // Keep non-text content intact while clearing up text
            Self::MixedContent => (1.05, 1.2, 1.3, 0.9),
            Self::Document => (1.05, 1.15, 1.2, 0.8),
            Self::TextOnly => (1.0, 1.3, 1.2, 0.7),
            // Receipts are effectively grayscale
            Self::Receipt => (1.1, 1.4, 1.2, 0.0),
        };

        EnhancementParams {
            brightness,
            contrast,
            sharpness,
            color,
            denoise: true,
            ..Default::default()
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    /// Parse from a short name, alias or numeric id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let preset = match name.as_str() {
            "mixed" | "mixed-content" => Some(Self::MixedContent),
            "document" | "doc" => Some(Self::Document),
            "text" | "text-only" => Some(Self::TextOnly),
            "receipt" => Some(Self::Receipt),
            other => other.parse().ok().and_then(Self::from_id),
        };
        preset.ok_or_else(|| Error::InvalidArgument(format!("Unknown preset: {}", s)))
    }
}

use crate::constants::{
    GRAPHICS_QUALITY, LOSSLESS_OPAQUE_QUALITY, MAX_QUALITY, MIN_QUALITY, PHOTOS_QUALITY,
    THUMBNAILS_QUALITY,
};
use crate::error::InputValidationError;
use crate::normalize::NormalizedImage;
use std::fmt;
use std::str::FromStr;

/// How the recompressor encodes. Exactly one mode is active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionPolicy {
    Lossy { quality: u8 },
    /// Lossless for images with alpha; opaque images fall back to
    /// [`LOSSLESS_OPAQUE_QUALITY`].
    Lossless,
}

/// Encoder settings chosen for one concrete image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    Lossy(u8),
    Lossless,
}

impl fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeMode::Lossy(quality) => write!(f, "lossy q{}", quality),
            EncodeMode::Lossless => write!(f, "lossless"),
        }
    }
}

impl CompressionPolicy {
    pub fn lossy(quality: u8) -> Result<Self, InputValidationError> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(InputValidationError::InvalidChoice(quality.to_string()));
        }
        Ok(CompressionPolicy::Lossy { quality })
    }

    /// Quality used whenever this policy encodes lossy.
    pub fn quality(&self) -> u8 {
        match self {
            CompressionPolicy::Lossy { quality } => *quality,
            CompressionPolicy::Lossless => LOSSLESS_OPAQUE_QUALITY,
        }
    }

    pub fn is_lossless(&self) -> bool {
        matches!(self, CompressionPolicy::Lossless)
    }

    /// Lossless is only ever applied to images that carry alpha.
    pub fn encode_mode_for(&self, image: &NormalizedImage) -> EncodeMode {
        match image {
            NormalizedImage::AlphaRgba(_) if self.is_lossless() => EncodeMode::Lossless,
            NormalizedImage::AlphaRgba(_) | NormalizedImage::OpaqueRgb(_) => {
                EncodeMode::Lossy(self.quality())
            }
        }
    }
}

impl fmt::Display for CompressionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionPolicy::Lossy { quality } => write!(f, "quality {}", quality),
            CompressionPolicy::Lossless => write!(f, "lossless (transparent images only)"),
        }
    }
}

/// The four named presets offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Photos,
    Graphics,
    Thumbnails,
    Lossless,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Photos,
        Preset::Graphics,
        Preset::Thumbnails,
        Preset::Lossless,
    ];

    pub fn policy(self) -> CompressionPolicy {
        match self {
            Preset::Photos => CompressionPolicy::Lossy {
                quality: PHOTOS_QUALITY,
            },
            Preset::Graphics => CompressionPolicy::Lossy {
                quality: GRAPHICS_QUALITY,
            },
            Preset::Thumbnails => CompressionPolicy::Lossy {
                quality: THUMBNAILS_QUALITY,
            },
            Preset::Lossless => CompressionPolicy::Lossless,
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Preset::Photos => "Photos (quality 85)",
            Preset::Graphics => "Graphics/Logos (quality 90)",
            Preset::Thumbnails => "Thumbnails (quality 75)",
            Preset::Lossless => "Lossless (for transparent images)",
        }
    }
}

/// Accepts the menu number or the preset name.
impl FromStr for Preset {
    type Err = InputValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "photos" | "photo" => Ok(Preset::Photos),
            "2" | "graphics" | "logos" => Ok(Preset::Graphics),
            "3" | "thumbnails" | "thumbs" => Ok(Preset::Thumbnails),
            "4" | "lossless" => Ok(Preset::Lossless),
            other => Err(InputValidationError::InvalidChoice(other.to_string())),
        }
    }
}

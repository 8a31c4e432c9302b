//! Responsive width variants written beside the source image.

use crate::constants::VARIANT_QUALITY;
use crate::encode::{encode_webp, write_atomic};
use crate::error::{CompressionError, Result};
use crate::inspect::{self, ImageAsset};
use crate::normalize::normalize;
use crate::policy::EncodeMode;
use crate::raster::SourceRaster;
use std::path::{Path, PathBuf};

/// One planned downscale of a source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub target_width: u32,
    pub computed_height: u32,
    pub output_path: PathBuf,
}

/// Floor of `target_width * height / width`, clamped to at least one row.
pub fn proportional_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    let scaled = target_width as u64 * height as u64 / width as u64;
    (scaled as u32).max(1)
}

/// `<stem>-<width>w.<ext>` in the source's directory.
pub fn variant_path(source: &Path, width: u32) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match source.extension() {
        Some(ext) => format!("{}-{}w.{}", stem, width, ext.to_string_lossy()),
        None => format!("{}-{}w", stem, width),
    };
    source.with_file_name(file_name)
}

/// Plans variants in caller order. Widths that would upscale (or equal the
/// source width) are dropped, as is width zero.
pub fn plan_variants(asset: &ImageAsset, target_widths: &[u32]) -> Vec<VariantSpec> {
    target_widths
        .iter()
        .copied()
        .filter(|&w| w > 0 && w < asset.width)
        .map(|w| VariantSpec {
            target_width: w,
            computed_height: proportional_height(asset.width, asset.height, w),
            output_path: variant_path(&asset.path, w),
        })
        .collect()
}

/// Writes one variant from an already decoded source.
pub fn write_variant(raster: &SourceRaster, spec: &VariantSpec) -> Result<u64> {
    if spec.target_width == 0 || spec.computed_height == 0 {
        return Err(CompressionError::InvalidDimensions(
            spec.target_width,
            spec.computed_height,
        ));
    }
    let resized = raster.resize(spec.target_width, spec.computed_height);
    // Transparency is re-evaluated on the resized pixels
    let normalized = normalize(resized);
    let bytes = encode_webp(&normalized, EncodeMode::Lossy(VARIANT_QUALITY))?;
    write_atomic(&spec.output_path, &bytes)
}

/// Generates every variant of `path` narrower than the source.
///
/// Returns the `(path, width)` pairs that were written, in request order.
/// A variant that fails is logged and skipped; the others still run.
pub fn generate(path: &Path, target_widths: &[u32]) -> Vec<(PathBuf, u32)> {
    if target_widths.is_empty() {
        return Vec::new();
    }

    let (asset, raster) = match inspect::open(path) {
        Ok(opened) => opened,
        Err(e) => {
            crate::error!("Error generating sizes for {:?}: {}", path, e);
            return Vec::new();
        }
    };

    let specs = plan_variants(&asset, target_widths);
    crate::verbose!(
        "{:?}: {}x{}, {} of {} widths below source width",
        path,
        asset.width,
        asset.height,
        specs.len(),
        target_widths.len()
    );

    let mut generated = Vec::with_capacity(specs.len());
    for spec in specs {
        match write_variant(&raster, &spec) {
            Ok(_) => generated.push((spec.output_path, spec.target_width)),
            Err(e) => {
                crate::error!(
                    "Error writing {}w variant {:?}: {}",
                    spec.target_width,
                    spec.output_path,
                    e
                );
            }
        }
    }
    generated
}

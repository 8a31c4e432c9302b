use crate::encode::{encode_webp, write_atomic};
use crate::error::Result;
use crate::inspect;
use crate::normalize::normalize;
use crate::policy::{CompressionPolicy, EncodeMode};
use crate::raster::ColorMode;
use crate::utils::calculate_compression_ratio;
use std::path::{Path, PathBuf};

/// What happened to one file that was recompressed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecompressReport {
    pub path: PathBuf,
    pub color_mode: ColorMode,
    pub mode: EncodeMode,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl RecompressReport {
    pub fn ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_size, self.compressed_size)
    }
}

/// Decodes, normalizes and re-encodes `path` in place.
///
/// The source is overwritten without a backup. The write itself goes
/// through a temp file, so a failure leaves the original intact.
pub fn try_recompress(path: &Path, policy: &CompressionPolicy) -> Result<RecompressReport> {
    let (asset, raster) = inspect::open(path)?;
    let normalized = normalize(raster);
    let mode = policy.encode_mode_for(&normalized);
    crate::verbose!(
        "{:?}: {} {}x{} -> {}",
        path,
        asset.color_mode.label(),
        asset.width,
        asset.height,
        mode
    );

    let bytes = encode_webp(&normalized, mode)?;
    drop(normalized);
    let compressed_size = write_atomic(path, &bytes)?;

    Ok(RecompressReport {
        path: asset.path,
        color_mode: asset.color_mode,
        mode,
        original_size: asset.byte_size,
        compressed_size,
    })
}

/// Per-file boundary: failures are logged and reported as `false`.
pub fn recompress(path: &Path, policy: &CompressionPolicy) -> bool {
    match try_recompress(path, policy) {
        Ok(_) => true,
        Err(e) => {
            crate::error!("Error compressing {:?}: {}", path, e);
            false
        }
    }
}

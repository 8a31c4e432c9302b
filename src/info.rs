use crate::constants::{LARGE_IMAGE_KB, VERY_LARGE_IMAGE_KB, VERY_LARGE_REPORT_LIMIT};
use crate::error::InspectionError;
use crate::inspect::{inspect, ImageAsset};
use crate::utils::format_file_size;
use std::path::{Path, PathBuf};

/// Size breakdown of the first `limit` candidates under a root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub limit: usize,
    pub found: usize,
    pub analyzed: usize,
    pub total_kb: f64,
    pub large: Vec<ImageAsset>,
    pub very_large: Vec<ImageAsset>,
    pub unreadable: Vec<PathBuf>,
}

/// Inspects at most `limit` paths and buckets them by file size.
///
/// `found` counts every path in the sequence, including the ones past the
/// limit, so the whole sequence is consumed.
pub fn analyze_images<I>(paths: I, limit: usize) -> AnalysisReport
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut report = AnalysisReport {
        limit,
        ..Default::default()
    };

    for path in paths {
        report.found += 1;
        if report.found > limit {
            continue;
        }
        match inspect(&path) {
            Ok(asset) => {
                report.analyzed += 1;
                report.total_kb += asset.size_kb();
                if asset.size_kb() > VERY_LARGE_IMAGE_KB {
                    report.very_large.push(asset);
                } else if asset.size_kb() > LARGE_IMAGE_KB {
                    report.large.push(asset);
                }
            }
            Err(e) => {
                crate::verbose!("Skipping {:?}: {}", path, e);
                report.unreadable.push(path);
            }
        }
    }
    report
}

impl AnalysisReport {
    pub fn print(&self) {
        crate::info!(
            "\nAnalyzing {} WebP images (first {} of {} found)...\n",
            self.found.min(self.limit),
            self.limit,
            self.found
        );
        crate::info!("Total size analyzed: {:.2} KB", self.total_kb);
        crate::info!("\nLarge images (>{}KB): {}", LARGE_IMAGE_KB, self.large.len());
        crate::info!(
            "Very large images (>{}KB): {}",
            VERY_LARGE_IMAGE_KB,
            self.very_large.len()
        );
        if !self.unreadable.is_empty() {
            crate::warn!("Unreadable images skipped: {}", self.unreadable.len());
        }

        if !self.very_large.is_empty() {
            crate::info!("\nVery large images (consider re-compression):");
            for asset in self.very_large.iter().take(VERY_LARGE_REPORT_LIMIT) {
                crate::info!(
                    "  - {}: {:.2} KB ({}x{})",
                    asset.path.display(),
                    asset.size_kb(),
                    asset.width,
                    asset.height
                );
            }
        }
    }
}

/// Prints the inspection snapshot of a single file.
pub fn print_asset_info(path: &Path) -> Result<ImageAsset, InspectionError> {
    let asset = inspect(path)?;

    crate::info!("📋 Basic Information:");
    crate::info!("  📁 File: {:?}", asset.path);
    crate::info!("  📏 Dimensions: {}x{} pixels", asset.width, asset.height);
    crate::info!(
        "  📦 File size: {} bytes ({})",
        asset.byte_size,
        format_file_size(asset.byte_size)
    );
    crate::info!("  🎨 Color mode: {}", asset.color_mode.label());
    crate::info!(
        "  🎭 Transparency: {}",
        if asset.has_transparency() { "yes" } else { "no" }
    );

    crate::info!("\n💡 Suggestion:");
    crate::info!("  {}", recommendation(&asset));
    Ok(asset)
}

pub fn recommendation(asset: &ImageAsset) -> &'static str {
    let kb = asset.size_kb();
    if kb > VERY_LARGE_IMAGE_KB {
        "Very large: recompress and generate responsive variants"
    } else if kb > LARGE_IMAGE_KB {
        "Large: consider recompression (photos 85, graphics 90)"
    } else if asset.has_transparency() {
        "Small transparent image: lossless keeps edges exact"
    } else {
        "Small: already within budget"
    }
}

//! The four user-facing actions, shared by the subcommands and the menu.
//! Policy and widths arrive fully resolved; nothing here prompts.

use crate::batch::{recompress_all, BatchConfig, BatchSummary, CancelToken};
use crate::constants::{ANALYZE_LIMIT, SUCCESS_PREFIX};
use crate::error::BatchError;
use crate::info::{analyze_images, AnalysisReport};
use crate::policy::CompressionPolicy;
use crate::utils::create_progress_spinner;
use crate::variants::generate;
use std::path::{Path, PathBuf};

pub fn run_analyze(config: &BatchConfig) -> Result<AnalysisReport, BatchError> {
    let report = analyze_images(config.walk()?, ANALYZE_LIMIT);
    report.print();
    Ok(report)
}

/// Number of candidates a recompression would touch. Walks the tree once
/// without keeping the paths.
pub fn count_candidates(config: &BatchConfig) -> Result<usize, BatchError> {
    Ok(config.walk()?.count())
}

pub fn run_recompress(
    config: &BatchConfig,
    policy: &CompressionPolicy,
    cancel: &CancelToken,
) -> Result<BatchSummary, BatchError> {
    let summary = recompress_all(config.walk()?, policy, config, cancel)?;
    crate::info!(
        "\n{} Completed! Compressed {} images",
        SUCCESS_PREFIX,
        summary.compressed
    );
    summary.print();
    Ok(summary)
}

pub fn run_responsive(path: &Path, widths: &[u32]) -> Vec<(PathBuf, u32)> {
    let spinner = create_progress_spinner("Generating responsive sizes...");
    let generated = generate(path, widths);
    spinner.finish_and_clear();

    crate::info!("\nGenerated {} sizes:", generated.len());
    for (variant, width) in &generated {
        crate::info!("  - {} ({}w)", variant.display(), width);
    }
    generated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Preset;
    use image::RgbImage;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_count_and_recompress() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        for name in ["a.webp", "sub/b.webp"] {
            RgbImage::from_pixel(16, 16, image::Rgb([5, 6, 7]))
                .save_with_format(root.join(name), image::ImageFormat::WebP)
                .unwrap();
        }
        fs::write(root.join("notes.txt"), b"x").unwrap();

        let config = BatchConfig::new(root).with_threads(Some(1));
        assert_eq!(count_candidates(&config).unwrap(), 2);

        let summary =
            run_recompress(&config, &Preset::Thumbnails.policy(), &CancelToken::new()).unwrap();
        assert_eq!(summary.compressed, 2);
        assert!(summary.failed.is_empty());
    }

    #[test]
    fn test_run_analyze_missing_root() {
        let config = BatchConfig::new("/no/such/root");
        assert!(matches!(
            run_analyze(&config),
            Err(BatchError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_run_responsive_narrow_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("small.webp");
        RgbImage::new(300, 300)
            .save_with_format(&path, image::ImageFormat::WebP)
            .unwrap();

        assert!(run_responsive(&path, &[400, 800]).is_empty());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}

use crate::constants::{WEBP_MAX_DIMENSION, WEBP_METHOD};
use crate::error::{CompressionError, Result};
use crate::normalize::NormalizedImage;
use crate::policy::EncodeMode;
use libwebp_sys::WebPConfig;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Encodes a normalized image as WebP at maximum compression effort.
pub fn encode_webp(image: &NormalizedImage, mode: EncodeMode) -> Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(CompressionError::InvalidDimensions(width, height));
    }

    let encoder = match image {
        NormalizedImage::OpaqueRgb(img) => webp::Encoder::from_rgb(img.as_raw(), width, height),
        NormalizedImage::AlphaRgba(img) => webp::Encoder::from_rgba(img.as_raw(), width, height),
    };

    let config = webp_config(mode)?;
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| CompressionError::WebPEncode(format!("{:?}", e)))?;
    Ok(memory.to_vec())
}

fn webp_config(mode: EncodeMode) -> Result<WebPConfig> {
    let mut config = WebPConfig::new()
        .map_err(|_| CompressionError::WebPEncode("libwebp version mismatch".to_string()))?;
    config.method = WEBP_METHOD;
    match mode {
        EncodeMode::Lossy(quality) => {
            config.lossless = 0;
            config.quality = quality as f32;
        }
        EncodeMode::Lossless => {
            config.lossless = 1;
            // In lossless mode quality is the effort knob
            config.quality = 100.0;
            config.exact = 1;
        }
    }
    Ok(config)
}

/// Replaces `path` with `bytes` through a temp file in the same directory,
/// so a failed write never leaves a truncated target behind.
///
/// Symlinks are followed and the file they point to is replaced. An
/// existing file keeps its permissions; a new one gets the process default.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64> {
    let target = resolve_target(path)?;
    let parent = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let existing = fs::metadata(&target).ok().filter(|meta| meta.is_file());

    // The temp file is removed on drop if anything below fails
    let mut tmp = temp_file_builder().tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    if let Some(meta) = existing {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| CompressionError::Persist {
        path: target.clone(),
        source: e.error,
    })?;

    Ok(bytes.len() as u64)
}

fn resolve_target(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e.into()),
    }
}

/// New outputs are created 0666 minus the umask, like `File::create`.
fn temp_file_builder() -> tempfile::Builder<'static, 'static> {
    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, ImageFormat, Rgba, RgbaImage, RgbImage};
    use tempfile::TempDir;

    fn gradient_rgba() -> RgbaImage {
        RgbaImage::from_fn(32, 32, |x, y| Rgba([x as u8 * 8, y as u8 * 8, 90, (x * 8) as u8]))
    }

    #[test]
    fn test_encode_lossy_rgb_is_webp() {
        let img = NormalizedImage::OpaqueRgb(RgbImage::from_pixel(16, 16, image::Rgb([200, 10, 10])));
        let bytes = encode_webp(&img, EncodeMode::Lossy(80)).unwrap();

        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
    }

    #[test]
    fn test_encode_lossless_rgba_is_exact() {
        let source = gradient_rgba();
        let img = NormalizedImage::AlphaRgba(source.clone());
        let bytes = encode_webp(&img, EncodeMode::Lossless).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, source);
    }

    #[test]
    fn test_encode_lossy_rgba_keeps_alpha() {
        let source = gradient_rgba();
        let img = NormalizedImage::AlphaRgba(source.clone());
        let bytes = encode_webp(&img, EncodeMode::Lossy(75)).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
        let decoded = decoded.to_rgba8();
        for (a, b) in decoded.pixels().zip(source.pixels()) {
            assert_eq!(a.0[3], b.0[3]);
        }
    }

    #[test]
    fn test_encode_empty_image_rejected() {
        let img = NormalizedImage::OpaqueRgb(RgbImage::new(0, 0));
        assert!(matches!(
            encode_webp(&img, EncodeMode::Lossy(80)),
            Err(CompressionError::InvalidDimensions(0, 0))
        ));
    }

    #[test]
    fn test_webp_config_modes() {
        let lossy = webp_config(EncodeMode::Lossy(75)).unwrap();
        assert_eq!(lossy.lossless, 0);
        assert_eq!(lossy.quality, 75.0);
        assert_eq!(lossy.method, 6);

        let lossless = webp_config(EncodeMode::Lossless).unwrap();
        assert_eq!(lossless.lossless, 1);
        assert_eq!(lossless.method, 6);
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.webp");
        fs::write(&path, b"old contents that are longer").unwrap();

        let written = write_atomic(&path, b"new").unwrap();
        assert_eq!(written, 3);
        assert_eq!(fs::read(&path).unwrap(), b"new");
        // Only the target remains, no stray temp files
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_encode_rejects_oversized_output() {
        let img = NormalizedImage::OpaqueRgb(RgbImage::new(WEBP_MAX_DIMENSION + 1, 1));
        assert!(matches!(
            encode_webp(&img, EncodeMode::Lossy(80)),
            Err(CompressionError::InvalidDimensions(16384, 1))
        ));
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.webp");
        fs::write(&path, b"old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(mode_of(&path), 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_gets_default_mode() {
        let temp_dir = TempDir::new().unwrap();
        let reference = temp_dir.path().join("reference");
        fs::File::create(&reference).unwrap();
        let path = temp_dir.path().join("fresh-400w.webp");

        write_atomic(&path, b"new").unwrap();
        assert_eq!(mode_of(&path), mode_of(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_follows_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("real.webp");
        let link = temp_dir.path().join("link.webp");
        fs::write(&real, b"old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_atomic(&link, b"new").unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read(&real).unwrap(), b"new");
    }
}

use crate::error::InspectionError;
use crate::raster::{ColorMode, IndexedImage, SourceRaster};
use image::ImageFormat;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Snapshot of a source image taken at inspection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
    pub color_mode: ColorMode,
}

impl ImageAsset {
    pub fn has_transparency(&self) -> bool {
        self.color_mode.has_transparency()
    }

    pub fn size_kb(&self) -> f64 {
        self.byte_size as f64 / 1024.0
    }
}

/// Reads the metadata of an image without keeping its pixels around.
pub fn inspect(path: &Path) -> Result<ImageAsset, InspectionError> {
    open(path).map(|(asset, _)| asset)
}

/// Decodes `path` once and returns both the snapshot and the raster.
///
/// # Errors
/// * `InspectionError::FileNotFound` if nothing exists at `path`
/// * decode errors for corrupt or unsupported files
pub fn open(path: &Path) -> Result<(ImageAsset, SourceRaster), InspectionError> {
    if !path.exists() {
        return Err(InspectionError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let byte_size = bytes.len() as u64;
    let raster = decode(&bytes)?;

    let (width, height) = raster.dimensions();
    let asset = ImageAsset {
        path: path.to_path_buf(),
        width,
        height,
        byte_size,
        color_mode: raster.color_mode(),
    };
    Ok((asset, raster))
}

/// Decodes by content, not by extension: variants keep the source extension
/// even though they are always WebP.
pub fn decode(bytes: &[u8]) -> Result<SourceRaster, InspectionError> {
    if matches!(image::guess_format(bytes), Ok(ImageFormat::Png)) {
        if let Some(indexed) = decode_indexed_png(bytes)? {
            return Ok(SourceRaster::Paletted(indexed));
        }
    }
    Ok(SourceRaster::from_dynamic(image::load_from_memory(bytes)?))
}

/// Returns `None` when the PNG is not palette based.
fn decode_indexed_png(bytes: &[u8]) -> Result<Option<IndexedImage>, InspectionError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info()?;

    let info = reader.info();
    if info.color_type != png::ColorType::Indexed {
        return Ok(None);
    }
    let width = info.width;
    let height = info.height;
    let depth = info.bit_depth as u8;
    let palette: Vec<[u8; 3]> = info
        .palette
        .as_deref()
        .ok_or_else(|| InspectionError::UnsupportedPalette("missing PLTE chunk".to_string()))?
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let alpha = info.trns.as_deref().map(<[u8]>::to_vec).unwrap_or_default();

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let indices = unpack_indices(&buf, frame.line_size, width, height, depth)?;

    Ok(Some(IndexedImage {
        width,
        height,
        indices,
        palette,
        alpha,
    }))
}

/// Unpacks 1/2/4/8-bit rows into one index byte per pixel.
fn unpack_indices(
    buf: &[u8],
    line_size: usize,
    width: u32,
    height: u32,
    depth: u8,
) -> Result<Vec<u8>, InspectionError> {
    if !matches!(depth, 1 | 2 | 4 | 8) {
        return Err(InspectionError::UnsupportedPalette(format!(
            "{}-bit indices",
            depth
        )));
    }

    let per_byte = 8 / depth as usize;
    let mask = ((1u16 << depth) - 1) as u8;
    let mut indices = Vec::with_capacity(width as usize * height as usize);

    for row in buf.chunks(line_size).take(height as usize) {
        for x in 0..width as usize {
            let byte = row.get(x / per_byte).copied().unwrap_or(0);
            let shift = 8 - depth as usize * (x % per_byte + 1);
            indices.push((byte >> shift) & mask);
        }
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_indexed_png(path: &Path, depth: png::BitDepth, width: u32, data: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(file, width, 1);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(depth);
        encoder.set_palette(vec![0, 0, 0, 255, 255, 255, 10, 20, 30, 40, 50, 60]);
        encoder.set_trns(vec![0, 128]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    #[test]
    fn test_inspect_not_found() {
        let result = inspect(Path::new("nonexistent.webp"));
        assert!(matches!(result, Err(InspectionError::FileNotFound(_))));
    }

    #[test]
    fn test_inspect_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.webp");
        File::create(&path)
            .unwrap()
            .write_all(b"fake webp data")
            .unwrap();

        assert!(matches!(inspect(&path), Err(InspectionError::Decode(_))));
    }

    #[test]
    fn test_inspect_rgb_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.png");
        RgbImage::new(64, 32).save(&path).unwrap();

        let asset = inspect(&path).unwrap();
        assert_eq!((asset.width, asset.height), (64, 32));
        assert_eq!(asset.color_mode, ColorMode::Opaque);
        assert!(!asset.has_transparency());
        assert_eq!(asset.byte_size, fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_inspect_luma_alpha_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mask.png");
        DynamicImage::new_luma_a8(8, 8).save(&path).unwrap();

        let asset = inspect(&path).unwrap();
        assert_eq!(asset.color_mode, ColorMode::LuminanceAlpha);
        assert!(asset.has_transparency());
    }

    #[test]
    fn test_open_indexed_png_keeps_palette() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.png");
        write_indexed_png(&path, png::BitDepth::Eight, 4, &[0, 1, 2, 3]);

        let (asset, raster) = open(&path).unwrap();
        assert_eq!(asset.color_mode, ColorMode::AlphaPaletted);
        match raster {
            SourceRaster::Paletted(img) => {
                assert_eq!(img.indices, vec![0, 1, 2, 3]);
                assert_eq!(img.palette.len(), 4);
                assert_eq!(img.alpha, vec![0, 128]);
            }
            _ => panic!("expected paletted raster"),
        }
    }

    #[test]
    fn test_open_packed_indexed_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("packed.png");
        // 2-bit indices 3,2,1,0 packed into one byte
        write_indexed_png(&path, png::BitDepth::Two, 4, &[0b11_10_01_00]);

        let (_, raster) = open(&path).unwrap();
        match raster {
            SourceRaster::Paletted(img) => assert_eq!(img.indices, vec![3, 2, 1, 0]),
            _ => panic!("expected paletted raster"),
        }
    }

    #[test]
    fn test_unpack_indices_one_bit() {
        let indices = unpack_indices(&[0b1010_0000], 1, 4, 1, 1).unwrap();
        assert_eq!(indices, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_unpack_indices_rejects_sixteen_bit() {
        assert!(matches!(
            unpack_indices(&[0, 0], 2, 1, 1, 16),
            Err(InspectionError::UnsupportedPalette(_))
        ));
    }
}

#![allow(dead_code)]

use image::{DynamicImage, GrayAlphaImage, ImageFormat, ImageReader, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::path::Path;

pub fn write_rgb_webp(path: &Path, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([180, 120, 60]))
        .save_with_format(path, ImageFormat::WebP)
        .unwrap();
}

/// Alpha ramps across x, so every image has real transparency.
pub fn write_rgba_webp(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| {
        Rgba([20, 200, 90, ((x * 255) / width.max(1)) as u8])
    })
    .save_with_format(path, ImageFormat::WebP)
    .unwrap();
}

/// 8-bit indexed PNG with a tRNS chunk.
pub fn write_indexed_png(
    path: &Path,
    width: u32,
    height: u32,
    palette: &[[u8; 3]],
    trns: &[u8],
    indices: &[u8],
) {
    let file = File::create(path).unwrap();
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette.iter().flatten().copied().collect::<Vec<u8>>());
    encoder.set_trns(trns.to_vec());
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(indices).unwrap();
}

pub fn write_luma_alpha_png(path: &Path, width: u32, pixels: &[(u8, u8)]) {
    let height = pixels.len() as u32 / width;
    let img = GrayAlphaImage::from_fn(width, height, |x, y| {
        let (l, a) = pixels[(y * width + x) as usize];
        LumaA([l, a])
    });
    DynamicImage::ImageLumaA8(img)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Decodes by content; outputs keep their source extension.
pub fn decode_any(path: &Path) -> DynamicImage {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .decode()
        .unwrap()
}

pub fn is_webp(path: &Path) -> bool {
    let bytes = std::fs::read(path).unwrap();
    matches!(image::guess_format(&bytes), Ok(ImageFormat::WebP))
}

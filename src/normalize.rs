//! Maps any decoded raster to one of the two forms the encoder accepts.

use crate::raster::SourceRaster;
use image::{DynamicImage, GrayAlphaImage, GenericImageView, RgbImage, RgbaImage};

/// Encode-ready pixels. Nothing else reaches the WebP encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedImage {
    OpaqueRgb(RgbImage),
    AlphaRgba(RgbaImage),
}

impl NormalizedImage {
    pub fn has_alpha(&self) -> bool {
        matches!(self, NormalizedImage::AlphaRgba(_))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            NormalizedImage::OpaqueRgb(img) => img.dimensions(),
            NormalizedImage::AlphaRgba(img) => img.dimensions(),
        }
    }
}

pub fn normalize(raster: SourceRaster) -> NormalizedImage {
    match raster {
        SourceRaster::Paletted(img) => NormalizedImage::AlphaRgba(img.to_rgba()),
        SourceRaster::LuminanceAlpha(img) => composite_luma_alpha(&img),
        SourceRaster::Alpha(img) => NormalizedImage::AlphaRgba(img.into_rgba8()),
        SourceRaster::Opaque(img) => NormalizedImage::OpaqueRgb(img.into_rgb8()),
    }
}

/// Flattens luminance over white using the image's own alpha as the mask,
/// then puts the untouched alpha back.
fn composite_luma_alpha(img: &DynamicImage) -> NormalizedImage {
    let la: GrayAlphaImage = img.to_luma_alpha8();
    let (width, height) = img.dimensions();
    let mut out = RgbaImage::new(width, height);

    for (dst, src) in out.pixels_mut().zip(la.pixels()) {
        let [luma, alpha] = src.0;
        let value = blend_over_white(luma, alpha);
        dst.0 = [value, value, value, alpha];
    }
    NormalizedImage::AlphaRgba(out)
}

/// `round((value * mask + 255 * (255 - mask)) / 255)`
fn blend_over_white(value: u8, mask: u8) -> u8 {
    let value = value as u32;
    let mask = mask as u32;
    let blended = value * mask + 255 * (255 - mask);
    ((blended + 127) / 255) as u8
}

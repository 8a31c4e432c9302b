//! Decoded pixel data as it came out of the source file.
//!
//! The `image` crate expands palettes while decoding, which loses the
//! information needed to classify an asset as paletted. Indexed PNGs are
//! therefore kept as [`IndexedImage`] until normalization.
//!
//! Full-color images are tagged once, at decode time, by [`SourceRaster::from_dynamic`].

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, RgbaImage};

/// Color mode of a decoded source, one tag per normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// No alpha channel: L, RGB, CMYK-like and 16/32-bit variants.
    Opaque,
    /// An explicit alpha channel other than luminance+alpha.
    AlphaDirect,
    /// Palette indices, with or without transparent entries.
    AlphaPaletted,
    /// Grayscale with alpha.
    LuminanceAlpha,
}

impl ColorMode {
    pub fn has_transparency(self) -> bool {
        !matches!(self, ColorMode::Opaque)
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::Opaque => "opaque",
            ColorMode::AlphaDirect => "alpha",
            ColorMode::AlphaPaletted => "paletted",
            ColorMode::LuminanceAlpha => "luminance+alpha",
        }
    }
}

/// An 8-bit indexed raster: one palette index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Vec<[u8; 3]>,
    /// Alpha per palette entry. Entries past the end are fully opaque.
    pub alpha: Vec<u8>,
}

impl IndexedImage {
    /// Expands every index into an explicit RGBA pixel.
    ///
    /// Indices that point past the palette decode as opaque black.
    pub fn to_rgba(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width, self.height);
        for (pixel, &index) in out.pixels_mut().zip(self.indices.iter()) {
            let i = index as usize;
            let [r, g, b] = self.palette.get(i).copied().unwrap_or([0, 0, 0]);
            let a = self.alpha.get(i).copied().unwrap_or(u8::MAX);
            pixel.0 = [r, g, b, a];
        }
        out
    }

    /// Resizes the index plane. Interpolating between palette indices is
    /// meaningless, so this always samples nearest-neighbour.
    pub fn resize(&self, width: u32, height: u32) -> IndexedImage {
        let plane = GrayImage::from_raw(self.width, self.height, self.indices.clone())
            .unwrap_or_else(|| GrayImage::new(self.width, self.height));
        let resized = imageops::resize(&plane, width, height, FilterType::Nearest);
        IndexedImage {
            width,
            height,
            indices: resized.into_raw(),
            palette: self.palette.clone(),
            alpha: self.alpha.clone(),
        }
    }
}

/// Decoded pixels, tagged with their color mode. Each variant has exactly
/// one normalization rule.
#[derive(Debug, Clone)]
pub enum SourceRaster {
    Paletted(IndexedImage),
    LuminanceAlpha(DynamicImage),
    Alpha(DynamicImage),
    Opaque(DynamicImage),
}

impl SourceRaster {
    /// Tags an image decoded by the `image` crate by its color type.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if matches!(
            img,
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_)
        ) {
            SourceRaster::LuminanceAlpha(img)
        } else if img.color().has_alpha() {
            SourceRaster::Alpha(img)
        } else {
            SourceRaster::Opaque(img)
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SourceRaster::Paletted(img) => (img.width, img.height),
            SourceRaster::LuminanceAlpha(img)
            | SourceRaster::Alpha(img)
            | SourceRaster::Opaque(img) => img.dimensions(),
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        match self {
            SourceRaster::Paletted(_) => ColorMode::AlphaPaletted,
            SourceRaster::LuminanceAlpha(_) => ColorMode::LuminanceAlpha,
            SourceRaster::Alpha(_) => ColorMode::AlphaDirect,
            SourceRaster::Opaque(_) => ColorMode::Opaque,
        }
    }

    /// High-quality downscale. The color mode never changes.
    pub fn resize(&self, width: u32, height: u32) -> SourceRaster {
        let lanczos = |img: &DynamicImage| img.resize_exact(width, height, FilterType::Lanczos3);
        match self {
            SourceRaster::Paletted(img) => SourceRaster::Paletted(img.resize(width, height)),
            SourceRaster::LuminanceAlpha(img) => SourceRaster::LuminanceAlpha(lanczos(img)),
            SourceRaster::Alpha(img) => SourceRaster::Alpha(lanczos(img)),
            SourceRaster::Opaque(img) => SourceRaster::Opaque(lanczos(img)),
        }
    }
}

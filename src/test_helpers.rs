//! Shared test utilities: synthetic images, encoded upload buffers, and an
//! in-memory asset provider with failure injection.

use crate::assets::{AssetError, AssetProvider};
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Mutex;

// =========================================================================
// Synthetic images
// =========================================================================

/// Deterministic gradient so resize/crop results differ across the frame.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Single-color RGBA image.
pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(image.clone()), ImageFormat::Png)
}

pub fn encode_rgba_png(image: &RgbaImage) -> Vec<u8> {
    encode(DynamicImage::ImageRgba8(image.clone()), ImageFormat::Png)
}

pub fn encode_jpeg(image: &RgbImage) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(image.clone()), ImageFormat::Jpeg)
}

pub fn encode_gif(image: &RgbImage) -> Vec<u8> {
    let rgba = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
    let mut buf = Vec::new();
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut buf);
        encoder
            .encode(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
            .unwrap();
    }
    buf
}

/// Write `image` as a PNG upload at `path` and return the encoded bytes.
pub fn write_png_upload(path: &Path, image: &RgbImage) -> Vec<u8> {
    let buf = encode_png(image);
    std::fs::write(path, &buf).unwrap();
    buf
}

/// Write `image` as a JPEG upload at `path` and return the encoded bytes.
pub fn write_jpeg_upload(path: &Path, image: &RgbImage) -> Vec<u8> {
    let buf = encode_jpeg(image);
    std::fs::write(path, &buf).unwrap();
    buf
}

// =========================================================================
// Mock asset provider
// =========================================================================

/// In-memory [`AssetProvider`] that records every key it was asked for.
/// Keys that were never inserted fail with [`AssetError::NotFound`].
#[derive(Default)]
pub struct MockAssets {
    assets: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl MockAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(key.to_string(), bytes);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl AssetProvider for MockAssets {
    fn open(&self, key: &str) -> Result<Box<dyn Read + Send>, AssetError> {
        self.requests.lock().unwrap().push(key.to_string());
        self.assets
            .get(key)
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as Box<dyn Read + Send>)
            .ok_or_else(|| AssetError::NotFound(key.to_string()))
    }
}

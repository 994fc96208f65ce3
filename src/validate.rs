//! Upload validation.
//!
//! Runs synchronously before anything is queued. Only the container header is
//! read: `image::guess_format` sniffs the magic bytes, then
//! `ImageReader::into_dimensions` decodes just enough to learn the size. Pixel
//! data is decoded later, by the engine, off the caller's thread.

use crate::dimensions::{Dimensions, ImageDimensions};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not an image")]
    NotAnImage,
    #[error("failed to decode image header: {0}")]
    Decode(String),
    #[error("image type {0} is not accepted")]
    UnsupportedType(String),
    #[error("image width {actual}px is less than {min}px")]
    BelowMinWidth { actual: u32, min: u32 },
    #[error("image height {actual}px is less than {min}px")]
    BelowMinHeight { actual: u32, min: u32 },
}

/// Accepted upload encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Jpeg,
    Png,
}

impl UploadKind {
    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            _ => None,
        }
    }
}

/// Header facts about an upload that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedImage {
    pub dimensions: Dimensions,
    pub kind: UploadKind,
}

/// Check that `buf` is an accepted image and, when `enforce_floor` is set,
/// that it meets the floor in `dimensions`.
pub fn validate(
    buf: &[u8],
    dimensions: &ImageDimensions,
    enforce_floor: bool,
) -> Result<ValidatedImage, ValidationError> {
    let format = image::guess_format(buf)
        .ok()
        .filter(|format| is_picture_signature(*format))
        .ok_or(ValidationError::NotAnImage)?;

    let (width, height) = ImageReader::with_format(Cursor::new(buf), format)
        .into_dimensions()
        .map_err(|e| ValidationError::Decode(e.to_string()))?;

    let kind = UploadKind::from_format(format)
        .ok_or_else(|| ValidationError::UnsupportedType(format_name(format)))?;

    if enforce_floor {
        check_floor(width, height, dimensions)?;
    }

    Ok(ValidatedImage {
        dimensions: Dimensions::new(width, height),
        kind,
    })
}

/// Signatures that count as pictures. Other magic numbers `guess_format`
/// knows (PNM's `P1`..`P7`, farbfeld, QOI, HDR, DDS) are not an image here.
fn is_picture_signature(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg
            | ImageFormat::Png
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Tiff
            | ImageFormat::Bmp
            | ImageFormat::Ico
            | ImageFormat::Avif
    )
}

fn check_floor(width: u32, height: u32, dimensions: &ImageDimensions) -> Result<(), ValidationError> {
    if let Some(min) = dimensions.min_width {
        if width < min {
            return Err(ValidationError::BelowMinWidth { actual: width, min });
        }
    }
    if let Some(min) = dimensions.min_height {
        if height < min {
            return Err(ValidationError::BelowMinHeight { actual: height, min });
        }
    }
    Ok(())
}

fn format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| format!("{format:?}").to_lowercase())
}

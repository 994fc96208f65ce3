//! Output encoding.
//!
//! Variants are written in the same codec family as the upload, chosen from
//! the upload's file extension. JPEG is written at [`JPEG_QUALITY`]; PNG uses
//! the encoder defaults.

use super::RenderError;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JPEG quality for every variant. PNG is lossless and has no setting.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Codec for a source path, from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(RenderError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Encode `image` to `path`, truncating any previous file.
pub fn save_variant(image: &DynamicImage, path: &Path, format: OutputFormat) -> Result<(), RenderError> {
    let file = File::create(path).map_err(|source| RenderError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let encoded = match format {
        // JPEG has no alpha channel; drop it rather than fail.
        OutputFormat::Jpeg => {
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
        }
        OutputFormat::Png => image.write_with_encoder(PngEncoder::new(&mut writer)),
    };

    encoded
        .map_err(|e| e.to_string())
        .and_then(|()| writer.flush().map_err(|e| e.to_string()))
        .map_err(|reason| RenderError::Encode {
            path: path.to_path_buf(),
            reason,
        })
}

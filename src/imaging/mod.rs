//! Image processing, pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Header sniff** | `image::guess_format` + `ImageReader::into_dimensions` (see [`validate`](crate::validate)) |
//! | **Fill** | `resize_to_fill`, Lanczos3 |
//! | **Fit** | `resize_exact` to aspect-preserving bounds, Lanczos3 |
//! | **Composite** | `imageops::overlay` |
//! | **Encode** | `JpegEncoder` / `PngEncoder` defaults |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for size and placement math (unit testable)
//! - **Operations**: Pixel work on decoded images
//! - **Encode**: Codec selection and writing to disk

mod calculations;
pub mod encode;
pub mod operations;

use std::path::PathBuf;
use thiserror::Error;

pub use calculations::{
    calculate_fit_dimensions, cap_to_original, center_origin, is_landscape, watermark_origin,
};
pub use encode::{OutputFormat, save_variant};
pub use operations::FALLBACK_BACKDROP;

/// Failure rendering one variant. Siblings in the same job still run.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to open source image: {0}")]
    Open(String),
    #[error("cannot determine output format for {0}")]
    UnknownFormat(String),
    #[error("failed to create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },
}

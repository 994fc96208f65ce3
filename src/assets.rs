//! Watermark and backdrop sources.
//!
//! The engine never touches the filesystem for assets directly; it asks an
//! [`AssetProvider`] for a byte stream by logical key. Two providers ship:
//!
//! | Provider | Environment | Key resolution |
//! |---|---|---|
//! | [`DirectoryAssets`] | development | `<dir>/<key>` on disk |
//! | [`EmbeddedAssets`] | production | lookup in a bundle compiled into the host binary |
//!
//! [`provider_for`] picks one from [`Environment`] once at startup, so the
//! engine itself has no environment branches.
//!
//! Watermark keys are per-format: `<watermark key>:<format name>`, which lets
//! a thumbnail carry a smaller mark than a banner.

use crate::config::{Environment, ImagistConfig};
use image::{DynamicImage, ImageReader};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode asset {key}: {reason}")]
    Decode { key: String, reason: String },
}

/// Source of watermark/backdrop bytes.
///
/// The returned reader owns whatever handle backs it and releases it on drop.
pub trait AssetProvider: Send + Sync {
    fn open(&self, key: &str) -> Result<Box<dyn Read + Send>, AssetError>;
}

/// Open `key` and decode it into an image.
pub fn load_image(provider: &dyn AssetProvider, key: &str) -> Result<DynamicImage, AssetError> {
    let mut bytes = Vec::new();
    provider.open(key)?.read_to_end(&mut bytes)?;

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(|e| AssetError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Assets read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for DirectoryAssets {
    fn open(&self, key: &str) -> Result<Box<dyn Read + Send>, AssetError> {
        let path = self.root.join(key);
        match File::open(&path) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(AssetError::Io(e)),
        }
    }
}

/// Assets bundled into the binary, typically via `include_bytes!`.
///
/// ```
/// use imagist::assets::EmbeddedAssets;
///
/// let assets = EmbeddedAssets::new()
///     .with_static("backdrop.png", &[0x89, b'P', b'N', b'G'])
///     .with_owned("watermark.png:thumb", vec![0x89, b'P', b'N', b'G']);
/// assert_eq!(assets.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedAssets {
    entries: HashMap<String, Arc<[u8]>>,
}

impl EmbeddedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static(self, key: &str, bytes: &'static [u8]) -> Self {
        self.with_owned(key, bytes.to_vec())
    }

    pub fn with_owned(mut self, key: &str, bytes: Vec<u8>) -> Self {
        self.entries.insert(key.to_string(), Arc::from(bytes));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shares the bundle's bytes with the reader instead of copying them.
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AssetProvider for EmbeddedAssets {
    fn open(&self, key: &str) -> Result<Box<dyn Read + Send>, AssetError> {
        self.entries
            .get(key)
            .map(|bytes| {
                Box::new(Cursor::new(SharedBytes(Arc::clone(bytes)))) as Box<dyn Read + Send>
            })
            .ok_or_else(|| AssetError::NotFound(key.to_string()))
    }
}

/// Choose the provider for the configured environment.
///
/// `embedded` is only used in production; development reads `assets.dir`.
pub fn provider_for(config: &ImagistConfig, embedded: EmbeddedAssets) -> Arc<dyn AssetProvider> {
    match config.environment {
        Environment::Development => Arc::new(DirectoryAssets::new(&config.assets.dir)),
        Environment::Production => Arc::new(embedded),
    }
}

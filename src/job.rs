//! Jobs and the reports they produce.
//!
//! A [`Job`] is created once an upload passes validation and is consumed by
//! exactly one execution. The execution returns a [`JobReport`], which travels
//! back to the dispatcher with the completion signal.

use crate::dimensions::{Dimensions, ImageDimensions};
use crate::imaging::RenderError;
use std::path::{Path, PathBuf};

/// One admitted upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Where the upload lives on disk; also the deduplication key.
    pub key: PathBuf,
    /// Size of the original, read from its header during validation.
    pub original: Dimensions,
    pub dimensions: ImageDimensions,
}

/// Runs one job to completion.
///
/// The dispatcher calls this on a dedicated thread per admitted key. The real
/// implementation is [`TransformEngine`](crate::engine::TransformEngine);
/// tests substitute runners that block or count.
pub trait JobRunner: Send + Sync + 'static {
    fn run(&self, job: &Job) -> JobReport;
}

/// What happened to each requested format of one job.
#[derive(Debug)]
pub struct JobReport {
    pub key: PathBuf,
    pub variants: Vec<VariantReport>,
}

impl JobReport {
    pub fn new(key: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            variants: Vec::new(),
        }
    }

    pub fn written(&self) -> impl Iterator<Item = &VariantReport> {
        self.variants
            .iter()
            .filter(|v| matches!(v.outcome, VariantOutcome::Written { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &RenderError)> {
        self.variants.iter().filter_map(|v| match &v.outcome {
            VariantOutcome::Failed(e) => Some((v.format.as_str(), e)),
            _ => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[derive(Debug)]
pub struct VariantReport {
    /// Format name as requested (may be empty for skipped entries).
    pub format: String,
    pub outcome: VariantOutcome,
}

#[derive(Debug)]
pub enum VariantOutcome {
    Written {
        path: PathBuf,
        width: u32,
        height: u32,
        watermarked: bool,
        backdrop: BackdropSource,
    },
    /// Entry had no name or a zero side.
    Skipped,
    Failed(RenderError),
}

/// Background used under a fitted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropSource {
    /// Standard fill path, no backdrop layer.
    None,
    /// Backdrop asset, filled to the target box.
    Asset,
    /// Asset unavailable; solid fallback color.
    Fallback,
}

/// Output path for a variant: `<source>:<format>`.
pub fn variant_path(source: &Path, format: &str) -> PathBuf {
    let mut path = source.as_os_str().to_os_string();
    path.push(":");
    path.push(format);
    PathBuf::from(path)
}

//! Variant rendering for one job.
//!
//! For every requested format the engine:
//!
//! 1. caps the target size to the original, per axis (no upscaling);
//! 2. takes the **backdrop path** when the format asks for a backdrop and the
//!    original is not landscape: the image is fitted (never cropped) and
//!    centered over the backdrop asset, itself filled to the target. If the
//!    asset can't be loaded a solid [`FALLBACK_BACKDROP`] canvas is used;
//! 3. otherwise takes the **standard path**: fill the target, center crop;
//! 4. overlays the per-format watermark `<watermark key>:<format>` when the
//!    format has a position. A missing watermark is not an error; the variant
//!    is written without it;
//! 5. encodes next to the upload as `<upload>:<format>`.
//!
//! The source is decoded once per job, and not at all when no entry is
//! renderable. Formats are independent: each writes its own path, so they fan
//! out on the rayon pool, and one failure never stops the others. Every
//! outcome lands in the [`JobReport`].

use crate::assets::{self, AssetProvider};
use crate::config::AssetsConfig;
use crate::dimensions::{Dimensions, FormatDimensions};
use crate::imaging::operations::{compose_on_backdrop, fallback_backdrop, fill, fit, overlay_watermark};
use crate::imaging::{
    FALLBACK_BACKDROP, OutputFormat, RenderError, cap_to_original, is_landscape, save_variant,
};
use crate::job::{BackdropSource, Job, JobReport, JobRunner, VariantOutcome, VariantReport, variant_path};
use image::{DynamicImage, GenericImageView, ImageReader};
use log::{debug, warn};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Renders jobs against an asset provider captured at construction.
pub struct TransformEngine {
    assets: Arc<dyn AssetProvider>,
    watermark_key: String,
    backdrop_key: String,
}

/// A rendered variant before encoding.
struct Rendered {
    image: DynamicImage,
    watermarked: bool,
    backdrop: BackdropSource,
}

impl TransformEngine {
    pub fn new(config: &AssetsConfig, assets: Arc<dyn AssetProvider>) -> Self {
        Self {
            assets,
            watermark_key: config.watermark.clone(),
            backdrop_key: config.backdrop.clone(),
        }
    }

    /// Watermark key for a format: `<base>:<format name>`.
    pub fn watermark_key(&self, format: &str) -> String {
        format!("{}:{}", self.watermark_key, format)
    }

    fn render(&self, source: &DynamicImage, original: Dimensions, format: &FormatDimensions) -> Rendered {
        let target = cap_to_original(Dimensions::new(format.width, format.height), original);

        let (image, backdrop) = if format.backdrop && !is_landscape(original) {
            let foreground = fit(source, target);
            let (canvas, backdrop) = self.backdrop_canvas(target);
            let composed = compose_on_backdrop(canvas, &foreground);
            (DynamicImage::ImageRgba8(composed), backdrop)
        } else {
            (fill(source, target), BackdropSource::None)
        };

        match &format.watermark {
            Some(position) => match assets::load_image(self.assets.as_ref(), &self.watermark_key(&format.name)) {
                Ok(mark) => Rendered {
                    image: overlay_watermark(image, &mark, position),
                    watermarked: true,
                    backdrop,
                },
                Err(e) => {
                    debug!("watermark for format {} unavailable, skipping: {}", format.name, e);
                    Rendered {
                        image,
                        watermarked: false,
                        backdrop,
                    }
                }
            },
            None => Rendered {
                image,
                watermarked: false,
                backdrop,
            },
        }
    }

    fn backdrop_canvas(&self, target: Dimensions) -> (image::RgbaImage, BackdropSource) {
        match assets::load_image(self.assets.as_ref(), &self.backdrop_key) {
            Ok(backdrop) => (fill(&backdrop, target).into_rgba8(), BackdropSource::Asset),
            Err(e) => {
                debug!(
                    "backdrop {} unavailable, using {:?}: {}",
                    self.backdrop_key, FALLBACK_BACKDROP.0, e
                );
                (fallback_backdrop(target), BackdropSource::Fallback)
            }
        }
    }

    fn render_variant(
        &self,
        job: &Job,
        source: &Result<DynamicImage, String>,
        format: &FormatDimensions,
    ) -> Result<VariantOutcome, RenderError> {
        let source = source.as_ref().map_err(|reason| RenderError::Open(reason.clone()))?;
        let output_format = OutputFormat::from_path(&job.key)?;

        let rendered = self.render(source, job.original, format);
        let path = variant_path(&job.key, &format.name);
        save_variant(&rendered.image, &path, output_format)?;

        let (width, height) = rendered.image.dimensions();
        Ok(VariantOutcome::Written {
            path,
            width,
            height,
            watermarked: rendered.watermarked,
            backdrop: rendered.backdrop,
        })
    }
}

fn open_source(path: &Path) -> Result<DynamicImage, String> {
    ImageReader::open(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?
        .with_guessed_format()
        .map_err(|e| format!("{}: {}", path.display(), e))?
        .decode()
        .map_err(|e| format!("{}: {}", path.display(), e))
}

impl JobRunner for TransformEngine {
    fn run(&self, job: &Job) -> JobReport {
        if !job.dimensions.has_renderable_formats() {
            debug!("nothing to render for {}", job.key.display());
            return JobReport {
                key: job.key.clone(),
                variants: job
                    .dimensions
                    .formats
                    .iter()
                    .map(|format| VariantReport {
                        format: format.name.clone(),
                        outcome: VariantOutcome::Skipped,
                    })
                    .collect(),
            };
        }

        let source = open_source(&job.key);
        if let Err(reason) = &source {
            warn!("cannot open {}: {}", job.key.display(), reason);
        }

        let variants = job
            .dimensions
            .formats
            .par_iter()
            .map(|format| {
                let outcome = if !format.is_renderable() {
                    debug!(
                        "skipping format {:?} ({}x{}) for {}",
                        format.name,
                        format.width,
                        format.height,
                        job.key.display()
                    );
                    VariantOutcome::Skipped
                } else {
                    self.render_variant(job, &source, format)
                        .unwrap_or_else(|e| {
                            warn!("format {} for {} failed: {}", format.name, job.key.display(), e);
                            VariantOutcome::Failed(e)
                        })
                };
                VariantReport {
                    format: format.name.clone(),
                    outcome,
                }
            })
            .collect();

        JobReport {
            key: job.key.clone(),
            variants,
        }
    }
}

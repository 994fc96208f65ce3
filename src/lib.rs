//! # Imagist
//!
//! Background generation of image variants for uploads: thumbnails, center
//! crops, images fitted onto a backdrop, and anchored watermarks. Each
//! variant is written next to its upload as `<upload path>:<format name>`.
//!
//! # Architecture: Validate, Dispatch, Render
//!
//! ```text
//! 1. Validate  bytes  →  ValidatedImage   (sniff type + header dimensions, no full decode)
//! 2. Dispatch  job    →  job thread       (one job per upload path at a time)
//! 3. Render    job    →  <path>:<format>  (fill / fit + backdrop / watermark / encode)
//! ```
//!
//! Validation runs synchronously in the caller, so a bad upload is rejected
//! before anything is queued. Everything after that is fire-and-forget: the
//! caller gets `Ok` as soon as the job is enqueued and may subscribe to
//! [`job::JobReport`]s to learn what was written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`validate`] | Upload type allow-list (JPEG, PNG) and minimum-size floor |
//! | [`dispatch`] | [`Imagist`] handle: bounded queue, in-flight dedup, one thread per job |
//! | [`engine`] | [`engine::TransformEngine`]: renders every format of one job |
//! | [`imaging`] | Pure size math, pixel operations and encoders |
//! | [`assets`] | [`assets::AssetProvider`] trait with directory and embedded providers |
//! | [`job`] | Job and report types shared by the dispatcher and engine |
//! | [`dimensions`] | Format table, watermark anchors and presets |
//! | [`config`] | `imagist.toml` loading, stock defaults and validation |
//! | [`output`] | CLI output formatting for reports |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! Target sizes are capped to the original per axis before any resampling, so
//! a 100x50 upload asked for a 200x200 thumbnail produces a 100x50 crop. The
//! same capped size is used for backdrop canvases.
//!
//! ## Duplicates Are Dropped
//!
//! While a job for a path is running, further submissions for that path are
//! accepted and silently dropped. Variants are a pure function of the upload
//! bytes on disk, so the running job already produces the same output.
//!
//! ## Missing Assets Degrade, They Don't Fail
//!
//! A missing backdrop falls back to a solid navy canvas; a missing watermark
//! means the variant is written without one. Only source decode and write
//! errors fail a variant, and a failed variant never stops its siblings.

pub mod assets;
pub mod config;
pub mod dimensions;
pub mod dispatch;
pub mod engine;
pub mod imaging;
pub mod job;
pub mod output;
pub mod validate;

pub use dispatch::{Imagist, ImagistError};

#[cfg(test)]
pub(crate) mod test_helpers;

//! Deduplicating job dispatcher.
//!
//! ```text
//!  add() ──validate──► [ bounded queue ] ──► coordinator ──spawn──► job thread
//!                            ▲                  │ in-flight set        │
//!                            └──── Done(report) ┴──────────────────────┘
//! ```
//!
//! A single coordinator thread owns the set of in-flight keys. Admissions and
//! completions both arrive on the same FIFO queue, so every state change for
//! a key passes through one serial point and no lock guards the set:
//!
//! - **Admit**: if the key is in flight the request is dropped (the caller
//!   already got `Ok` at enqueue time); otherwise the key is marked and a
//!   thread is spawned to run the job.
//! - **Done**: the key is released and the job's report is forwarded to the
//!   optional subscriber.
//!
//! The queue is a `sync_channel`, so when it is full [`Imagist::add`] blocks
//! until the coordinator catches up. That is the only back-pressure.
//!
//! Each admission carries its own clone of the queue's sender, which the job
//! thread uses to signal completion. The coordinator holds no sender itself, so
//! once the handle is closed and every job has reported, the queue disconnects
//! and the coordinator exits.

use crate::assets::AssetProvider;
use crate::config::ImagistConfig;
use crate::dimensions::ImageDimensions;
use crate::engine::TransformEngine;
use crate::job::{Job, JobReport, JobRunner};
use crate::validate::{ValidationError, validate};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender, sync_channel};
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagistError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("dispatcher is no longer accepting jobs")]
    Closed,
    #[error("failed to start dispatcher: {0}")]
    Start(#[source] std::io::Error),
}

enum Signal {
    Admit { job: Job, done: SyncSender<Signal> },
    Done(JobReport),
    /// Holds the coordinator until the paired sender fires or is dropped.
    #[cfg(test)]
    Stall(Receiver<()>),
}

/// Handle for submitting uploads.
///
/// Dropping the handle stops admissions without waiting; running jobs still
/// finish in the background. Use [`close`](Self::close) to wait for them.
pub struct Imagist {
    admissions: Option<SyncSender<Signal>>,
    coordinator: Option<JoinHandle<()>>,
}

impl Imagist {
    /// Dispatcher backed by the real [`TransformEngine`].
    pub fn new(
        config: &ImagistConfig,
        assets: Arc<dyn AssetProvider>,
        reports: Option<Sender<JobReport>>,
    ) -> Result<Self, ImagistError> {
        let engine = TransformEngine::new(&config.assets, assets);
        Self::with_runner(config.queue.capacity, Arc::new(engine), reports)
    }

    /// Dispatcher running jobs with any [`JobRunner`].
    pub fn with_runner(
        capacity: usize,
        runner: Arc<dyn JobRunner>,
        reports: Option<Sender<JobReport>>,
    ) -> Result<Self, ImagistError> {
        let (tx, rx) = sync_channel(capacity.max(1));
        let coordinator = thread::Builder::new()
            .name("imagist-dispatch".into())
            .spawn(move || coordinate(rx, runner, reports))
            .map_err(ImagistError::Start)?;

        Ok(Self {
            admissions: Some(tx),
            coordinator: Some(coordinator),
        })
    }

    /// Validate `buf` and queue a job for `key`.
    ///
    /// Returns once the job is queued, not when it has run. `None` dimensions
    /// means no floor and no formats. A job for a key that is already running
    /// is accepted here and then silently dropped.
    pub fn add(
        &self,
        buf: &[u8],
        key: impl Into<PathBuf>,
        dimensions: Option<ImageDimensions>,
        enforce_floor: bool,
    ) -> Result<(), ImagistError> {
        let key = key.into();
        let dimensions = dimensions.unwrap_or_default();

        let image = validate(buf, &dimensions, enforce_floor).inspect_err(|e| {
            debug!("rejected {}: {}", key.display(), e);
        })?;

        let tx = self.admissions.as_ref().ok_or(ImagistError::Closed)?;
        let job = Job {
            key,
            original: image.dimensions,
            dimensions,
        };
        tx.send(Signal::Admit {
            job,
            done: tx.clone(),
        })
        .map_err(|_| ImagistError::Closed)
    }

    /// Stop accepting jobs and wait until every admitted job has finished.
    pub fn close(mut self) {
        self.admissions.take();
        if let Some(handle) = self.coordinator.take() {
            if handle.join().is_err() {
                error!("dispatcher thread panicked");
            }
        }
    }
}

impl Drop for Imagist {
    fn drop(&mut self) {
        self.admissions.take();
    }
}

fn coordinate(signals: Receiver<Signal>, runner: Arc<dyn JobRunner>, reports: Option<Sender<JobReport>>) {
    let mut in_flight: HashSet<PathBuf> = HashSet::new();

    for signal in signals {
        match signal {
            Signal::Done(report) => {
                in_flight.remove(&report.key);
                debug!("finished {} ({} in flight)", report.key.display(), in_flight.len());
                if let Some(reports) = &reports {
                    // Subscriber may have gone away; the job is done regardless.
                    let _ = reports.send(report);
                }
            }
            Signal::Admit { job, done } => {
                if !in_flight.insert(job.key.clone()) {
                    debug!("{} already in flight, dropping duplicate", job.key.display());
                    continue;
                }
                let key = job.key.clone();
                info!("processing {} ({} formats)", key.display(), job.dimensions.formats.len());
                if let Err(e) = spawn_job(job, Arc::clone(&runner), done) {
                    warn!("failed to spawn job for {}: {}", key.display(), e);
                    in_flight.remove(&key);
                }
            }
            #[cfg(test)]
            Signal::Stall(release) => {
                release.recv().ok();
            }
        }
    }
}

fn spawn_job(job: Job, runner: Arc<dyn JobRunner>, done: SyncSender<Signal>) -> std::io::Result<()> {
    thread::Builder::new().name("imagist-job".into()).spawn(move || {
        let report = catch_unwind(AssertUnwindSafe(|| runner.run(&job))).unwrap_or_else(|_| {
            error!("job for {} panicked", job.key.display());
            JobReport::new(job.key.clone())
        });
        // Release the key even if the coordinator is shutting down.
        let _ = done.send(Signal::Done(report));
    })?;
    Ok(())
}

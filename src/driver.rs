// Run driver: enumerate once, then for each iteration pick a batch, upload
// it one file at a time and pace to the interval. Individual upload failures
// are counted, never fatal.

use crate::config::{BatchSize, RunConfig};
use crate::error::{Result, UploadError, UploaderError};
use crate::interrupt::Interrupt;
use crate::pacing;
use crate::report::Reporter;
use crate::scan::{self, PhotoFile};
use crate::select::{self, SelectionMode};
use crate::upload::{UploadOutcome, Uploader};
use crossbeam_channel::bounded;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// What the run is about to do, reported once before the first upload.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub dir: PathBuf,
    pub photo_count: usize,
    pub total_iterations: u64,
    pub batch_size: usize,
    pub mode: SelectionMode,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedUpload {
    pub name: String,
    pub error: UploadError,
}

/// Counters owned by the driver for one invocation.
#[derive(Debug, Default)]
pub struct RunState {
    pub successes: u64,
    pub failures: u64,
    /// Next start position for sequential selection.
    pub cursor: usize,
    pub iterations_completed: u64,
    pub failed: Vec<FailedUpload>,
}

impl RunState {
    fn record(&mut self, photo: &PhotoFile, outcome: &UploadOutcome) {
        match outcome {
            UploadOutcome::Success(_) => self.successes += 1,
            UploadOutcome::Failure(error) => {
                self.failures += 1;
                self.failed.push(FailedUpload {
                    name: photo.name.clone(),
                    error: error.clone(),
                });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub successes: u64,
    pub failures: u64,
    pub iterations_completed: u64,
    pub total_iterations: u64,
    pub failed: Vec<FailedUpload>,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn attempts(&self) -> u64 {
        self.successes + self.failures
    }
}

/// Enumerate the configured directory, apply `--limit`, and refuse to go on
/// with an empty list.
pub fn collect_photos(config: &RunConfig) -> Result<Vec<PhotoFile>> {
    let mut photos = scan::enumerate(&config.dir)?;
    if let Some(limit) = config.limit {
        photos.truncate(limit);
    }
    if photos.is_empty() {
        return Err(UploaderError::NoPhotosFound {
            path: config.dir.clone(),
        });
    }
    Ok(photos)
}

/// Build the plan for `photos` under `config`.
pub fn plan_run(config: &RunConfig, photos: &[PhotoFile]) -> RunPlan {
    RunPlan {
        dir: config.dir.clone(),
        photo_count: photos.len(),
        total_iterations: pacing::plan(config.termination, config.interval),
        batch_size: match config.batch_size {
            BatchSize::Fixed(n) => n,
            BatchSize::All => photos.len(),
        },
        mode: config.mode,
        interval: config.interval,
    }
}

/// Enumerate and run to completion (or interrupt).
pub fn run(
    config: &RunConfig,
    uploader: Arc<dyn Uploader>,
    reporter: &mut dyn Reporter,
    interrupt: &Interrupt,
) -> Result<RunSummary> {
    let photos = collect_photos(config)?;
    let plan = plan_run(config, &photos);
    let mut rng = rand::thread_rng();
    Ok(execute(
        config,
        &plan,
        &photos,
        uploader,
        reporter,
        interrupt,
        &mut rng,
    ))
}

/// The iteration loop over an already enumerated list.
pub fn execute<R: Rng + ?Sized>(
    config: &RunConfig,
    plan: &RunPlan,
    photos: &[PhotoFile],
    uploader: Arc<dyn Uploader>,
    reporter: &mut dyn Reporter,
    interrupt: &Interrupt,
    rng: &mut R,
) -> RunSummary {
    let total = plan.total_iterations;
    let mut state = RunState::default();
    let mut interrupted = false;

    reporter.run_started(plan);

    'run: for iteration in 1..=total {
        if interrupt.is_triggered() {
            interrupted = true;
            break;
        }

        let started = Instant::now();
        let batch = select::select(photos, state.cursor, plan.batch_size, plan.mode, rng);
        state.cursor = batch.cursor;
        tracing::debug!(iteration, total, size = batch.files.len(), cursor = state.cursor, "batch selected");
        reporter.iteration_started(iteration, total, batch.files.len());

        let batch_len = batch.files.len();
        for (i, photo) in batch.files.into_iter().enumerate() {
            if i > 0 && interrupt.sleep(config.file_delay) {
                interrupted = true;
                break 'run;
            }
            reporter.upload_started(i + 1, batch_len, photo);
            match upload_until_interrupted(&uploader, photo, interrupt) {
                Some(outcome) => {
                    state.record(photo, &outcome);
                    reporter.upload_finished(photo, &outcome);
                }
                None => {
                    interrupted = true;
                    break 'run;
                }
            }
        }
        state.iterations_completed += 1;

        if iteration < total {
            let elapsed = started.elapsed();
            let pause = pacing::remainder(plan.interval, elapsed);
            if !pause.is_zero() {
                reporter.waiting(pause);
            }
            if pacing::sleep_remainder(plan.interval, elapsed, interrupt) {
                interrupted = true;
                break;
            }
        }
    }

    if interrupted {
        tracing::info!(completed = state.iterations_completed, "run interrupted");
        reporter.interrupted();
    }

    let summary = RunSummary {
        successes: state.successes,
        failures: state.failures,
        iterations_completed: state.iterations_completed,
        total_iterations: total,
        failed: state.failed,
        interrupted,
    };
    reporter.run_finished(&summary);
    summary
}

/// Run one upload on a helper thread and wait for it or for an interrupt.
/// `None` means the run was interrupted; the in-flight request is left to
/// finish or time out on its own.
fn upload_until_interrupted(
    uploader: &Arc<dyn Uploader>,
    photo: &PhotoFile,
    interrupt: &Interrupt,
) -> Option<UploadOutcome> {
    let (tx, rx) = bounded(1);
    let worker = Arc::clone(uploader);
    let owned = photo.clone();
    thread::spawn(move || {
        let _ = tx.send(worker.upload(&owned));
    });

    let lost = || {
        UploadOutcome::Failure(UploadError::Transport(
            "upload worker stopped unexpectedly".into(),
        ))
    };

    crossbeam_channel::select! {
        recv(rx) -> outcome => Some(outcome.unwrap_or_else(|_| lost())),
        recv(interrupt.receiver()) -> signal => match signal {
            Ok(()) => None,
            // no interrupt source left, just wait for the upload
            Err(_) => Some(rx.recv().unwrap_or_else(|_| lost())),
        },
    }
}

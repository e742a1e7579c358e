use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};

use crate::detection::domain::signature_extractor::SignatureExtractor;
use crate::pipeline::extraction_executor::{ExtractionExecutor, ExtractorFactory, ImageOutcome};
use crate::pipeline::load_stage::{Admission, ExtractionJob, LoadStage};
use crate::pipeline::sort_faces_use_case::SortError;
use crate::shared::image_record::ImageRecord;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Runs loading on one thread and signature extraction on a worker pool.
///
/// Layout: `loader [decode/fingerprint/dedup] → N × extract → main [collect]`
///
/// The loader is single-threaded so duplicate detection follows walk order.
/// Extractors are built up front, one per worker, before any image is read.
pub struct ThreadedExtractionExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedExtractionExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl ExtractionExecutor for ThreadedExtractionExecutor {
    fn execute(
        &self,
        paths: Vec<PathBuf>,
        stage: LoadStage<'_>,
        factory: &ExtractorFactory,
        cancelled: &AtomicBool,
        on_outcome: &mut dyn FnMut(&ImageOutcome),
    ) -> Result<Vec<ImageOutcome>, SortError> {
        let extractors = (0..self.workers)
            .map(|_| factory())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SortError::ExtractorInit(e.to_string()))?;
        log::debug!("Started {} extraction workers", extractors.len());

        let total = paths.len();
        let (job_tx, job_rx) = crossbeam_channel::bounded::<ExtractionJob>(self.channel_capacity);
        let (outcome_tx, outcome_rx) =
            crossbeam_channel::bounded::<ImageOutcome>(self.channel_capacity);

        let (outcomes, panicked) = std::thread::scope(|s| {
            let loader = {
                let outcome_tx = outcome_tx.clone();
                s.spawn(move || run_loader(paths, stage, job_tx, outcome_tx, cancelled))
            };
            let workers: Vec<_> = extractors
                .into_iter()
                .map(|extractor| {
                    let job_rx = job_rx.clone();
                    let outcome_tx = outcome_tx.clone();
                    s.spawn(move || run_worker(extractor, job_rx, outcome_tx, cancelled))
                })
                .collect();
            drop(job_rx);
            drop(outcome_tx);

            let mut outcomes = Vec::with_capacity(total);
            for outcome in outcome_rx {
                on_outcome(&outcome);
                outcomes.push(outcome);
            }

            let mut panicked = loader.join().is_err();
            for worker in workers {
                panicked |= worker.join().is_err();
            }
            (outcomes, panicked)
        });

        if panicked {
            return Err(SortError::WorkerPanicked);
        }
        if cancelled.load(Ordering::Relaxed) {
            return Err(SortError::Cancelled);
        }
        Ok(outcomes)
    }
}

fn run_loader(
    paths: Vec<PathBuf>,
    mut stage: LoadStage<'_>,
    job_tx: Sender<ExtractionJob>,
    outcome_tx: Sender<ImageOutcome>,
    cancelled: &AtomicBool,
) {
    for (sequence, path) in paths.into_iter().enumerate() {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }
        let sent = match stage.admit(sequence, path.clone()) {
            Admission::Job(job) => job_tx.send(job).is_ok(),
            Admission::Duplicate => outcome_tx.send(ImageOutcome::Duplicate { path }).is_ok(),
            Admission::Unreadable(reason) => outcome_tx
                .send(ImageOutcome::Unreadable { path, reason })
                .is_ok(),
        };
        if !sent {
            break;
        }
    }
}

fn run_worker(
    mut extractor: SignatureExtractor,
    job_rx: Receiver<ExtractionJob>,
    outcome_tx: Sender<ImageOutcome>,
    cancelled: &AtomicBool,
) {
    for job in job_rx {
        if cancelled.load(Ordering::Relaxed) {
            break;
        }
        let outcome = extract_one(&mut extractor, job);
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
}

fn extract_one(extractor: &mut SignatureExtractor, job: ExtractionJob) -> ImageOutcome {
    let ExtractionJob {
        sequence,
        path,
        fingerprint,
        frame,
    } = job;

    match extractor.extract(&frame) {
        Ok(Some(signature)) => {
            ImageOutcome::Face(ImageRecord::new(path, sequence, fingerprint, signature))
        }
        Ok(None) => ImageOutcome::NoFace { path },
        Err(e) => {
            let reason = e.to_string();
            log::warn!("Face extraction failed for {}: {reason}", path.display());
            ImageOutcome::ExtractionFailed { path, reason }
        }
    }
}

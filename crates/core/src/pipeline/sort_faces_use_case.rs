use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::clustering::domain::cluster_assignment::{ClusterAssignment, ClusterLabel};
use crate::clustering::domain::identity_clusterer::{ClusterError, IdentityClusterer};
use crate::clustering::domain::signature_batch::SignatureBatch;
use crate::clustering::infrastructure::dbscan_clusterer::DbscanClusterer;
use crate::dedup::domain::duplicate_filter::DuplicateFilter;
use crate::dedup::domain::fingerprinter::Fingerprinter;
use crate::distribution::distributor::Distributor;
use crate::distribution::domain::file_sink::FileSink;
use crate::imaging::domain::image_loader::ImageLoader;
use crate::pipeline::extraction_executor::{ExtractionExecutor, ExtractorFactory, ImageOutcome};
use crate::pipeline::infrastructure::threaded_extraction_executor::ThreadedExtractionExecutor;
use crate::pipeline::load_stage::LoadStage;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::pipeline::run_summary::RunSummary;
use crate::pipeline::sort_config::{ConfigError, SortConfig};
use crate::shared::constants::GROUP_DIR_PREFIX;
use crate::walking::image_walker::ImageWalker;

#[derive(Error, Debug)]
pub enum SortError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to initialise face extractor: {0}")]
    ExtractorInit(String),
    #[error("an extraction thread panicked")]
    WorkerPanicked,
    #[error("clustering failed: {0}")]
    Cluster(#[from] ClusterError),
    #[error("cancelled")]
    Cancelled,
}

type ProgressCallback = Box<dyn Fn(usize, usize) -> bool + Send>;

/// Orchestrates one sorting run: walk → load/dedup → extract → cluster →
/// distribute.
///
/// Nothing is copied until every image has been processed and clustered, so
/// a cancelled or failed run leaves no group directories behind.
pub struct SortFacesUseCase {
    config: SortConfig,
    loader: Box<dyn ImageLoader>,
    fingerprinter: Box<dyn Fingerprinter>,
    extractor_factory: Box<ExtractorFactory>,
    sink: Box<dyn FileSink>,
    executor: Box<dyn ExtractionExecutor>,
    clusterer: Box<dyn IdentityClusterer>,
    logger: Box<dyn PipelineLogger>,
    on_progress: Option<ProgressCallback>,
    cancelled: Arc<AtomicBool>,
}

impl SortFacesUseCase {
    pub fn new(
        config: SortConfig,
        loader: Box<dyn ImageLoader>,
        fingerprinter: Box<dyn Fingerprinter>,
        extractor_factory: Box<ExtractorFactory>,
        sink: Box<dyn FileSink>,
    ) -> Self {
        Self {
            executor: Box::new(ThreadedExtractionExecutor::new(config.workers)),
            clusterer: Box::new(DbscanClusterer::new(config.dbscan_params())),
            config,
            loader,
            fingerprinter,
            extractor_factory,
            sink,
            logger: Box::new(NullPipelineLogger),
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_executor(mut self, executor: Box<dyn ExtractionExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_clusterer(mut self, clusterer: Box<dyn IdentityClusterer>) -> Self {
        self.clusterer = clusterer;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Called after every image with `(done, total)`. Returning `false`
    /// cancels the run.
    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn execute(&mut self, input: &Path, output: &Path) -> Result<RunSummary, SortError> {
        self.config.validate()?;
        if !input.is_dir() {
            return Err(SortError::InputNotFound(input.to_path_buf()));
        }
        self.sink
            .ensure_dir(output)
            .map_err(|source| SortError::OutputDir {
                path: output.to_path_buf(),
                source,
            })?;

        let t0 = Instant::now();
        let paths = collect_paths(input, output);
        let total = paths.len();
        self.logger.timing("walk", elapsed_ms(t0));
        self.logger
            .info(&format!("Found {total} images in {}", input.display()));

        let t0 = Instant::now();
        let outcomes = self.run_extraction(paths)?;
        self.logger.timing("extract", elapsed_ms(t0));

        let (mut summary, batch) = tally(outcomes);
        summary.scanned = total;
        self.logger.info(&format!(
            "{} faces to cluster ({} duplicates, {} unreadable, {} without a face)",
            batch.len(),
            summary.duplicates,
            summary.unreadable,
            summary.no_face
        ));

        let t0 = Instant::now();
        let assignment = self.clusterer.cluster(batch)?;
        self.logger.timing("cluster", elapsed_ms(t0));
        summary.groups = assignment.group_count();
        summary.noise = assignment.noise_count();
        self.record_group_sizes(&assignment);

        if self.cancelled.load(Ordering::Relaxed) {
            return Err(SortError::Cancelled);
        }

        let t0 = Instant::now();
        let report = Distributor::new(
            output,
            self.config.noise,
            self.config.collision,
            self.sink.as_ref(),
        )
        .distribute(&assignment);
        self.logger.timing("distribute", elapsed_ms(t0));
        summary.copied = report.copied;
        summary.copy_failures = report.failure_count();
        summary.output_folders = report.groups_created;

        self.logger.info(&format!(
            "Sorted {} images into {} directories under {}",
            summary.copied,
            summary.output_folders,
            output.display()
        ));
        self.logger.summary();
        Ok(summary)
    }

    fn run_extraction(&mut self, paths: Vec<PathBuf>) -> Result<Vec<ImageOutcome>, SortError> {
        let total = paths.len();
        let stage = LoadStage::new(
            self.loader.as_ref(),
            self.fingerprinter.as_ref(),
            DuplicateFilter::new(self.config.dedup),
        );
        let logger = &mut self.logger;
        let on_progress = &self.on_progress;
        let cancelled = self.cancelled.as_ref();
        let mut done = 0usize;

        self.executor.execute(
            paths,
            stage,
            self.extractor_factory.as_ref(),
            cancelled,
            &mut |_outcome| {
                done += 1;
                logger.progress(done, total);
                if let Some(cb) = on_progress {
                    if !cb(done, total) {
                        cancelled.store(true, Ordering::Relaxed);
                    }
                }
            },
        )
    }

    fn record_group_sizes(&mut self, assignment: &ClusterAssignment) {
        let mut sizes = vec![0usize; assignment.group_count()];
        for (_, label) in assignment.iter() {
            if let ClusterLabel::Group(id) = label {
                sizes[id] += 1;
            }
        }
        for size in sizes {
            self.logger.metric("group_size", size as f64);
        }
    }
}

/// Walks `input`, leaving out earlier results under `output` so a re-run
/// does not sort its own copies.
fn collect_paths(input: &Path, output: &Path) -> Vec<PathBuf> {
    let input = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
    let output = output.canonicalize().unwrap_or_else(|_| output.to_path_buf());

    ImageWalker::new(&input)
        .walk()
        .filter(|path| !is_previous_output(path, &input, &output))
        .collect()
}

/// Everything under a dedicated `output` counts as earlier results. When
/// sorting in place only the `person_*` directories do.
fn is_previous_output(path: &Path, input: &Path, output: &Path) -> bool {
    let Ok(rest) = path.strip_prefix(output) else {
        return false;
    };
    if output != input {
        return true;
    }
    let mut components = rest.components();
    let top = components.next();
    components.next().is_some()
        && top
            .and_then(|c| c.as_os_str().to_str())
            .is_some_and(|name| name.starts_with(GROUP_DIR_PREFIX))
}

/// Splits outcomes into counts and the face batch, restoring walk order.
fn tally(outcomes: Vec<ImageOutcome>) -> (RunSummary, SignatureBatch) {
    let mut summary = RunSummary::default();
    let mut batch = SignatureBatch::new();
    for outcome in outcomes {
        match outcome {
            ImageOutcome::Duplicate { .. } => summary.duplicates += 1,
            ImageOutcome::Unreadable { .. } => summary.unreadable += 1,
            ImageOutcome::NoFace { .. } => summary.no_face += 1,
            ImageOutcome::ExtractionFailed { .. } => summary.extraction_failures += 1,
            ImageOutcome::Face(record) => batch.push(record),
        }
    }
    summary.faces = batch.len();
    batch.sort_by_sequence();
    (summary, batch)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

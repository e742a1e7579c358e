use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use crate::detection::domain::signature_extractor::SignatureExtractor;
use crate::pipeline::load_stage::LoadStage;
use crate::pipeline::sort_faces_use_case::SortError;
use crate::shared::image_record::ImageRecord;

/// Builds one [`SignatureExtractor`] per worker. Each call must return an
/// independent instance; model sessions are not shared between workers.
pub type ExtractorFactory =
    dyn Fn() -> Result<SignatureExtractor, Box<dyn std::error::Error>> + Send + Sync;

/// Final disposition of one walked path.
#[derive(Debug)]
pub enum ImageOutcome {
    Duplicate { path: PathBuf },
    Unreadable { path: PathBuf, reason: String },
    NoFace { path: PathBuf },
    ExtractionFailed { path: PathBuf, reason: String },
    Face(ImageRecord),
}

impl ImageOutcome {
    pub fn path(&self) -> &std::path::Path {
        match self {
            ImageOutcome::Duplicate { path }
            | ImageOutcome::Unreadable { path, .. }
            | ImageOutcome::NoFace { path }
            | ImageOutcome::ExtractionFailed { path, .. } => path,
            ImageOutcome::Face(record) => record.path(),
        }
    }
}

/// Abstracts how the load → extract stages run over a list of paths.
///
/// Paths are admitted through `stage` in slice order; `sequence` is each
/// path's index. Outcomes may be reported in any order, but every path
/// produces exactly one unless the run is cancelled.
pub trait ExtractionExecutor: Send {
    fn execute(
        &self,
        paths: Vec<PathBuf>,
        stage: LoadStage<'_>,
        factory: &ExtractorFactory,
        cancelled: &AtomicBool,
        on_outcome: &mut dyn FnMut(&ImageOutcome),
    ) -> Result<Vec<ImageOutcome>, SortError>;
}

use std::path::PathBuf;

use crate::dedup::domain::duplicate_filter::DuplicateFilter;
use crate::dedup::domain::fingerprinter::Fingerprinter;
use crate::imaging::domain::image_loader::ImageLoader;
use crate::shared::frame::Frame;
use crate::shared::image_record::Fingerprint;

/// A decoded, non-duplicate image waiting for signature extraction.
pub struct ExtractionJob {
    pub sequence: usize,
    pub path: PathBuf,
    pub fingerprint: Option<Fingerprint>,
    pub frame: Frame,
}

/// What the loader decided about one path.
pub enum Admission {
    Job(ExtractionJob),
    Duplicate,
    Unreadable(String),
}

/// Decode + fingerprint + dedup for one image at a time.
///
/// Owns the run's [`DuplicateFilter`], so paths must be admitted in walk
/// order from a single thread.
pub struct LoadStage<'a> {
    loader: &'a dyn ImageLoader,
    fingerprinter: &'a dyn Fingerprinter,
    filter: DuplicateFilter,
}

impl<'a> LoadStage<'a> {
    pub fn new(
        loader: &'a dyn ImageLoader,
        fingerprinter: &'a dyn Fingerprinter,
        filter: DuplicateFilter,
    ) -> Self {
        Self {
            loader,
            fingerprinter,
            filter,
        }
    }

    pub fn admit(&mut self, sequence: usize, path: PathBuf) -> Admission {
        let image = match self.loader.load(&path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Skipping unreadable image {}: {e}", path.display());
                return Admission::Unreadable(e.to_string());
            }
        };

        let fingerprint = if self.filter.is_enabled() {
            let fp = self.fingerprinter.fingerprint(&image);
            if self.filter.is_duplicate(&fp) {
                log::debug!("Duplicate {} ({fp})", path.display());
                return Admission::Duplicate;
            }
            Some(fp)
        } else {
            None
        };

        Admission::Job(ExtractionJob {
            sequence,
            path,
            fingerprint,
            frame: Frame::from_rgb_image(image.into_rgb8()),
        })
    }

    /// Distinct fingerprints kept so far.
    pub fn unique_count(&self) -> usize {
        self.filter.seen_count()
    }
}

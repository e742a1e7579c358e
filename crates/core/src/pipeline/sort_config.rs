use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clustering::infrastructure::dbscan_clusterer::DbscanParams;
use crate::dedup::domain::duplicate_filter::DuplicatePolicy;
use crate::detection::domain::signature_extractor::{FacePolicy, DEFAULT_CROP_MARGIN};
use crate::distribution::distributor::{CollisionPolicy, NoisePolicy};
use crate::shared::constants::{
    DEFAULT_CONFIDENCE, DEFAULT_EPSILON, DEFAULT_MIN_NEIGHBORS, MAX_DEFAULT_WORKERS,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("epsilon must be a finite number greater than 0, got {0}")]
    InvalidEpsilon(f32),
    #[error("min_neighbors must be at least 1")]
    ZeroMinNeighbors,
    #[error("confidence must be between 0 and 1, got {0}")]
    InvalidConfidence(f64),
    #[error("workers must be at least 1")]
    ZeroWorkers,
    #[error("crop_margin must be a finite number >= 0, got {0}")]
    InvalidCropMargin(f64),
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Parameters of one sorting run.
///
/// Every field is optional in the JSON form; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// DBSCAN neighbourhood radius over face signatures.
    pub epsilon: f32,
    /// DBSCAN core-point threshold, counting the point itself.
    pub min_neighbors: usize,
    pub dedup: DuplicatePolicy,
    pub face_policy: FacePolicy,
    /// Minimum detector confidence for a face to count.
    pub confidence: f64,
    pub workers: usize,
    pub noise: NoisePolicy,
    pub collision: CollisionPolicy,
    pub crop_margin: f64,
}

/// Available cores, capped at [`MAX_DEFAULT_WORKERS`].
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_DEFAULT_WORKERS)
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            dedup: DuplicatePolicy::default(),
            face_policy: FacePolicy::default(),
            confidence: DEFAULT_CONFIDENCE,
            workers: default_workers(),
            noise: NoisePolicy::default(),
            collision: CollisionPolicy::default(),
            crop_margin: DEFAULT_CROP_MARGIN,
        }
    }
}

impl SortConfig {
    /// Reads a JSON config file. The result is not validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        if self.min_neighbors == 0 {
            return Err(ConfigError::ZeroMinNeighbors);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ConfigError::InvalidConfidence(self.confidence));
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if !self.crop_margin.is_finite() || self.crop_margin < 0.0 {
            return Err(ConfigError::InvalidCropMargin(self.crop_margin));
        }
        Ok(())
    }

    pub fn dbscan_params(&self) -> DbscanParams {
        DbscanParams {
            epsilon: self.epsilon,
            min_neighbors: self.min_neighbors,
        }
    }
}

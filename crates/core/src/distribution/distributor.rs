use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clustering::domain::cluster_assignment::{ClusterAssignment, ClusterLabel};
use crate::distribution::domain::file_sink::FileSink;
use crate::distribution::output_layout::{GroupKey, OutputLayout};

/// Where images labelled as noise are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoisePolicy {
    /// One `person_-1_<n>` directory per noise image.
    #[default]
    Singleton,
    /// All noise images share `person_-1`.
    Pooled,
}

/// What happens when two files with the same basename land in one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Later files get `name_1.ext`, `name_2.ext`, ...
    #[default]
    Counter,
    /// Later files replace earlier ones.
    Overwrite,
}

/// Outcome of copying one assignment into the output tree.
#[derive(Debug, Default)]
pub struct DistributionReport {
    pub copied: usize,
    pub failures: Vec<(PathBuf, String)>,
    pub groups_created: usize,
}

impl DistributionReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Copies every labelled image into its group directory.
///
/// Source files are only read. A failure on one file is recorded and the
/// remaining files are still copied.
pub struct Distributor<'a> {
    output_root: PathBuf,
    noise: NoisePolicy,
    collision: CollisionPolicy,
    sink: &'a dyn FileSink,
}

impl<'a> Distributor<'a> {
    pub fn new(
        output_root: impl Into<PathBuf>,
        noise: NoisePolicy,
        collision: CollisionPolicy,
        sink: &'a dyn FileSink,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            noise,
            collision,
            sink,
        }
    }

    pub fn distribute(&self, assignment: &ClusterAssignment) -> DistributionReport {
        let mut layout = OutputLayout::new(&self.output_root, self.sink);
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut report = DistributionReport::default();
        let mut noise_seen = 0usize;

        for (record, label) in assignment.iter() {
            let key = match (label, self.noise) {
                (ClusterLabel::Noise, NoisePolicy::Singleton) => {
                    noise_seen += 1;
                    GroupKey::NoiseSingleton(noise_seen - 1)
                }
                (label, _) => GroupKey::Label(label),
            };

            let src = record.path();
            let Some(file_name) = src.file_name() else {
                report
                    .failures
                    .push((src.to_path_buf(), "path has no file name".to_string()));
                continue;
            };

            let dir = match layout.dir_for(key) {
                Ok(dir) => dir.to_path_buf(),
                Err(e) => {
                    log::warn!("Could not create {}: {e}", self.output_root.join(key.dir_name()).display());
                    report.failures.push((src.to_path_buf(), e.to_string()));
                    continue;
                }
            };

            let dst = match self.collision {
                CollisionPolicy::Overwrite => dir.join(file_name),
                CollisionPolicy::Counter => unclaimed_destination(&dir, file_name, &claimed),
            };

            match self.sink.copy(src, &dst) {
                Ok(_) => {
                    log::debug!("{} -> {}", src.display(), dst.display());
                    claimed.insert(dst);
                    report.copied += 1;
                }
                Err(e) => {
                    log::warn!("Failed to copy {} to {}: {e}", src.display(), dst.display());
                    report.failures.push((src.to_path_buf(), e.to_string()));
                }
            }
        }

        report.groups_created = layout.created_count();
        report
    }
}

/// First of `name.ext`, `name_1.ext`, `name_2.ext`, ... not yet written
/// during this run.
fn unclaimed_destination(dir: &Path, file_name: &OsStr, claimed: &HashSet<PathBuf>) -> PathBuf {
    let first = dir.join(file_name);
    if !claimed.contains(&first) {
        return first;
    }

    let as_path = Path::new(file_name);
    let stem = as_path.file_stem().unwrap_or(file_name);
    let ext = as_path.extension();

    (1usize..)
        .map(|n| {
            let mut name = OsString::from(stem);
            name.push(format!("_{n}"));
            if let Some(ext) = ext {
                name.push(".");
                name.push(ext);
            }
            dir.join(name)
        })
        .find(|candidate| !claimed.contains(candidate))
        .unwrap_or(first)
}

use std::fmt;

use crate::clustering::domain::identity_clusterer::ClusterError;
use crate::shared::constants::NOISE_LABEL;
use crate::shared::image_record::ImageRecord;

/// Group id for one signature: a dense identity group, or noise.
///
/// Ids are only meaningful within one clustering run; the same person can
/// receive a different id when the batch changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterLabel {
    Group(usize),
    Noise,
}

impl ClusterLabel {
    /// Integer form, with noise as `-1`.
    pub fn as_i64(&self) -> i64 {
        match self {
            ClusterLabel::Group(id) => *id as i64,
            ClusterLabel::Noise => NOISE_LABEL,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Result of clustering a batch: exactly one label per record.
///
/// Produced in one step and never mutated.
#[derive(Debug, Default)]
pub struct ClusterAssignment {
    entries: Vec<(ImageRecord, ClusterLabel)>,
    group_count: usize,
}

impl ClusterAssignment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pairs records with labels, one label per record.
    pub fn new(
        records: Vec<ImageRecord>,
        labels: Vec<ClusterLabel>,
    ) -> Result<Self, ClusterError> {
        if records.len() != labels.len() {
            return Err(ClusterError::LabelCountMismatch {
                records: records.len(),
                labels: labels.len(),
            });
        }
        let group_count = labels
            .iter()
            .filter_map(|l| match l {
                ClusterLabel::Group(id) => Some(id + 1),
                ClusterLabel::Noise => None,
            })
            .max()
            .unwrap_or(0);
        Ok(Self {
            entries: records.into_iter().zip(labels).collect(),
            group_count,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of dense groups (noise excluded).
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn noise_count(&self) -> usize {
        self.entries.iter().filter(|(_, l)| l.is_noise()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ImageRecord, ClusterLabel)> {
        self.entries.iter().map(|(r, l)| (r, *l))
    }

    pub fn labels(&self) -> Vec<ClusterLabel> {
        self.entries.iter().map(|(_, l)| *l).collect()
    }

    /// Records carrying `label`, in batch order.
    pub fn members(&self, label: ClusterLabel) -> Vec<&ImageRecord> {
        self.entries
            .iter()
            .filter(|(_, l)| *l == label)
            .map(|(r, _)| r)
            .collect()
    }
}

use thiserror::Error;

use crate::clustering::domain::cluster_assignment::ClusterAssignment;
use crate::clustering::domain::signature_batch::SignatureBatch;

#[derive(Error, Debug, PartialEq)]
pub enum ClusterError {
    #[error("signature {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("signature {index} is empty")]
    EmptySignature { index: usize },
    #[error("signature {index} contains a non-finite value")]
    NonFinite { index: usize },
    #[error("{records} records but {labels} labels")]
    LabelCountMismatch { records: usize, labels: usize },
}

/// Domain interface for partitioning a complete batch into identity groups.
///
/// Batch-only: the whole batch must be gathered before this is called.
pub trait IdentityClusterer: Send {
    fn cluster(&self, batch: SignatureBatch) -> Result<ClusterAssignment, ClusterError>;
}

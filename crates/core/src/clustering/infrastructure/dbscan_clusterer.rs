//! Density-based clustering (DBSCAN) under Euclidean distance.
//!
//! A point is a core point when at least `min_neighbors` points, itself
//! included, lie within `epsilon` of it. Core points that are mutually
//! reachable form a group; non-core points within `epsilon` of a core point
//! join the first group that reaches them; everything else is noise.

use ndarray::{Array2, ArrayView2};

use crate::clustering::domain::cluster_assignment::{ClusterAssignment, ClusterLabel};
use crate::clustering::domain::identity_clusterer::{ClusterError, IdentityClusterer};
use crate::clustering::domain::signature_batch::SignatureBatch;
use crate::shared::face_signature::euclidean_distance;
use crate::shared::image_record::ImageRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanParams {
    /// Neighbourhood radius; distances `<= epsilon` count as neighbours.
    pub epsilon: f32,
    /// Minimum neighbourhood size, counting the point itself.
    pub min_neighbors: usize,
}

pub struct DbscanClusterer {
    params: DbscanParams,
}

impl DbscanClusterer {
    pub fn new(params: DbscanParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> DbscanParams {
        self.params
    }
}

impl IdentityClusterer for DbscanClusterer {
    fn cluster(&self, mut batch: SignatureBatch) -> Result<ClusterAssignment, ClusterError> {
        if batch.is_empty() {
            return Ok(ClusterAssignment::empty());
        }
        batch.sort_by_sequence();
        let records = batch.into_records();
        let points = pack_signatures(&records)?;

        let labels = dbscan(
            points.view(),
            self.params.epsilon,
            self.params.min_neighbors,
        );
        let assignment = ClusterAssignment::new(records, labels)?;
        log::info!(
            "Clustered {} faces into {} groups ({} noise, eps={}, min_neighbors={})",
            assignment.len(),
            assignment.group_count(),
            assignment.noise_count(),
            self.params.epsilon,
            self.params.min_neighbors
        );
        Ok(assignment)
    }
}

/// Packs signatures row-wise into an `n × dim` matrix, rejecting
/// inconsistent lengths and non-finite components.
fn pack_signatures(records: &[ImageRecord]) -> Result<Array2<f32>, ClusterError> {
    let dim = records[0].signature().len();
    let mut points = Array2::<f32>::zeros((records.len(), dim));

    for (index, record) in records.iter().enumerate() {
        let sig = record.signature();
        if sig.is_empty() {
            return Err(ClusterError::EmptySignature { index });
        }
        if sig.len() != dim {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected: dim,
                found: sig.len(),
            });
        }
        if !sig.is_finite() {
            return Err(ClusterError::NonFinite { index });
        }
        for (dst, src) in points.row_mut(index).iter_mut().zip(sig.as_slice()) {
            *dst = *src;
        }
    }
    Ok(points)
}

/// Neighbour lists (self included) for every row.
fn region_queries(points: ArrayView2<'_, f32>, epsilon: f32) -> Vec<Vec<usize>> {
    let n = points.nrows();
    let eps = epsilon as f64;
    let mut neighbors: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    for i in 0..n {
        let a = points.row(i);
        for j in (i + 1)..n {
            let b = points.row(j);
            let dist = match (a.as_slice(), b.as_slice()) {
                (Some(a), Some(b)) => euclidean_distance(a, b),
                _ => {
                    let diff = &a - &b;
                    (diff.dot(&diff) as f64).sqrt()
                }
            };
            if dist <= eps {
                neighbors[i].push(j);
                neighbors[j].push(i);
            }
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
    }
    neighbors
}

/// Labels every row of `points`. Group ids are numbered in the order their
/// first core point appears.
pub fn dbscan(points: ArrayView2<'_, f32>, epsilon: f32, min_neighbors: usize) -> Vec<ClusterLabel> {
    let n = points.nrows();
    if n == 0 {
        return Vec::new();
    }

    let neighbors = region_queries(points, epsilon);
    let is_core: Vec<bool> = neighbors
        .iter()
        .map(|list| list.len() >= min_neighbors)
        .collect();

    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut next_group = 0;

    for seed in 0..n {
        if labels[seed].is_some() || !is_core[seed] {
            continue;
        }
        let group = next_group;
        next_group += 1;
        labels[seed] = Some(group);

        let mut stack = vec![seed];
        while let Some(p) = stack.pop() {
            for &q in &neighbors[p] {
                if labels[q].is_some() {
                    continue;
                }
                labels[q] = Some(group);
                if is_core[q] {
                    stack.push(q);
                }
            }
        }
    }

    labels
        .into_iter()
        .map(|l| l.map_or(ClusterLabel::Noise, ClusterLabel::Group))
        .collect()
}

/// Fixed-length embedding summarising one face's appearance.
///
/// Signatures of the same person lie close together under Euclidean distance.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceSignature(Vec<f32>);

impl FaceSignature {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    pub fn euclidean_distance(&self, other: &FaceSignature) -> f64 {
        euclidean_distance(&self.0, &other.0)
    }

    /// Scaled to unit length. A zero vector is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let norm = self.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            self.0.iter_mut().for_each(|x| *x /= norm);
        }
        self
    }
}

impl From<Vec<f32>> for FaceSignature {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Euclidean distance accumulated in f64 over the shorter of the two slices.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

use crate::shared::image_record::ImageRecord;

/// Every face-bearing record of a run, collected before clustering starts.
///
/// Append-only; clustering takes the batch by value, so it is consumed
/// exactly once.
#[derive(Debug, Default)]
pub struct SignatureBatch {
    records: Vec<ImageRecord>,
}

impl SignatureBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ImageRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    /// Restores walk order after records arrived from parallel workers.
    pub fn sort_by_sequence(&mut self) {
        self.records.sort_by_key(|r| r.sequence());
    }

    pub fn into_records(self) -> Vec<ImageRecord> {
        self.records
    }
}

impl FromIterator<ImageRecord> for SignatureBatch {
    fn from_iter<I: IntoIterator<Item = ImageRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

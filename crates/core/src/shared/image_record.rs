use std::fmt;
use std::path::{Path, PathBuf};

use crate::shared::face_signature::FaceSignature;

/// Perceptual hash bytes of an image. Equality is bit-for-bit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// A retained photo with its detected face signature.
///
/// `sequence` is the file's position in walk order; it restores a
/// deterministic ordering after parallel extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRecord {
    path: PathBuf,
    sequence: usize,
    fingerprint: Option<Fingerprint>,
    signature: FaceSignature,
}

impl ImageRecord {
    pub fn new(
        path: PathBuf,
        sequence: usize,
        fingerprint: Option<Fingerprint>,
        signature: FaceSignature,
    ) -> Self {
        Self {
            path,
            sequence,
            fingerprint,
            signature,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// `None` when duplicate detection was disabled for the run.
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn signature(&self) -> &FaceSignature {
        &self.signature
    }
}

use crate::shared::image_record::Fingerprint;

/// Computes a coarse perceptual fingerprint of a decoded image.
///
/// Visually identical images (re-encodes, light recompression) must map to
/// the same value; distinct images should almost always differ.
pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, image: &image::DynamicImage) -> Fingerprint;
}

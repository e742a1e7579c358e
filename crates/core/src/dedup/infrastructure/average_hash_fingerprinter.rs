use image_hasher::{HashAlg, Hasher, HasherConfig};

use crate::dedup::domain::fingerprinter::Fingerprinter;
use crate::shared::image_record::Fingerprint;

/// Side length of the greyscale grid the image is reduced to.
pub const DEFAULT_GRID_SIZE: u32 = 8;

/// Average-intensity hash: downsample to a small greyscale grid and set one
/// bit per cell brighter than the grid mean.
pub struct AverageHashFingerprinter {
    hasher: Hasher,
}

impl AverageHashFingerprinter {
    pub fn new(grid_size: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Mean)
            .hash_size(grid_size, grid_size)
            .to_hasher();
        Self { hasher }
    }
}

impl Default for AverageHashFingerprinter {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl Fingerprinter for AverageHashFingerprinter {
    fn fingerprint(&self, image: &image::DynamicImage) -> Fingerprint {
        Fingerprint::new(self.hasher.hash_image(image).as_bytes())
    }
}

use std::path::Path;

/// Decodes a photo from disk.
///
/// Shared by reference across the loader thread, so implementations must be
/// `Sync`.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<image::DynamicImage, Box<dyn std::error::Error>>;
}

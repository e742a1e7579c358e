use std::path::Path;

use crate::imaging::domain::image_loader::ImageLoader;

/// Decodes image files with the `image` crate.
///
/// The format is sniffed from file contents, so a PNG saved with a `.jpg`
/// extension still decodes.
pub struct ImageFileLoader;

impl ImageFileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader for ImageFileLoader {
    fn load(&self, path: &Path) -> Result<image::DynamicImage, Box<dyn std::error::Error>> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(img)
    }
}

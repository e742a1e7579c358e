use ndarray::ArrayView3;

use crate::shared::region::Region;

/// A decoded photo: contiguous RGB bytes in row-major order.
///
/// Decoding happens at the I/O boundary; detection and embedding only see
/// raw pixels.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Square crop centred on `region`, grown by `margin` (fraction of the
    /// longer side) and clamped to the frame bounds.
    pub fn square_crop(&self, region: &Region, margin: f64) -> Frame {
        let fw = self.width as i32;
        let fh = self.height as i32;

        let cx = region.x + region.width / 2;
        let cy = region.y + region.height / 2;
        let side = region.width.max(region.height) as f64 * (1.0 + margin);
        let half = (side / 2.0).round() as i32;

        let x1 = (cx - half).clamp(0, fw) as usize;
        let y1 = (cy - half).clamp(0, fh) as usize;
        let x2 = (cx + half).clamp(0, fw) as usize;
        let y2 = (cy + half).clamp(0, fh) as usize;

        let crop_w = x2.saturating_sub(x1);
        let crop_h = y2.saturating_sub(y1);
        let channels = self.channels as usize;

        let src = self.as_ndarray();
        let mut data = Vec::with_capacity(crop_w * crop_h * channels);
        for row in y1..y2 {
            for col in x1..x2 {
                for c in 0..channels {
                    data.push(src[[row, col, c]]);
                }
            }
        }

        Frame::new(data, crop_w as u32, crop_h as u32, self.channels)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

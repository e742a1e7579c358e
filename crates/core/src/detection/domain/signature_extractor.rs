use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_embedder::FaceEmbedder;
use crate::shared::face_signature::FaceSignature;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Extra context around the detected box before embedding, as a fraction of
/// the box's longer side.
pub const DEFAULT_CROP_MARGIN: f64 = 0.2;

/// Which face represents an image when the detector finds several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacePolicy {
    /// The detector's first (most confident) region.
    #[default]
    FirstDetected,
    /// The region with the largest area; ties go to the more confident one.
    Largest,
}

impl FacePolicy {
    fn select<'a>(&self, regions: &'a [Region]) -> Option<&'a Region> {
        match self {
            FacePolicy::FirstDetected => regions.first(),
            FacePolicy::Largest => regions.iter().reduce(|best, r| {
                let area = |r: &Region| r.width as i64 * r.height as i64;
                if area(r) > area(best) {
                    r
                } else {
                    best
                }
            }),
        }
    }
}

/// Produces zero-or-one face signature per photo.
///
/// Detects faces, picks one per the [`FacePolicy`], crops it and embeds
/// the crop. A photo with no usable face yields `Ok(None)`.
pub struct SignatureExtractor {
    detector: Box<dyn FaceDetector>,
    embedder: Box<dyn FaceEmbedder>,
    policy: FacePolicy,
    crop_margin: f64,
}

impl SignatureExtractor {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        embedder: Box<dyn FaceEmbedder>,
        policy: FacePolicy,
    ) -> Self {
        Self {
            detector,
            embedder,
            policy,
            crop_margin: DEFAULT_CROP_MARGIN,
        }
    }

    pub fn with_crop_margin(mut self, margin: f64) -> Self {
        self.crop_margin = margin.max(0.0);
        self
    }

    pub fn extract(
        &mut self,
        frame: &Frame,
    ) -> Result<Option<FaceSignature>, Box<dyn std::error::Error>> {
        let regions = self.detector.detect(frame)?;
        let usable: Vec<Region> = regions
            .into_iter()
            .filter(|r| r.width > 0 && r.height > 0)
            .collect();

        let Some(region) = self.policy.select(&usable) else {
            return Ok(None);
        };
        if usable.len() > 1 {
            log::debug!(
                "{} faces detected, using one ({:?})",
                usable.len(),
                self.policy
            );
        }

        let crop = frame.square_crop(region, self.crop_margin);
        if crop.is_empty() {
            return Ok(None);
        }
        self.embedder.embed(&crop).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubDetector {
        regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }
    }

    /// Records crop sizes and returns the crop width as a 1-d signature.
    struct RecordingEmbedder {
        crops: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl FaceEmbedder for RecordingEmbedder {
        fn embed(&mut self, crop: &Frame) -> Result<FaceSignature, Box<dyn std::error::Error>> {
            self.crops
                .lock()
                .unwrap()
                .push((crop.width(), crop.height()));
            Ok(FaceSignature::new(vec![crop.width() as f32]))
        }
    }

    // --- Helpers ---

    fn frame() -> Frame {
        Frame::new(vec![128; 200 * 200 * 3], 200, 200, 3)
    }

    fn region(x: i32, y: i32, size: i32, confidence: f64) -> Region {
        Region {
            x,
            y,
            width: size,
            height: size,
            confidence,
        }
    }

    fn extractor(
        regions: Vec<Region>,
        policy: FacePolicy,
    ) -> (SignatureExtractor, Arc<Mutex<Vec<(u32, u32)>>>) {
        let crops = Arc::new(Mutex::new(Vec::new()));
        let ex = SignatureExtractor::new(
            Box::new(StubDetector { regions }),
            Box::new(RecordingEmbedder {
                crops: crops.clone(),
            }),
            policy,
        )
        .with_crop_margin(0.0);
        (ex, crops)
    }

    // --- Tests ---

    #[test]
    fn test_no_face_yields_none() {
        let (mut ex, crops) = extractor(Vec::new(), FacePolicy::FirstDetected);
        assert!(ex.extract(&frame()).unwrap().is_none());
        assert!(crops.lock().unwrap().is_empty());
    }

    #[test]
    fn test_first_detected_uses_only_first_region() {
        let (mut ex, crops) = extractor(
            vec![region(10, 10, 40, 0.9), region(100, 100, 80, 0.6)],
            FacePolicy::FirstDetected,
        );
        let sig = ex.extract(&frame()).unwrap().unwrap();
        assert_eq!(sig.as_slice(), &[40.0]);
        assert_eq!(crops.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_largest_policy_picks_biggest_region() {
        let (mut ex, _) = extractor(
            vec![region(10, 10, 40, 0.9), region(100, 100, 80, 0.6)],
            FacePolicy::Largest,
        );
        let sig = ex.extract(&frame()).unwrap().unwrap();
        assert_eq!(sig.as_slice(), &[80.0]);
    }

    #[test]
    fn test_largest_policy_tie_keeps_first() {
        let (mut ex, crops) = extractor(
            vec![region(10, 10, 40, 0.9), region(100, 100, 40, 0.6)],
            FacePolicy::Largest,
        );
        ex.extract(&frame()).unwrap();
        assert_eq!(crops.lock().unwrap()[0], (40, 40));
    }

    #[test]
    fn test_degenerate_regions_are_ignored() {
        let (mut ex, _) = extractor(vec![region(10, 10, 0, 0.9)], FacePolicy::FirstDetected);
        assert!(ex.extract(&frame()).unwrap().is_none());
    }

    #[test]
    fn test_crop_margin_applied() {
        let crops = Arc::new(Mutex::new(Vec::new()));
        let mut ex = SignatureExtractor::new(
            Box::new(StubDetector {
                regions: vec![region(80, 80, 40, 0.9)],
            }),
            Box::new(RecordingEmbedder {
                crops: crops.clone(),
            }),
            FacePolicy::FirstDetected,
        )
        .with_crop_margin(0.5);
        ex.extract(&frame()).unwrap();
        assert_eq!(crops.lock().unwrap()[0], (60, 60));
    }

    #[test]
    fn test_detector_error_propagates() {
        let mut ex = SignatureExtractor::new(
            Box::new(FailingDetector),
            Box::new(RecordingEmbedder {
                crops: Arc::new(Mutex::new(Vec::new())),
            }),
            FacePolicy::FirstDetected,
        );
        assert!(ex.extract(&frame()).is_err());
    }
}

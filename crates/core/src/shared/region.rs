use std::cmp::Ordering;

/// A detected face bounding box in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
}

impl Region {
    /// Builds a region from corner coordinates, clamped to the frame.
    pub fn from_corners(
        (x1, y1, x2, y2): (f64, f64, f64, f64),
        frame_width: u32,
        frame_height: u32,
        confidence: f64,
    ) -> Self {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let cx1 = x1.clamp(0.0, fw).round() as i32;
        let cy1 = y1.clamp(0.0, fh).round() as i32;
        let cx2 = x2.clamp(0.0, fw).round() as i32;
        let cy2 = y2.clamp(0.0, fh).round() as i32;
        Self {
            x: cx1,
            y: cy1,
            width: (cx2 - cx1).max(0),
            height: (cy2 - cy1).max(0),
            confidence,
        }
    }

    /// Sorts regions so the most confident detection comes first.
    ///
    /// Ties keep their original relative order.
    pub fn sort_by_confidence(regions: &mut [Region]) {
        regions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn region(confidence: f64) -> Region {
        Region {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
            confidence,
        }
    }

    #[test]
    fn test_from_corners_inside_frame() {
        let r = Region::from_corners((10.0, 20.0, 60.0, 80.0), 100, 100, 0.8);
        assert_eq!((r.x, r.y, r.width, r.height), (10, 20, 50, 60));
        assert_eq!(r.confidence, 0.8);
    }

    #[rstest]
    #[case::left_edge((-20.0, 10.0, 30.0, 40.0), (0, 10, 30, 30))]
    #[case::right_edge((80.0, 10.0, 130.0, 40.0), (80, 10, 20, 30))]
    #[case::fully_outside((150.0, 150.0, 200.0, 200.0), (100, 100, 0, 0))]
    fn test_from_corners_clamps(
        #[case] corners: (f64, f64, f64, f64),
        #[case] expected: (i32, i32, i32, i32),
    ) {
        let r = Region::from_corners(corners, 100, 100, 0.5);
        assert_eq!((r.x, r.y, r.width, r.height), expected);
    }

    #[test]
    fn test_sort_by_confidence_descending() {
        let mut regions = vec![region(0.3), region(0.9), region(0.6)];
        Region::sort_by_confidence(&mut regions);
        let confs: Vec<f64> = regions.iter().map(|r| r.confidence).collect();
        assert_eq!(confs, vec![0.9, 0.6, 0.3]);
    }

    #[test]
    fn test_sort_by_confidence_empty() {
        let mut regions: Vec<Region> = Vec::new();
        Region::sort_by_confidence(&mut regions);
        assert!(regions.is_empty());
    }
}

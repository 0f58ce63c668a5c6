//! Integer boxes for objects pasted onto a canvas.

use serde::Serialize;

use super::{BBoxXYXY, Pixel};

/// An object footprint on the output canvas, in whole pixels.
///
/// `(x, y)` is the top-left corner. A placed box never extends past the
/// canvas it was placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PlacedBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PlacedBox {
    #[inline]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Area shared with `other`, zero when the boxes do not touch.
    pub fn intersection_area(&self, other: &PlacedBox) -> u64 {
        let xa = u64::from(self.x.max(other.x));
        let ya = u64::from(self.y.max(other.y));
        let xb = (u64::from(self.x) + u64::from(self.width))
            .min(u64::from(other.x) + u64::from(other.width));
        let yb = (u64::from(self.y) + u64::from(self.height))
            .min(u64::from(other.y) + u64::from(other.height));

        xb.saturating_sub(xa) * yb.saturating_sub(ya)
    }

    /// Intersection over union.
    ///
    /// Union is the sum of both areas minus the intersection; when that is
    /// zero (two empty boxes) the IoU is defined as 0.
    pub fn iou(&self, other: &PlacedBox) -> f64 {
        let inter = self.intersection_area(other);
        let union = self.area() + other.area() - inter;
        if union == 0 {
            return 0.0;
        }
        inter as f64 / union as f64
    }

    /// Returns true if the box lies entirely inside a `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }

    pub fn to_bbox(&self) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xywh(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.width),
            f64::from(self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_of_box_with_itself_is_one() {
        let a = PlacedBox::new(10, 20, 30, 40);
        assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = PlacedBox::new(0, 0, 10, 10);
        let b = PlacedBox::new(50, 50, 10, 10);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = PlacedBox::new(0, 0, 10, 10);
        let b = PlacedBox::new(10, 0, 10, 10);
        assert_eq!(a.intersection_area(&b), 0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn partial_overlap() {
        // 5x10 shared strip, union 100 + 100 - 50
        let a = PlacedBox::new(0, 0, 10, 10);
        let b = PlacedBox::new(5, 0, 10, 10);
        assert_eq!(a.intersection_area(&b), 50);
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-12);
        assert_eq!(a.iou(&b), b.iou(&a));
    }

    #[test]
    fn degenerate_boxes_have_zero_iou() {
        let a = PlacedBox::new(3, 3, 0, 0);
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn fits_within_checks_far_edges() {
        assert!(PlacedBox::new(412, 412, 100, 100).fits_within(512, 512));
        assert!(!PlacedBox::new(413, 0, 100, 100).fits_within(512, 512));
        assert!(!PlacedBox::new(0, 413, 100, 100).fits_within(512, 512));
    }
}

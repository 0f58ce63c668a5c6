//! Axis-aligned boxes in XYXY form.

use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// An axis-aligned bounding box stored as (xmin, ymin, xmax, ymax).
///
/// `TSpace` is either [`Pixel`] or [`Normalized`]. Conversions between the
/// two go through [`to_normalized`](BBoxXYXY::to_normalized) and
/// [`to_pixel`](BBoxXYXY::to_pixel), which need the image dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    /// Builds a box from its top-left corner and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Builds a box from its center and size, the layout of a YOLO label row.
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::from_xyxy(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns (x, y, width, height) with (x, y) the top-left corner.
    #[inline]
    pub fn to_xywh(&self) -> (f64, f64, f64, f64) {
        (self.xmin, self.ymin, self.width(), self.height())
    }

    /// Returns (center x, center y, width, height).
    #[inline]
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (
            (self.xmin + self.xmax) / 2.0,
            (self.ymin + self.ymax) / 2.0,
            self.width(),
            self.height(),
        )
    }
}

impl BBoxXYXY<Pixel> {
    /// Divides by the image dimensions.
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_xyxy(
            self.xmin / image_width,
            self.ymin / image_height,
            self.xmax / image_width,
            self.ymax / image_height,
        )
    }
}

impl BBoxXYXY<Normalized> {
    /// Multiplies by the image dimensions.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xyxy(
            self.xmin * image_width,
            self.ymin * image_height,
            self.xmax * image_width,
            self.ymax * image_height,
        )
    }

    /// Returns true if every coordinate lies in `[0, 1]`.
    pub fn is_within_unit(&self) -> bool {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cxcywh_conversion_matches_corners() {
        let bbox: BBoxXYXY<Normalized> = BBoxXYXY::from_cxcywh(0.5, 0.5, 0.2, 0.4);
        assert!((bbox.xmin - 0.4).abs() < 1e-12);
        assert!((bbox.ymin - 0.3).abs() < 1e-12);
        assert!((bbox.xmax - 0.6).abs() < 1e-12);
        assert!((bbox.ymax - 0.7).abs() < 1e-12);

        let (cx, cy, w, h) = bbox.to_cxcywh();
        assert!((cx - 0.5).abs() < 1e-12);
        assert!((cy - 0.5).abs() < 1e-12);
        assert!((w - 0.2).abs() < 1e-12);
        assert!((h - 0.4).abs() < 1e-12);
    }

    #[test]
    fn pixel_normalized_scaling() {
        let px: BBoxXYXY<Pixel> = BBoxXYXY::from_xywh(100.0, 50.0, 200.0, 100.0);
        let norm = px.to_normalized(400.0, 200.0);
        assert_eq!(norm.xmin, 0.25);
        assert_eq!(norm.ymin, 0.25);
        assert_eq!(norm.xmax, 0.75);
        assert_eq!(norm.ymax, 0.75);
        assert!(norm.is_within_unit());
        assert_eq!(norm.to_pixel(400.0, 200.0), px);
    }

    #[test]
    fn out_of_unit_box_is_detected() {
        let norm: BBoxXYXY<Normalized> = BBoxXYXY::from_cxcywh(0.95, 0.5, 0.2, 0.2);
        assert!(!norm.is_within_unit());
    }
}

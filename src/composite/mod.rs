//! Pasting object crops onto a canvas.
//!
//! Crops come from background-removed photos where the removed area is
//! black. The paste is a hard binary cut: a crop pixel whose luma exceeds
//! [`FOREGROUND_THRESHOLD`] replaces the canvas pixel, every other canvas
//! pixel is left untouched. Edges are not anti-aliased.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};

use crate::error::SynthError;
use crate::geom::PlacedBox;

/// Luma values strictly above this are foreground.
pub const FOREGROUND_THRESHOLD: u8 = 1;

/// Resize a crop to exactly `width` x `height` with bilinear filtering.
pub fn resize_crop(crop: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(crop, width, height, FilterType::Triangle)
}

/// Binary mask of a crop: 255 for foreground, 0 for background.
pub fn foreground_mask(crop: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(crop);
    threshold(&gray, FOREGROUND_THRESHOLD, ThresholdType::Binary)
}

/// Paste `crop` onto `canvas` with its top-left corner at `(x, y)`.
pub fn paste_object(canvas: &mut RgbImage, crop: &RgbImage, x: u32, y: u32) -> Result<(), SynthError> {
    let footprint = PlacedBox::new(x, y, crop.width(), crop.height());
    if !footprint.fits_within(canvas.width(), canvas.height()) {
        return Err(SynthError::PasteOutOfBounds {
            x,
            y,
            width: crop.width(),
            height: crop.height(),
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
        });
    }

    let mask = foreground_mask(crop);
    for (px, py, pixel) in crop.enumerate_pixels() {
        if mask.get_pixel(px, py)[0] > 0 {
            canvas.put_pixel(x + px, y + py, *pixel);
        }
    }

    Ok(())
}

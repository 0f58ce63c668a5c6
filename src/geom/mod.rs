//! Geometry for synthetic placement and YOLO labels.
//!
//! Two coordinate spaces are in play: absolute canvas pixels, where
//! placement and overlap checks happen, and normalized `[0, 1]` values,
//! which is what YOLO label files store. Boxes carry their space as a
//! zero-sized type parameter so the two cannot be mixed by accident.

mod bbox;
mod placed;

pub use bbox::BBoxXYXY;
pub use placed::PlacedBox;

/// Marker for absolute pixel coordinates, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker for coordinates normalized by the image dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Normalized {}

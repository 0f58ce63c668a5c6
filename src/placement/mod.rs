//! Placement engine: which entries go into a sample, how many copies, how
//! large, and where.
//!
//! Every draw takes the caller's random source, so a seeded [`StdRng`]
//! reproduces a run exactly. Position search is bounded: an instance that
//! finds no acceptable spot within [`MAX_PLACEMENT_ATTEMPTS`] draws is
//! dropped rather than retried further.

use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::{GeneratorSettings, ImageSize};
use crate::error::SynthError;
use crate::geom::PlacedBox;

/// Position draws per instance before it is given up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 20;

/// Inclusive range of the uniform resize factor applied to source crops.
pub const SCALE_RANGE: (f64, f64) = (0.3, 0.7);

/// An accepted object: its box on the canvas and the class it is labeled with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlacedObject {
    pub class_id: usize,
    pub bbox: PlacedBox,
}

/// Result of searching a position for one instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// A position within the overlap bound was found.
    Placed(PlacedBox),
    /// Every attempt overlapped an accepted box too much.
    Exhausted,
    /// The scaled object is empty or larger than the canvas.
    DoesNotFit,
}

/// Random decisions for one generation run.
#[derive(Clone, Debug)]
pub struct PlacementEngine {
    max_classes: usize,
    max_overlap: f64,
    canvas: ImageSize,
    count_dist: Uniform<u32>,
    scale_dist: Uniform<f64>,
}

impl PlacementEngine {
    pub fn new(settings: &GeneratorSettings) -> Result<Self, SynthError> {
        settings.validate()?;

        let count_dist = Uniform::new_inclusive(1, settings.max_objects_per_class).map_err(
            |source| SynthError::InvalidConfig {
                message: format!("object count range: {source}"),
            },
        )?;
        let scale_dist = Uniform::new_inclusive(SCALE_RANGE.0, SCALE_RANGE.1).map_err(
            |source| SynthError::InvalidConfig {
                message: format!("scale range: {source}"),
            },
        )?;

        Ok(Self {
            max_classes: settings.max_classes,
            max_overlap: settings.max_overlap,
            canvas: settings.image_size,
            count_dist,
            scale_dist,
        })
    }

    pub fn canvas(&self) -> ImageSize {
        self.canvas
    }

    /// Pick `min(max_classes, catalog_len)` distinct catalog indices.
    ///
    /// Every subset is equally likely; the returned order is random too.
    pub fn select_entries(&self, catalog_len: usize, rng: &mut StdRng) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..catalog_len).collect();
        indices.shuffle(rng);
        indices.truncate(self.max_classes.min(catalog_len));
        indices
    }

    /// Number of instances of one entry, uniform in `[1, max_objects_per_class]`.
    pub fn draw_count(&self, rng: &mut StdRng) -> u32 {
        self.count_dist.sample(rng)
    }

    /// Resize factor, uniform in [`SCALE_RANGE`].
    pub fn draw_scale(&self, rng: &mut StdRng) -> f64 {
        self.scale_dist.sample(rng)
    }

    /// Search a top-left corner for a `width` x `height` object.
    ///
    /// Each attempt draws `x` in `[0, canvas_width - width]` and `y` in
    /// `[0, canvas_height - height]`; the first candidate whose IoU with
    /// every box in `placed` is at most `max_overlap` wins.
    pub fn try_place(
        &self,
        placed: &[PlacedBox],
        width: u32,
        height: u32,
        rng: &mut StdRng,
    ) -> PlacementOutcome {
        if width == 0 || height == 0 || width > self.canvas.width || height > self.canvas.height {
            return PlacementOutcome::DoesNotFit;
        }

        let (Ok(xs), Ok(ys)) = (
            Uniform::new_inclusive(0, self.canvas.width - width),
            Uniform::new_inclusive(0, self.canvas.height - height),
        ) else {
            return PlacementOutcome::DoesNotFit;
        };

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = PlacedBox::new(xs.sample(rng), ys.sample(rng), width, height);
            if placed
                .iter()
                .all(|existing| candidate.iou(existing) <= self.max_overlap)
            {
                return PlacementOutcome::Placed(candidate);
            }
        }

        PlacementOutcome::Exhausted
    }
}

/// Size of a `width` x `height` crop after scaling, truncated to whole pixels.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    (
        (f64::from(width) * scale) as u32,
        (f64::from(height) * scale) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn engine(max_classes: usize, max_objects: u32, max_overlap: f64) -> PlacementEngine {
        PlacementEngine::new(&GeneratorSettings {
            image_size: ImageSize::new(100, 200),
            max_classes,
            max_objects_per_class: max_objects,
            max_overlap,
            ..Default::default()
        })
        .expect("valid settings")
    }

    #[test]
    fn select_entries_draws_distinct_indices() {
        let engine = engine(3, 5, 0.2);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let picked = engine.select_entries(10, &mut rng);
            assert_eq!(picked.len(), 3);
            let unique: HashSet<_> = picked.iter().copied().collect();
            assert_eq!(unique.len(), 3);
            assert!(picked.iter().all(|&i| i < 10));
        }

        assert_eq!(engine.select_entries(2, &mut rng).len(), 2);
        assert!(engine.select_entries(0, &mut rng).is_empty());
    }

    #[test]
    fn select_entries_is_deterministic_with_seed() {
        let engine = engine(4, 5, 0.2);
        let a = engine.select_entries(20, &mut StdRng::seed_from_u64(42));
        let b = engine.select_entries(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn draws_stay_in_range() {
        let engine = engine(3, 4, 0.2);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen_counts = HashSet::new();

        for _ in 0..500 {
            let count = engine.draw_count(&mut rng);
            assert!((1..=4).contains(&count));
            seen_counts.insert(count);

            let scale = engine.draw_scale(&mut rng);
            assert!((SCALE_RANGE.0..=SCALE_RANGE.1).contains(&scale));
        }

        assert_eq!(seen_counts.len(), 4);
    }

    #[test]
    fn scaled_size_truncates() {
        assert_eq!(scaled_size(100, 51, 0.5), (50, 25));
        assert_eq!(scaled_size(3, 3, 0.3), (0, 0));
    }

    #[test]
    fn try_place_keeps_box_inside_canvas() {
        let engine = engine(3, 5, 1.0);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..200 {
            match engine.try_place(&[], 60, 40, &mut rng) {
                PlacementOutcome::Placed(bbox) => {
                    assert!(bbox.fits_within(200, 100));
                    assert_eq!((bbox.width, bbox.height), (60, 40));
                }
                other => panic!("expected placement, got {other:?}"),
            }
        }
    }

    #[test]
    fn full_canvas_object_has_one_position() {
        let engine = engine(3, 5, 0.2);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            engine.try_place(&[], 200, 100, &mut rng),
            PlacementOutcome::Placed(PlacedBox::new(0, 0, 200, 100))
        );
    }

    #[test]
    fn oversized_or_empty_objects_do_not_fit() {
        let engine = engine(3, 5, 0.2);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            engine.try_place(&[], 201, 10, &mut rng),
            PlacementOutcome::DoesNotFit
        );
        assert_eq!(
            engine.try_place(&[], 10, 101, &mut rng),
            PlacementOutcome::DoesNotFit
        );
        assert_eq!(
            engine.try_place(&[], 0, 10, &mut rng),
            PlacementOutcome::DoesNotFit
        );
    }

    #[test]
    fn crowded_canvas_exhausts_attempts() {
        // Any 150x80 box on a 200x100 canvas overlaps another one heavily.
        let engine = engine(3, 5, 0.0);
        let mut rng = StdRng::seed_from_u64(11);
        let existing = [PlacedBox::new(25, 10, 150, 80)];

        assert_eq!(
            engine.try_place(&existing, 150, 80, &mut rng),
            PlacementOutcome::Exhausted
        );
    }

    #[test]
    fn accepted_boxes_respect_overlap_bound() {
        let engine = engine(3, 5, 0.1);
        let mut rng = StdRng::seed_from_u64(5);
        let mut placed = Vec::new();

        for _ in 0..40 {
            if let PlacementOutcome::Placed(bbox) = engine.try_place(&placed, 40, 30, &mut rng) {
                placed.push(bbox);
            }
        }

        assert!(!placed.is_empty());
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(a.iou(b) <= 0.1 + 1e-12);
            }
        }
    }
}

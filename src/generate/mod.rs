//! The synthetic dataset generator.
//!
//! Samples are produced one after another. Each sample owns a fresh black
//! canvas and its own list of accepted boxes; the source catalog is shared
//! read-only. All randomness comes from the [`StdRng`] handed to
//! [`SyntheticDatasetGenerator::generate`].

mod report;

use image::RgbImage;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::catalog::{SourceCatalog, SourceEntry};
use crate::composite::{paste_object, resize_crop};
use crate::config::{GeneratorConfig, GeneratorSettings, UnreadableImagePolicy};
use crate::error::SynthError;
use crate::geom::PlacedBox;
use crate::placement::{scaled_size, PlacedObject, PlacementEngine, PlacementOutcome};
use crate::writer::{write_data_yaml, write_sample, OutputLayout, OutputSample};

pub use report::{GenerationReport, SampleStats};

/// One sample as written to disk.
#[derive(Clone, Debug)]
pub struct GeneratedSample {
    pub index: usize,
    pub output: OutputSample,
    /// Accepted objects in acceptance order, matching the label file lines.
    pub objects: Vec<PlacedObject>,
    pub stats: SampleStats,
}

/// Composites catalog objects onto blank canvases and writes YOLO labels.
#[derive(Debug)]
pub struct SyntheticDatasetGenerator {
    settings: GeneratorSettings,
    catalog: SourceCatalog,
    engine: PlacementEngine,
    layout: OutputLayout,
}

impl SyntheticDatasetGenerator {
    /// Validate settings, create the output directories and load the catalog.
    pub fn new(config: GeneratorConfig) -> Result<Self, SynthError> {
        let engine = PlacementEngine::new(&config.settings)?;
        let layout = OutputLayout::create(&config.output_dir)?;
        let catalog = SourceCatalog::load(
            &config.image_paths,
            &config.label_paths,
            config.settings.malformed_labels,
        )?;

        Ok(Self {
            settings: config.settings,
            catalog,
            engine,
            layout,
        })
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Write samples `0..n_samples` and the `data.yaml` class map.
    pub fn generate(
        &self,
        n_samples: usize,
        rng: &mut StdRng,
    ) -> Result<GenerationReport, SynthError> {
        if self.catalog.is_empty() {
            warn!("source catalog is empty; every sample will be a blank canvas");
        }

        info!(
            samples = n_samples,
            entries = self.catalog.len(),
            output = %self.layout.root.display(),
            "generating synthetic dataset"
        );

        let mut report = GenerationReport::new(&self.layout.root, self.catalog.len());
        for index in 0..n_samples {
            let sample = self.generate_sample(index, rng)?;
            debug!(
                index,
                placed = sample.stats.placed,
                requested = sample.stats.requested(),
                "wrote sample"
            );
            report.record(&sample.stats);
        }

        write_data_yaml(&self.layout.root, &self.catalog.class_ids())?;

        info!(
            samples = report.samples,
            objects = report.objects_placed,
            dropped = report.lost_instances(),
            "generation finished"
        );
        Ok(report)
    }

    /// Build and write a single sample.
    pub fn generate_sample(
        &self,
        index: usize,
        rng: &mut StdRng,
    ) -> Result<GeneratedSample, SynthError> {
        let size = self.engine.canvas();
        let mut canvas = RgbImage::new(size.width, size.height);
        let mut placed: Vec<PlacedBox> = Vec::new();
        let mut objects: Vec<PlacedObject> = Vec::new();
        let mut stats = SampleStats::default();

        for entry_index in self.engine.select_entries(self.catalog.len(), rng) {
            let Some(entry) = self.catalog.get(entry_index) else {
                continue;
            };

            let count = self.engine.draw_count(rng) as usize;
            let Some(crop) = self.load_crop(entry)? else {
                stats.skipped_unreadable += count;
                continue;
            };

            for _ in 0..count {
                let scale = self.engine.draw_scale(rng);
                let (width, height) = scaled_size(crop.width(), crop.height(), scale);

                match self.engine.try_place(&placed, width, height, rng) {
                    PlacementOutcome::Placed(bbox) => {
                        let resized = resize_crop(&crop, width, height);
                        paste_object(&mut canvas, &resized, bbox.x, bbox.y)?;
                        placed.push(bbox);
                        objects.push(PlacedObject {
                            class_id: entry.class_id(),
                            bbox,
                        });
                        stats.placed += 1;
                    }
                    PlacementOutcome::Exhausted => {
                        debug!(index, width, height, "no position within overlap limit");
                        stats.dropped_after_attempts += 1;
                    }
                    PlacementOutcome::DoesNotFit => {
                        debug!(
                            index,
                            width,
                            height,
                            image = %entry.image_path.display(),
                            "scaled object does not fit the canvas"
                        );
                        stats.unplaceable += 1;
                    }
                }
            }
        }

        let output = write_sample(&self.layout, index, &canvas, &objects)?;
        Ok(GeneratedSample {
            index,
            output,
            objects,
            stats,
        })
    }

    /// Decode an entry's image, or `None` when it is unreadable and the
    /// policy says to skip it.
    fn load_crop(&self, entry: &SourceEntry) -> Result<Option<RgbImage>, SynthError> {
        match image::open(&entry.image_path) {
            Ok(img) => Ok(Some(img.to_rgb8())),
            Err(source) => match self.settings.unreadable_images {
                UnreadableImagePolicy::Skip => {
                    warn!(
                        image = %entry.image_path.display(),
                        error = %source,
                        "cannot read source image, skipping it for this sample"
                    );
                    Ok(None)
                }
                UnreadableImagePolicy::Abort => Err(SynthError::ImageRead {
                    path: entry.image_path.clone(),
                    source,
                }),
            },
        }
    }
}

//! Generator configuration.
//!
//! [`GeneratorSettings`] holds the tunable knobs and can be read from a YAML
//! file; [`GeneratorConfig`] adds the input and output paths of one run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub height: u32,
    pub width: u32,
}

impl ImageSize {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

/// Largest canvas side the JPEG encoder accepts.
pub const MAX_CANVAS_SIDE: u32 = 65_535;

impl Default for ImageSize {
    fn default() -> Self {
        Self::new(512, 512)
    }
}

/// What to do with a label line that does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLabelPolicy {
    /// Fail the catalog load.
    #[default]
    Abort,
    /// Drop the offending line and keep the rest of the file.
    SkipLine,
}

/// What to do when a source image cannot be decoded during generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreadableImagePolicy {
    /// Skip that entry for the current sample and log a warning.
    #[default]
    Skip,
    /// Fail the whole run.
    Abort,
}

/// Tunable generation parameters.
///
/// Missing keys in a YAML file fall back to the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    pub image_size: ImageSize,
    /// Maximum number of distinct source entries sampled per output image.
    pub max_classes: usize,
    /// Maximum number of instances of one entry per output image.
    pub max_objects_per_class: u32,
    /// Upper bound on the IoU between any two placed objects.
    pub max_overlap: f64,
    pub malformed_labels: MalformedLabelPolicy,
    pub unreadable_images: UnreadableImagePolicy,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            image_size: ImageSize::default(),
            max_classes: 3,
            max_objects_per_class: 5,
            max_overlap: 0.2,
            malformed_labels: MalformedLabelPolicy::default(),
            unreadable_images: UnreadableImagePolicy::default(),
        }
    }
}

impl GeneratorSettings {
    /// Read settings from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SynthError> {
        let data = fs::read_to_string(path)?;
        serde_yaml::from_str(&data).map_err(|source| SynthError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check that the settings describe a generation that can run.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.image_size.height == 0 || self.image_size.width == 0 {
            return Err(SynthError::InvalidConfig {
                message: format!(
                    "image size must be non-zero, got {}x{} (height x width)",
                    self.image_size.height, self.image_size.width
                ),
            });
        }

        if self.image_size.height > MAX_CANVAS_SIDE || self.image_size.width > MAX_CANVAS_SIDE {
            return Err(SynthError::InvalidConfig {
                message: format!(
                    "image size must not exceed {MAX_CANVAS_SIDE} pixels per side, got {}x{} (height x width)",
                    self.image_size.height, self.image_size.width
                ),
            });
        }

        if self.max_classes == 0 {
            return Err(SynthError::InvalidConfig {
                message: "max_classes must be at least 1".to_string(),
            });
        }

        if self.max_objects_per_class == 0 {
            return Err(SynthError::InvalidConfig {
                message: "max_objects_per_class must be at least 1".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.max_overlap) {
            return Err(SynthError::InvalidConfig {
                message: format!(
                    "max_overlap must be in the interval [0.0, 1.0], got {}",
                    self.max_overlap
                ),
            });
        }

        Ok(())
    }
}

/// Everything needed to construct a generator.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Source object images, paired by index with `label_paths`.
    pub image_paths: Vec<PathBuf>,
    pub label_paths: Vec<PathBuf>,
    /// Root that receives `images/`, `labels/` and `data.yaml`.
    pub output_dir: PathBuf,
    pub settings: GeneratorSettings,
}

impl GeneratorConfig {
    pub fn new(
        image_paths: Vec<PathBuf>,
        label_paths: Vec<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            image_paths,
            label_paths,
            output_dir: output_dir.into(),
            settings: GeneratorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }
}

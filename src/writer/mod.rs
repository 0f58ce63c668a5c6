//! Writing generated samples as a YOLO dataset.
//!
//! Layout under the output root:
//!
//! ```text
//! images/00000.jpg
//! labels/00000.txt
//! data.yaml
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::config::ImageSize;
use crate::error::SynthError;
use crate::geom::PlacedBox;
use crate::placement::PlacedObject;

const IMAGE_EXTENSION: &str = "jpg";
const LABEL_EXTENSION: &str = "txt";

/// Output directories of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

impl OutputLayout {
    /// Create `images/` and `labels/` under `root`. Existing directories are fine.
    pub fn create(root: &Path) -> Result<Self, SynthError> {
        let images_dir = root.join("images");
        let labels_dir = root.join("labels");
        fs::create_dir_all(&images_dir)?;
        fs::create_dir_all(&labels_dir)?;

        Ok(Self {
            root: root.to_path_buf(),
            images_dir,
            labels_dir,
        })
    }
}

/// Files written for one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputSample {
    pub image_file: PathBuf,
    pub label_file: PathBuf,
}

/// Zero-padded file stem of a sample, e.g. `00042`.
pub fn sample_stem(index: usize) -> String {
    format!("{index:05}")
}

/// One YOLO label line for a box on a canvas of the given size.
pub fn label_line(class_id: usize, bbox: &PlacedBox, canvas: ImageSize) -> String {
    let norm = bbox
        .to_bbox()
        .to_normalized(f64::from(canvas.width), f64::from(canvas.height));
    let (cx, cy, w, h) = norm.to_cxcywh();
    format!("{} {:.6} {:.6} {:.6} {:.6}", class_id, cx, cy, w, h)
}

/// Label file contents: one line per object, no trailing newline.
pub fn label_file_contents(objects: &[PlacedObject], canvas: ImageSize) -> String {
    objects
        .iter()
        .map(|obj| label_line(obj.class_id, &obj.bbox, canvas))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Persist the canvas and its labels as sample `index`.
pub fn write_sample(
    layout: &OutputLayout,
    index: usize,
    canvas: &RgbImage,
    objects: &[PlacedObject],
) -> Result<OutputSample, SynthError> {
    let stem = sample_stem(index);
    let image_file = layout
        .images_dir
        .join(&stem)
        .with_extension(IMAGE_EXTENSION);
    let label_file = layout
        .labels_dir
        .join(&stem)
        .with_extension(LABEL_EXTENSION);

    canvas
        .save(&image_file)
        .map_err(|source| SynthError::ImageWrite {
            path: image_file.clone(),
            source,
        })?;

    let size = ImageSize::new(canvas.height(), canvas.width());
    fs::write(&label_file, label_file_contents(objects, size))?;

    Ok(OutputSample {
        image_file,
        label_file,
    })
}

/// Write `data.yaml` naming classes `class_0` up to the largest id in use.
pub fn write_data_yaml(root: &Path, class_ids: &BTreeSet<usize>) -> Result<(), SynthError> {
    let mut yaml = String::from("path: .\ntrain: images\nnames:\n");
    if let Some(&max_id) = class_ids.last() {
        for id in 0..=max_id {
            yaml.push_str(&format!(
                "  {}: {}\n",
                id,
                yaml_single_quoted(&format!("class_{id}"))
            ));
        }
    }

    fs::write(root.join("data.yaml"), yaml)?;
    Ok(())
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// A solid object on a black (removed) background with a 1px border,
/// written as PNG.
pub fn write_object_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            Rgb([0, 0, 0])
        } else {
            Rgb(color)
        }
    });
    img.save(path).expect("write png");
}

pub fn write_label(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write label file");
}

/// Source layout under `root`: `images/<name>.png` + `labels/<name>.txt`.
pub struct SourceDir {
    pub images: PathBuf,
    pub labels: PathBuf,
    pub image_paths: Vec<PathBuf>,
    pub label_paths: Vec<PathBuf>,
}

impl SourceDir {
    pub fn new(root: &Path) -> Self {
        let images = root.join("images");
        let labels = root.join("labels");
        fs::create_dir_all(&images).expect("create images dir");
        fs::create_dir_all(&labels).expect("create labels dir");
        Self {
            images,
            labels,
            image_paths: Vec::new(),
            label_paths: Vec::new(),
        }
    }

    /// Add an object; `label` of `None` leaves the label file absent.
    pub fn add(&mut self, name: &str, width: u32, height: u32, label: Option<&str>) -> &mut Self {
        let image_path = self.images.join(format!("{name}.png"));
        let label_path = self.labels.join(format!("{name}.txt"));
        write_object_png(&image_path, width, height, [230, 180, 40]);
        if let Some(label) = label {
            write_label(&label_path, label);
        }
        self.image_paths.push(image_path);
        self.label_paths.push(label_path);
        self
    }
}

/// One parsed output label line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputLabel {
    pub class_id: usize,
    pub values: [f64; 4],
}

/// Parse a generated label file, checking the 6-decimal formatting.
pub fn read_output_labels(path: &Path) -> Vec<OutputLabel> {
    let contents = fs::read_to_string(path).expect("read output labels");
    assert!(!contents.ends_with('\n'), "label file must not end with a newline");

    contents
        .lines()
        .map(|line| {
            let tokens: Vec<&str> = line.split(' ').collect();
            assert_eq!(tokens.len(), 5, "bad label line: {line}");
            let class_id = tokens[0].parse().expect("class id");
            let mut values = [0.0; 4];
            for (slot, token) in values.iter_mut().zip(&tokens[1..]) {
                let decimals = token.split('.').nth(1).expect("decimal point");
                assert_eq!(decimals.len(), 6, "expected 6 decimals in {token}");
                *slot = token.parse().expect("float value");
            }
            OutputLabel { class_id, values }
        })
        .collect()
}

//! Pairing object images with label files on disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SynthError;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "png", "jpeg", "bmp", "webp"];
const LABEL_EXTENSION: &str = "txt";

/// An object image and the label file expected to describe it.
///
/// The label file may not exist; the catalog loader skips such pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourcePair {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
}

impl SourcePair {
    pub fn has_label(&self) -> bool {
        self.label_path.is_file()
    }
}

/// Pair every image under `images_dir` with `labels_dir/<relative stem>.txt`.
///
/// Images are found recursively and returned sorted by their path relative
/// to `images_dir`, so `images/a/x.png` pairs with `labels/a/x.txt`.
pub fn discover_pairs(images_dir: &Path, labels_dir: &Path) -> Result<Vec<SourcePair>, SynthError> {
    if !images_dir.is_dir() {
        return Err(SynthError::Layout {
            path: images_dir.to_path_buf(),
            message: "images path must be a directory".to_string(),
        });
    }

    let mut image_files = collect_files_with_extensions(images_dir, &IMAGE_EXTENSIONS)?;
    image_files.sort_by_cached_key(|image_path| rel_string(images_dir, image_path));

    Ok(image_files
        .into_iter()
        .map(|image_path| {
            let rel = image_path.strip_prefix(images_dir).unwrap_or(&image_path);
            let label_path = labels_dir.join(rel).with_extension(LABEL_EXTENSION);
            SourcePair {
                image_path,
                label_path,
            }
        })
        .collect())
}

fn collect_files_with_extensions(
    root: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, SynthError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| SynthError::Layout {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

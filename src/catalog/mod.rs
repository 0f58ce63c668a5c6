//! Source catalog: object crops and their YOLO labels.
//!
//! The catalog is built once from parallel lists of image and label paths
//! and is read-only afterwards. Each [`SourceEntry`] is one object crop that
//! can be pasted into synthetic samples.

mod discover;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::MalformedLabelPolicy;
use crate::error::SynthError;

pub use discover::{discover_pairs, SourcePair};

/// One row of a YOLO label file, all spatial values normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRow {
    pub class_id: usize,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

/// Largest class id a label file may use.
///
/// `data.yaml` names every id from 0 up to the largest one in use, so the
/// bound keeps that file small.
pub const MAX_CLASS_ID: usize = 9_999;

/// An object image together with its annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceEntry {
    pub image_path: PathBuf,
    /// Never empty.
    labels: Vec<LabelRow>,
    class_id: usize,
}

impl SourceEntry {
    /// Build an entry, or `None` when there are no label rows.
    pub fn new(image_path: impl Into<PathBuf>, labels: Vec<LabelRow>) -> Option<Self> {
        let class_id = labels.first()?.class_id;
        Some(Self {
            image_path: image_path.into(),
            labels,
            class_id,
        })
    }

    pub fn labels(&self) -> &[LabelRow] {
        &self.labels
    }

    /// Class id stamped on every instance pasted from this entry.
    ///
    /// This is the class of the first label row.
    pub fn class_id(&self) -> usize {
        self.class_id
    }
}

/// Ordered, immutable collection of source entries.
#[derive(Clone, Debug, Default)]
pub struct SourceCatalog {
    entries: Vec<SourceEntry>,
}

impl SourceCatalog {
    /// Load a catalog from positionally paired image and label paths.
    ///
    /// Pairs whose label file does not exist are skipped. If the lists have
    /// different lengths, the extra paths of the longer one are ignored.
    pub fn load(
        image_paths: &[PathBuf],
        label_paths: &[PathBuf],
        policy: MalformedLabelPolicy,
    ) -> Result<Self, SynthError> {
        if image_paths.len() != label_paths.len() {
            warn!(
                images = image_paths.len(),
                labels = label_paths.len(),
                "image and label path lists differ in length; pairing up to the shorter one"
            );
        }

        let mut entries = Vec::new();
        for (image_path, label_path) in image_paths.iter().zip(label_paths) {
            if !label_path.is_file() {
                debug!(label = %label_path.display(), "label file missing, skipping pair");
                continue;
            }

            let labels = read_label_file(label_path, policy)?;
            let Some(entry) = SourceEntry::new(image_path.clone(), labels) else {
                warn!(
                    label = %label_path.display(),
                    "label file has no rows, skipping pair"
                );
                continue;
            };

            entries.push(entry);
        }

        info!(entries = entries.len(), "loaded source catalog");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&SourceEntry> {
        self.entries.get(index)
    }

    /// Class ids that samples drawn from this catalog can carry.
    pub fn class_ids(&self) -> BTreeSet<usize> {
        self.entries.iter().map(SourceEntry::class_id).collect()
    }
}

/// Read every row of one label file.
pub fn read_label_file(
    path: &Path,
    policy: MalformedLabelPolicy,
) -> Result<Vec<LabelRow>, SynthError> {
    let content = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_num = line_idx + 1;
        match parse_label_line(line, path, line_num) {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => {}
            Err(err) => match policy {
                MalformedLabelPolicy::Abort => return Err(err),
                MalformedLabelPolicy::SkipLine => {
                    warn!(error = %err, "skipping malformed label line");
                }
            },
        }
    }

    Ok(rows)
}

fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<LabelRow>, SynthError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // A sixth token is enough to reject the row.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();

    if tokens.len() < 5 {
        return Err(SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("expected 5 tokens, found {}", tokens.len()),
        });
    }

    if tokens.len() > 5 {
        return Err(SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: "expected exactly 5 fields: class_id x_center y_center width height"
                .to_string(),
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid class_id '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    if class_id > MAX_CLASS_ID {
        return Err(SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("class_id {class_id} exceeds the maximum of {MAX_CLASS_ID}"),
        });
    }

    let cx = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
    let cy = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
    let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
    let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

    Ok(Some(LabelRow {
        class_id,
        cx,
        cy,
        w,
        h,
    }))
}

/// Fuzz-only entrypoint for single-line label parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), SynthError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, SynthError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field_name} '{raw}'; expected finite number"),
        }),
    }
}

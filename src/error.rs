use std::path::PathBuf;
use thiserror::Error;

/// The main error type for synthlabel operations.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YOLO label file {path} at line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse generator config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid generator configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid input layout at {path}: {message}")]
    Layout { path: PathBuf, message: String },

    #[error(
        "Object of {width}x{height} at ({x}, {y}) does not fit a {canvas_width}x{canvas_height} canvas"
    )]
    PasteOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    #[error("Failed to serialize generation report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Unsupported report format: {0}")]
    UnsupportedReportFormat(String),
}

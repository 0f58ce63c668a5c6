//! Synthlabel: synthetic object-detection datasets from cut-out objects.
//!
//! Synthlabel takes object crops with YOLO labels, pastes random subsets of
//! them onto blank canvases at random scales and positions while keeping
//! the pairwise overlap below a limit, and writes the result as a YOLO
//! dataset (`images/`, `labels/`, `data.yaml`).
//!
//! # Modules
//!
//! - [`catalog`]: source images and their labels
//! - [`placement`]: entry selection, scaling and overlap-bounded positioning
//! - [`composite`]: masked paste of crops onto a canvas
//! - [`writer`]: YOLO label lines and sample files
//! - [`generate`]: the generator tying it together
//! - [`geom`]: boxes, coordinate spaces and IoU
//! - [`config`]: generator settings
//! - [`error`]: error types for synthlabel operations
//!
//! # Example
//!
//! ```no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use synthlabel::{GeneratorConfig, SyntheticDatasetGenerator};
//!
//! let config = GeneratorConfig::new(
//!     vec!["clean_images/drill.png".into()],
//!     vec!["clean_labels/drill.txt".into()],
//!     "synthetic_dataset",
//! );
//! let generator = SyntheticDatasetGenerator::new(config)?;
//! let report = generator.generate(100, &mut StdRng::seed_from_u64(7))?;
//! println!("{report}");
//! # Ok::<(), synthlabel::SynthError>(())
//! ```

pub mod catalog;
pub mod composite;
pub mod config;
pub mod error;
pub mod generate;
pub mod geom;
pub mod placement;
pub mod writer;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub use config::{GeneratorConfig, GeneratorSettings};
pub use error::SynthError;
pub use generate::{GenerationReport, SyntheticDatasetGenerator};

/// The synthlabel CLI application.
#[derive(Parser)]
#[command(name = "synthlabel")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic YOLO dataset from labeled object crops.
    Generate(GenerateArgs),
    /// List the image/label pairs that would feed the generator.
    Pairs(PairsArgs),
}

/// Arguments for the generate subcommand.
#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory of object images (searched recursively).
    #[arg(long)]
    images: PathBuf,

    /// Directory of YOLO label files mirroring the images directory.
    #[arg(long)]
    labels: PathBuf,

    /// Output dataset root.
    #[arg(short, long)]
    output: PathBuf,

    /// Number of samples to generate.
    #[arg(short = 'n', long = "samples", default_value_t = 100)]
    samples: usize,

    /// YAML file with generator settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Maximum distinct source entries per sample.
    #[arg(long)]
    max_classes: Option<usize>,

    /// Maximum instances of one source entry per sample.
    #[arg(long)]
    max_objects_per_class: Option<u32>,

    /// Maximum IoU between any two objects of a sample.
    #[arg(long)]
    max_overlap: Option<f64>,

    /// Seed for a reproducible run.
    #[arg(long, env = "SYNTHLABEL_SEED")]
    seed: Option<u64>,

    /// Drop malformed label lines instead of failing.
    #[arg(long)]
    skip_malformed_labels: bool,

    /// Fail the run when a source image cannot be read.
    #[arg(long)]
    abort_on_unreadable_image: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the pairs subcommand.
#[derive(clap::Args)]
struct PairsArgs {
    /// Directory of object images (searched recursively).
    #[arg(long)]
    images: PathBuf,

    /// Directory of YOLO label files.
    #[arg(long)]
    labels: PathBuf,
}

/// Run the synthlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SynthError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Pairs(args)) => run_pairs(args),
        None => {
            println!("synthlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Synthetic object-detection dataset generator.");
            println!();
            println!("Run 'synthlabel --help' for usage information.");
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), SynthError> {
    if !matches!(args.report.as_str(), "text" | "json") {
        return Err(SynthError::UnsupportedReportFormat(format!(
            "'{}' (supported: text, json)",
            args.report
        )));
    }

    let settings = settings_from_args(&args)?;

    let pairs = catalog::discover_pairs(&args.images, &args.labels)?;
    let (image_paths, label_paths): (Vec<PathBuf>, Vec<PathBuf>) = pairs
        .into_iter()
        .map(|pair| (pair.image_path, pair.label_path))
        .unzip();

    let config =
        GeneratorConfig::new(image_paths, label_paths, &args.output).with_settings(settings);
    let generator = SyntheticDatasetGenerator::new(config)?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "no seed given, drew one");
            seed
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let mut report = generator.generate(args.samples, &mut rng)?;
    report.seed = Some(seed);

    match args.report.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report).map_err(SynthError::ReportSerialize)?;
            println!("{}", json);
        }
        _ => print!("{}", report),
    }

    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn settings_from_args(args: &GenerateArgs) -> Result<GeneratorSettings, SynthError> {
    let mut settings = match &args.config {
        Some(path) => GeneratorSettings::from_yaml_file(path)?,
        None => GeneratorSettings::default(),
    };

    if let Some(height) = args.height {
        settings.image_size.height = height;
    }
    if let Some(width) = args.width {
        settings.image_size.width = width;
    }
    if let Some(max_classes) = args.max_classes {
        settings.max_classes = max_classes;
    }
    if let Some(max_objects) = args.max_objects_per_class {
        settings.max_objects_per_class = max_objects;
    }
    if let Some(max_overlap) = args.max_overlap {
        settings.max_overlap = max_overlap;
    }
    if args.skip_malformed_labels {
        settings.malformed_labels = config::MalformedLabelPolicy::SkipLine;
    }
    if args.abort_on_unreadable_image {
        settings.unreadable_images = config::UnreadableImagePolicy::Abort;
    }

    settings.validate()?;
    Ok(settings)
}

fn run_pairs(args: PairsArgs) -> Result<(), SynthError> {
    let pairs = catalog::discover_pairs(&args.images, &args.labels)?;

    let mut with_labels = 0;
    for pair in &pairs {
        let status = if pair.has_label() {
            with_labels += 1;
            "ok"
        } else {
            "missing-label"
        };
        println!(
            "{}\t{}\t{}",
            pair.image_path.display(),
            pair.label_path.display(),
            status
        );
    }

    println!();
    println!(
        "{} image(s), {} with labels, {} without",
        pairs.len(),
        with_labels,
        pairs.len() - with_labels
    );
    Ok(())
}

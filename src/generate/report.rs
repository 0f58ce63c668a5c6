//! Summary of a generation run.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Per-sample instance accounting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SampleStats {
    /// Instances pasted and labeled.
    pub placed: usize,
    /// Instances dropped after every position attempt overlapped too much.
    pub dropped_after_attempts: usize,
    /// Instances whose scaled crop was empty or larger than the canvas.
    pub unplaceable: usize,
    /// Instances skipped because their source image could not be decoded.
    pub skipped_unreadable: usize,
}

impl SampleStats {
    /// Instances the placement engine asked for, whatever became of them.
    pub fn requested(&self) -> usize {
        self.placed + self.dropped_after_attempts + self.unplaceable + self.skipped_unreadable
    }
}

/// Totals for a whole run, printed by the CLI as text or JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    /// Seed of the random source, when the run is reproducible.
    pub seed: Option<u64>,
    pub catalog_entries: usize,
    pub samples: usize,
    /// Samples written without any object.
    pub empty_samples: usize,
    pub objects_placed: usize,
    pub dropped_after_attempts: usize,
    pub unplaceable: usize,
    pub skipped_unreadable: usize,
}

impl GenerationReport {
    pub fn new(output_dir: impl Into<PathBuf>, catalog_entries: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            catalog_entries,
            ..Default::default()
        }
    }

    /// Fold one written sample into the totals.
    pub fn record(&mut self, stats: &SampleStats) {
        self.samples += 1;
        if stats.placed == 0 {
            self.empty_samples += 1;
        }
        self.objects_placed += stats.placed;
        self.dropped_after_attempts += stats.dropped_after_attempts;
        self.unplaceable += stats.unplaceable;
        self.skipped_unreadable += stats.skipped_unreadable;
    }

    /// Instances that did not make it onto a canvas.
    pub fn lost_instances(&self) -> usize {
        self.dropped_after_attempts + self.unplaceable + self.skipped_unreadable
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {} sample(s) in {}",
            self.samples,
            self.output_dir.display()
        )?;
        writeln!(
            f,
            "  {} source entries, {} objects placed, {} empty sample(s)",
            self.catalog_entries, self.objects_placed, self.empty_samples
        )?;
        if let Some(seed) = self.seed {
            writeln!(f, "  seed: {}", seed)?;
        }

        if self.lost_instances() > 0 {
            writeln!(f)?;
            writeln!(f, "Dropped instances ({}):", self.lost_instances())?;
            if self.dropped_after_attempts > 0 {
                writeln!(
                    f,
                    "  - {} found no position within the overlap limit",
                    self.dropped_after_attempts
                )?;
            }
            if self.unplaceable > 0 {
                writeln!(
                    f,
                    "  - {} were empty or larger than the canvas after scaling",
                    self.unplaceable
                )?;
            }
            if self.skipped_unreadable > 0 {
                writeln!(
                    f,
                    "  - {} came from unreadable source images",
                    self.skipped_unreadable
                )?;
            }
        }

        Ok(())
    }
}

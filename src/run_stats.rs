//! Track stats for the whole altloci run
//!

use std::fs::File;

use camino::Utf8Path;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thousands::Separable;

use crate::fasta_output::WriteOutcome;

pub const RUN_STATS_FILENAME: &str = "run.stats.json";

#[derive(Default, Deserialize, Serialize)]
pub struct LocusStats {
    pub total_loci: usize,
    pub processed_loci: usize,

    /// Loci skipped for a missing alignment file, reference contig, or other per-locus error
    pub skipped_loci: usize,
}

#[derive(Default, Deserialize, Serialize)]
pub struct SegmentStats {
    pub alignment_blocks: usize,
    pub alignment_pieces: usize,
    pub emitted_pieces: usize,
    pub short_gaps: usize,
    pub long_gaps: usize,
}

#[derive(Default, Deserialize, Serialize)]
pub struct OutputStats {
    pub fasta_records_written: usize,
    pub fasta_records_appended: usize,
    pub fasta_records_skipped: usize,
    pub write_failures: usize,
}

impl OutputStats {
    pub fn add_outcome(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.fasta_records_written += 1,
            WriteOutcome::Appended => self.fasta_records_appended += 1,
            WriteOutcome::Skipped => self.fasta_records_skipped += 1,
        }
    }
}

#[derive(Default, Deserialize, Serialize)]
pub struct BatchRunStats {
    pub locus_stats: LocusStats,
    pub segment_stats: SegmentStats,
    pub output_stats: OutputStats,
}

impl BatchRunStats {
    pub fn log_summary(&self) {
        let loci = &self.locus_stats;
        info!(
            "Alt loci total/processed/skipped: {}/{}/{}",
            loci.total_loci.separate_with_commas(),
            loci.processed_loci.separate_with_commas(),
            loci.skipped_loci.separate_with_commas()
        );

        let segments = &self.segment_stats;
        if segments.alignment_blocks > 0 {
            info!(
                "Alignment blocks: {} pieces: {} emitted pieces: {} short gaps: {} long gaps: {}",
                segments.alignment_blocks.separate_with_commas(),
                segments.alignment_pieces.separate_with_commas(),
                segments.emitted_pieces.separate_with_commas(),
                segments.short_gaps.separate_with_commas(),
                segments.long_gaps.separate_with_commas()
            );
        }

        let output = &self.output_stats;
        info!(
            "FASTA records written: {} appended: {} skipped existing: {}",
            output.fasta_records_written.separate_with_commas(),
            output.fasta_records_appended.separate_with_commas(),
            output.fasta_records_skipped.separate_with_commas()
        );
        if output.write_failures > 0 {
            warn!("Output write failures: {}", output.write_failures);
        }
    }
}

/// Write run_stats structure out in json format
pub fn write_run_stats(output_dir: &Utf8Path, run_stats: &BatchRunStats) {
    let filename = output_dir.join(RUN_STATS_FILENAME);

    info!("Writing run statistics to file: '{filename}'");

    let result = File::create(&filename)
        .map_err(serde_json::Error::io)
        .and_then(|f| serde_json::to_writer_pretty(&f, run_stats));
    if let Err(e) = result {
        warn!("Unable to write run statistics json file '{filename}': {e}");
    }
}

//! Run one workflow over every alt locus in the batch
//!
//! Each locus moves through metadata lookup, alignment lookup (segment workflow only), sequence
//! extraction and output. Any per-locus failure is logged and the locus is skipped, the batch
//! itself continues.
//!

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, error, info, warn};

use crate::alignment::{AlignmentRecord, read_gff_alignments, split_alignment_at_large_indels};
use crate::alt_loci::AltLocus;
use crate::assemble_extended::{ExtendedLocusLayout, get_extended_locus_seq};
use crate::base_runs::{GapClass, classify_gap, find_resolved_base_runs, find_unknown_base_runs};
use crate::fasta_output::{FastaWriter, WritePolicy};
use crate::filenames::{
    get_grouped_extended_filename, get_region_filename, get_segment_filenames,
    get_single_extended_filename,
};
use crate::genome_ref::{SequenceSource, get_stranded_subsequence};
use crate::progress::ProgressReporter;
use crate::run_stats::BatchRunStats;
use crate::seed_output::write_seed_file;

pub struct SegmentConfig {
    pub alignment_dir: Utf8PathBuf,
    pub large_indel_threshold: u32,
    pub short_gap_max_len: usize,
    pub write_seed_files: bool,
}

pub enum BatchTask {
    /// Write the extended alt locus sequence and region reference slice for each locus
    CreateFasta { single_alt_loci_file: bool },

    /// Segment each locus alignment, and write out the alignment pieces with short gaps
    SegmentAlignments(SegmentConfig),
}

/// All settings needed to run the batch
pub struct BatchConfig {
    pub output_dir: Utf8PathBuf,
    pub fasta_line_width: usize,

    /// If non-empty, restrict the batch to the alt loci with these FASTA identifiers
    pub target_loci: Vec<String>,

    pub task: BatchTask,
}

#[derive(Debug)]
pub enum LocusError {
    MissingResource(String),
    Io(String),
}

impl fmt::Display for LocusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocusError::MissingResource(x) => write!(f, "Missing resource: {x}"),
            LocusError::Io(x) => write!(f, "I/O failure: {x}"),
        }
    }
}

impl std::error::Error for LocusError {}

/// Get the bases of a possibly empty 1-indexed window in the requested orientation
///
fn get_window_bases(
    source: &mut impl SequenceSource,
    contig: &str,
    start: i64,
    stop: i64,
    is_fwd_strand: bool,
) -> Result<Vec<u8>, LocusError> {
    if stop < start {
        return Ok(Vec::new());
    }
    get_stranded_subsequence(source, contig, start, stop, is_fwd_strand)
        .map_err(|e| LocusError::MissingResource(e.to_string()))
}

struct BatchDriver<'a, S> {
    config: &'a BatchConfig,
    source: &'a mut S,
    writer: FastaWriter,
    stats: BatchRunStats,
}

impl<'a, S: SequenceSource> BatchDriver<'a, S> {
    fn new(config: &'a BatchConfig, source: &'a mut S) -> Self {
        Self {
            config,
            source,
            writer: FastaWriter::new(config.fasta_line_width),
            stats: BatchRunStats::default(),
        }
    }

    fn write_fasta(&mut self, filename: &Utf8Path, name: &str, bases: &[u8], policy: WritePolicy) {
        match self.writer.write_record(filename, name, bases, policy) {
            Ok(outcome) => self.stats.output_stats.add_outcome(outcome),
            Err(e) => {
                error!("Failed to write FASTA file '{filename}': {e}");
                self.stats.output_stats.write_failures += 1;
            }
        }
    }

    fn create_fasta(
        &mut self,
        locus: &AltLocus,
        single_alt_loci_file: bool,
    ) -> Result<(), LocusError> {
        let identifier = locus.fasta_identifier();
        let layout = ExtendedLocusLayout::from_alt_locus(locus);
        debug!("Extended locus layout for {identifier}: {layout:?}");

        let extended = get_extended_locus_seq(self.source, &layout)
            .map_err(|e| LocusError::MissingResource(e.to_string()))?;

        let region = &locus.region;
        let expected_len = region.stop + 1 - region.start;
        if extended.len() as i64 != expected_len {
            debug!(
                "Extended sequence length {} for {identifier} differs from region {} length {expected_len}",
                extended.len(),
                region.region_name
            );
        }

        let config = self.config;
        let output_dir = &config.output_dir;

        // All reads for the locus complete before any of its output is written
        let region_filename = get_region_filename(output_dir, &region.region_name);
        let region_bases = if region_filename.exists() {
            None
        } else {
            let bases = self
                .source
                .get_subsequence(
                    &locus.placement.parent_contig_name(),
                    region.start,
                    region.stop,
                )
                .map_err(|e| LocusError::MissingResource(e.to_string()))?;
            Some(bases)
        };

        if single_alt_loci_file {
            let filename = get_single_extended_filename(output_dir, &identifier);
            self.write_fasta(&filename, &identifier, &extended, WritePolicy::SkipIfExists);
        } else {
            let filename = get_grouped_extended_filename(output_dir, &region.region_name);
            self.write_fasta(&filename, &identifier, &extended, WritePolicy::Grouped);
        }

        match region_bases {
            Some(region_bases) => self.write_fasta(
                &region_filename,
                &region.region_name,
                &region_bases,
                WritePolicy::SkipIfExists,
            ),
            None => {
                info!("Skipping write to existing file: '{region_filename}'");
                self.stats.output_stats.fasta_records_skipped += 1;
            }
        }
        Ok(())
    }

    /// Scan one alignment piece for unknown base runs, and write the piece out if any run is a
    /// short gap
    ///
    fn process_alignment_piece(
        &mut self,
        locus: &AltLocus,
        piece: &AlignmentRecord,
        block_number: usize,
        segment_config: &SegmentConfig,
    ) -> Result<(), LocusError> {
        let identifier = locus.fasta_identifier();
        let parent_contig = locus.placement.parent_contig_name();
        debug!(
            "Alignment piece {block_number} of {identifier}, reference '{}' read from contig '{parent_contig}': {piece}",
            piece.ref_id()
        );

        let span = piece.span();
        let alt_bases = get_window_bases(
            self.source,
            &identifier,
            span.alt_start,
            span.alt_stop,
            piece.is_alt_fwd_strand(),
        )?;
        let ref_bases = get_window_bases(
            self.source,
            &parent_contig,
            span.ref_start,
            span.ref_stop,
            piece.is_ref_fwd_strand(),
        )?;

        let unknown_runs = find_unknown_base_runs(&alt_bases);
        debug!(
            "Alignment piece {block_number} of {identifier} has {} unknown base runs and {} resolved base runs",
            unknown_runs.len(),
            find_resolved_base_runs(&alt_bases).len()
        );

        let mut has_short_gap = false;
        for run in unknown_runs.iter() {
            let (contig_start, contig_stop) =
                run.to_contig_coordinates(span.alt_start, span.alt_stop, piece.is_alt_fwd_strand());
            let gap_class = classify_gap(run, segment_config.short_gap_max_len);
            info!(
                "{identifier} piece {block_number}: {gap_class:?} unknown base run {run:?} ({} bases) at {identifier}:{contig_start}-{contig_stop}",
                run.len()
            );
            match gap_class {
                GapClass::Short => {
                    self.stats.segment_stats.short_gaps += 1;
                    has_short_gap = true;
                }
                GapClass::Long => self.stats.segment_stats.long_gaps += 1,
            }
        }

        if has_short_gap {
            self.stats.segment_stats.emitted_pieces += 1;
            let filenames =
                get_segment_filenames(&self.config.output_dir, &identifier, block_number);
            self.write_fasta(
                &filenames.alt_fasta,
                &identifier,
                &alt_bases,
                WritePolicy::SkipIfExists,
            );
            self.write_fasta(
                &filenames.ref_fasta,
                &identifier,
                &ref_bases,
                WritePolicy::SkipIfExists,
            );
            if segment_config.write_seed_files {
                if let Err(e) = write_seed_file(&filenames.seeds, piece) {
                    error!("Failed to write seed file '{}': {e}", filenames.seeds);
                    self.stats.output_stats.write_failures += 1;
                }
            }
        }
        Ok(())
    }

    fn segment_alignments(
        &mut self,
        locus: &AltLocus,
        segment_config: &SegmentConfig,
    ) -> Result<(), LocusError> {
        let gff_filename = segment_config
            .alignment_dir
            .join(locus.placement.gff_filename());
        if !gff_filename.exists() {
            return Err(LocusError::MissingResource(format!(
                "alignment file is missing: '{gff_filename}'"
            )));
        }

        let alignments =
            read_gff_alignments(&gff_filename).map_err(|e| LocusError::Io(e.to_string()))?;

        let alignment_count = alignments.len();
        let mut block_number = 1;
        for (alignment_index, alignment) in alignments.into_iter().enumerate() {
            self.stats.segment_stats.alignment_blocks += 1;
            debug!(
                "Processing alignment {} of {alignment_count} for {}",
                alignment_index + 1,
                locus.fasta_identifier()
            );

            let pieces =
                split_alignment_at_large_indels(alignment, segment_config.large_indel_threshold);
            for piece in pieces.iter() {
                self.stats.segment_stats.alignment_pieces += 1;
                self.process_alignment_piece(locus, piece, block_number, segment_config)?;
                block_number += 1;
            }
        }
        Ok(())
    }

    fn process_locus(&mut self, locus: &AltLocus) -> Result<(), LocusError> {
        let config = self.config;
        match &config.task {
            BatchTask::CreateFasta {
                single_alt_loci_file,
            } => self.create_fasta(locus, *single_alt_loci_file),
            BatchTask::SegmentAlignments(x) => self.segment_alignments(locus, x),
        }
    }
}

/// Filter the loci list down to the target loci, if any are specified
///
fn select_target_loci<'a>(loci: &'a [AltLocus], target_loci: &[String]) -> Vec<&'a AltLocus> {
    if target_loci.is_empty() {
        return loci.iter().collect();
    }
    for target in target_loci {
        if !loci.iter().any(|x| &x.fasta_identifier() == target) {
            warn!("Target alt locus not found in placement list: '{target}'");
        }
    }
    loci.iter()
        .filter(|x| target_loci.contains(&x.fasta_identifier()))
        .collect()
}

/// Process all loci in order with the configured workflow
///
pub fn run_batch(
    config: &BatchConfig,
    loci: &[AltLocus],
    source: &mut impl SequenceSource,
) -> BatchRunStats {
    let loci = select_target_loci(loci, &config.target_loci);

    let mut driver = BatchDriver::new(config, source);
    driver.stats.locus_stats.total_loci = loci.len();

    let mut progress = ProgressReporter::new(loci.len() as u64, "Processed", "alt loci", false);
    for locus in loci {
        let identifier = locus.fasta_identifier();
        debug!("Starting alt locus {identifier}");
        match driver.process_locus(locus) {
            Ok(_) => driver.stats.locus_stats.processed_loci += 1,
            Err(e) => {
                warn!("Skipping alt locus {identifier}: {e}");
                driver.stats.locus_stats.skipped_loci += 1;
            }
        }
        progress.inc(1);
    }
    progress.clear();

    driver.stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alt_loci::test_utils::get_test_alt_locus;
    use std::collections::HashMap;
    use std::fs;

    const REF_CHR1: &[u8] = b"AAAAACCCCCGGGGGTTTTTACGTA";

    fn get_test_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    fn get_test_source(alt_bases: &[u8]) -> HashMap<String, Vec<u8>> {
        HashMap::from([
            ("chr1".to_string(), REF_CHR1.to_vec()),
            ("chr1_KI000001v1_alt".to_string(), alt_bases.to_vec()),
        ])
    }

    fn get_create_fasta_config(output_dir: &Utf8Path, single_alt_loci_file: bool) -> BatchConfig {
        BatchConfig {
            output_dir: output_dir.to_path_buf(),
            fasta_line_width: 60,
            target_loci: Vec::new(),
            task: BatchTask::CreateFasta {
                single_alt_loci_file,
            },
        }
    }

    fn get_segment_config(output_dir: &Utf8Path, alignment_dir: &Utf8Path) -> BatchConfig {
        BatchConfig {
            output_dir: output_dir.to_path_buf(),
            fasta_line_width: 60,
            target_loci: Vec::new(),
            task: BatchTask::SegmentAlignments(SegmentConfig {
                alignment_dir: alignment_dir.to_path_buf(),
                large_indel_threshold: 5000,
                short_gap_max_len: 10,
                write_seed_files: true,
            }),
        }
    }

    #[test]
    fn test_create_fasta_grouped() {
        let (_dir, output_dir) = get_test_dir();
        let config = get_create_fasta_config(&output_dir, false);
        let mut source = get_test_source(b"AAAACCCG");

        let mut locus2 = get_test_alt_locus();
        locus2.accession.genbank_accession_version = "KI000002.1".to_string();
        source.insert("chr1_KI000002v1_alt".to_string(), b"TTTTTTTT".to_vec());
        let loci = vec![get_test_alt_locus(), locus2];

        let run = |source: &mut HashMap<String, Vec<u8>>| {
            let stats = run_batch(&config, &loci, source);
            assert_eq!(stats.locus_stats.processed_loci, 2);
            fs::read_to_string(output_dir.join("altLoci/REGION1_altLoci.fa")).unwrap()
        };

        // Core is reverse complemented, flanks are chr1:1-10 and chr1:19-25
        let expected = ">chr1_KI000001v1_alt\nAAAAACCCCCCGGGTTTTTTACGTA\n\
                        >chr1_KI000002v1_alt\nAAAAACCCCCAAAAAAAATTACGTA\n";
        assert_eq!(run(&mut source), expected);

        // Reruns reproduce the grouped file
        assert_eq!(run(&mut source), expected);

        let region = fs::read_to_string(output_dir.join("regions/REGION1.fa")).unwrap();
        assert_eq!(region, ">REGION1\nAAAAACCCCCGGGGGTTTTTACGTA\n");
    }

    #[test]
    fn test_create_fasta_single() {
        let (_dir, output_dir) = get_test_dir();
        let config = get_create_fasta_config(&output_dir, true);
        let mut source = get_test_source(b"AAAACCCG");
        let loci = vec![get_test_alt_locus()];

        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.output_stats.fasta_records_written, 2);
        let filename = output_dir.join("altLoci_single/chr1_KI000001v1_alt_extended.fa");
        assert_eq!(
            fs::read_to_string(&filename).unwrap(),
            ">chr1_KI000001v1_alt\nAAAAACCCCCCGGGTTTTTTACGTA\n"
        );

        // Existing files are left in place on rerun
        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.output_stats.fasta_records_written, 0);
        assert_eq!(stats.output_stats.fasta_records_skipped, 2);
    }

    #[test]
    fn test_create_fasta_missing_contig() {
        let (_dir, output_dir) = get_test_dir();
        let config = get_create_fasta_config(&output_dir, true);
        let mut source = HashMap::from([("chr1".to_string(), REF_CHR1.to_vec())]);
        let loci = vec![get_test_alt_locus()];

        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.locus_stats.skipped_loci, 1);
        assert_eq!(stats.locus_stats.processed_loci, 0);
    }

    #[test]
    fn test_create_fasta_write_failure() {
        let (_dir, output_dir) = get_test_dir();
        let config = get_create_fasta_config(&output_dir, true);
        let mut source = get_test_source(b"AAAACCCG");

        let mut locus2 = get_test_alt_locus();
        locus2.accession.genbank_accession_version = "KI000002.1".to_string();
        source.insert("chr1_KI000002v1_alt".to_string(), b"TTTTTTTT".to_vec());
        let loci = vec![get_test_alt_locus(), locus2];

        // A plain file in place of the single locus directory makes every extended write fail
        fs::write(output_dir.join("altLoci_single"), "").unwrap();

        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.locus_stats.processed_loci, 2);
        assert_eq!(stats.locus_stats.skipped_loci, 0);
        assert_eq!(stats.output_stats.write_failures, 2);
        assert_eq!(stats.output_stats.fasta_records_written, 1);
        assert_eq!(stats.output_stats.fasta_records_skipped, 1);
        assert!(output_dir.join("regions/REGION1.fa").exists());
    }

    /// Test source which can't read one reference window
    struct WindowFailSource {
        inner: HashMap<String, Vec<u8>>,
        fail_window: (i64, i64),
    }

    impl SequenceSource for WindowFailSource {
        fn get_subsequence(
            &mut self,
            contig: &str,
            start: i64,
            stop: i64,
        ) -> simple_error::SimpleResult<Vec<u8>> {
            if (start, stop) == self.fail_window {
                simple_error::bail!("Failed to read window {}:{}-{}", contig, start, stop);
            }
            self.inner.get_subsequence(contig, start, stop)
        }
    }

    #[test]
    fn test_create_fasta_region_read_failure() {
        let (_dir, output_dir) = get_test_dir();
        let config = get_create_fasta_config(&output_dir, true);
        let mut source = WindowFailSource {
            inner: get_test_source(b"AAAACCCG"),
            fail_window: (1, 25),
        };
        let loci = vec![get_test_alt_locus()];

        // No output is written for a locus that fails any read
        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.locus_stats.skipped_loci, 1);
        assert_eq!(stats.locus_stats.processed_loci, 0);
        assert_eq!(stats.output_stats.fasta_records_written, 0);
        assert!(!output_dir.join("altLoci_single").exists());
    }

    #[test]
    fn test_target_loci() {
        let (_dir, output_dir) = get_test_dir();
        let mut config = get_create_fasta_config(&output_dir, true);
        config.target_loci = vec!["chr1_KI999999v1_alt".to_string()];
        let mut source = get_test_source(b"AAAACCCG");
        let loci = vec![get_test_alt_locus()];

        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.locus_stats.total_loci, 0);
        assert!(!output_dir.join("altLoci_single").exists());
    }

    #[test]
    fn test_segment_alignments() {
        let (_dir, output_dir) = get_test_dir();
        let alignment_dir = output_dir.join("alignments");
        fs::create_dir_all(&alignment_dir).unwrap();

        // The second block has a long gap only, and is not written out
        fs::write(
            alignment_dir.join("KI000001.1_CM000001.1.gff"),
            "##gff-version 3\n\
             chr1\tRefSeq\tmatch\t11\t18\t.\t+\t.\tTarget=chr1_KI000001v1_alt 1 8 +;Gap=M8\n\
             chr1\tRefSeq\tmatch\t1\t25\t.\t+\t.\tTarget=chr1_KI000001v1_alt 9 33 +;Gap=M25\n",
        )
        .unwrap();

        let mut alt_bases = b"ACGNNNGTAC".to_vec();
        alt_bases.extend([b'N'; 11]);
        alt_bases.extend_from_slice(b"ACGTACGTACGT");
        let mut source = get_test_source(&alt_bases);
        let config = get_segment_config(&output_dir, &alignment_dir);
        let loci = vec![get_test_alt_locus()];

        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.locus_stats.processed_loci, 1);
        assert_eq!(stats.segment_stats.alignment_blocks, 2);
        assert_eq!(stats.segment_stats.alignment_pieces, 2);
        assert_eq!(stats.segment_stats.short_gaps, 1);
        assert_eq!(stats.segment_stats.long_gaps, 1);
        assert_eq!(stats.segment_stats.emitted_pieces, 1);

        let segments_dir = output_dir.join("segments");
        assert_eq!(
            fs::read_to_string(segments_dir.join("chr1_KI000001v1_alt_altLoci_1.fa")).unwrap(),
            ">chr1_KI000001v1_alt\nACGNNNGT\n"
        );
        assert_eq!(
            fs::read_to_string(segments_dir.join("chr1_KI000001v1_alt_ref_1.fa")).unwrap(),
            ">chr1_KI000001v1_alt\nGGGGGTTT\n"
        );
        assert_eq!(
            fs::read_to_string(segments_dir.join("chr1_KI000001v1_alt_1.tab")).unwrap(),
            "0\t0\t8\n"
        );
        assert!(!segments_dir.join("chr1_KI000001v1_alt_altLoci_2.fa").exists());
    }

    #[test]
    fn test_segment_missing_alignment_file() {
        let (_dir, output_dir) = get_test_dir();
        let config = get_segment_config(&output_dir, &output_dir.join("no_such_dir"));
        let mut source = get_test_source(b"AAAACCCG");
        let loci = vec![get_test_alt_locus(), get_test_alt_locus()];

        let stats = run_batch(&config, &loci, &mut source);
        assert_eq!(stats.locus_stats.total_loci, 2);
        assert_eq!(stats.locus_stats.skipped_loci, 2);
    }

    #[test]
    fn test_get_window_bases() {
        let mut source = get_test_source(b"AAAACCCG");
        assert!(
            get_window_bases(&mut source, "chr1", 5, 4, true)
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            get_window_bases(&mut source, "chr1", 1, 3, false).unwrap(),
            b"TTT"
        );
        assert!(matches!(
            get_window_bases(&mut source, "chrX", 1, 3, true),
            Err(LocusError::MissingResource(_))
        ));
    }
}

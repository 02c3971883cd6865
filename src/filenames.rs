//! Output file and directory names
//!

use camino::{Utf8Path, Utf8PathBuf};

pub const SETTINGS_FILENAME: &str = "settings.json";

/// One extended alt locus FASTA file per locus
pub const ALT_LOCI_SINGLE_DIRNAME: &str = "altLoci_single";

/// One multi-record extended alt locus FASTA file per region
pub const ALT_LOCI_GROUPED_DIRNAME: &str = "altLoci";

pub const REGIONS_DIRNAME: &str = "regions";

pub const SEGMENTS_DIRNAME: &str = "segments";

pub fn get_single_extended_filename(output_dir: &Utf8Path, identifier: &str) -> Utf8PathBuf {
    output_dir
        .join(ALT_LOCI_SINGLE_DIRNAME)
        .join(format!("{identifier}_extended.fa"))
}

pub fn get_grouped_extended_filename(output_dir: &Utf8Path, region_name: &str) -> Utf8PathBuf {
    output_dir
        .join(ALT_LOCI_GROUPED_DIRNAME)
        .join(format!("{region_name}_altLoci.fa"))
}

pub fn get_region_filename(output_dir: &Utf8Path, region_name: &str) -> Utf8PathBuf {
    output_dir
        .join(REGIONS_DIRNAME)
        .join(format!("{region_name}.fa"))
}

/// Alt, ref and seed filenames of one emitted alignment piece
pub struct SegmentFilenames {
    pub alt_fasta: Utf8PathBuf,
    pub ref_fasta: Utf8PathBuf,
    pub seeds: Utf8PathBuf,
}

pub fn get_segment_filenames(
    output_dir: &Utf8Path,
    identifier: &str,
    block_number: usize,
) -> SegmentFilenames {
    let dir = output_dir.join(SEGMENTS_DIRNAME);
    SegmentFilenames {
        alt_fasta: dir.join(format!("{identifier}_altLoci_{block_number}.fa")),
        ref_fasta: dir.join(format!("{identifier}_ref_{block_number}.fa")),
        seeds: dir.join(format!("{identifier}_{block_number}.tab")),
    }
}

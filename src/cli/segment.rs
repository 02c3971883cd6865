use camino::Utf8PathBuf;
use clap::Args;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};

use super::shared::{InputSettings, validate_input_settings};
use super::utils::check_required_dirname;
use crate::alignment::DEFAULT_LARGE_INDEL_THRESHOLD;
use crate::base_runs::DEFAULT_SHORT_GAP_MAX_LEN;

#[derive(Args, Default, Deserialize, Serialize)]
pub struct SegmentSettings {
    #[command(flatten)]
    pub input: InputSettings,

    /// Directory of alt scaffold to parent alignment GFF files, named
    /// '<alt_scaf_acc>_<parent_acc>.gff'
    #[arg(long, value_name = "DIR")]
    pub alignment_dir: Utf8PathBuf,

    /// Write a tab-separated seed match file for each alignment segment written out
    #[arg(long)]
    pub write_seed_files: bool,

    /// Alignments are split at any run of two or more consecutive indels of at least this size
    #[arg(hide = true, long, default_value_t = DEFAULT_LARGE_INDEL_THRESHOLD)]
    pub large_indel_threshold: u32,

    /// Unknown base runs up to this length are short gaps, which trigger output of the enclosing
    /// alignment segment
    #[arg(hide = true, long, default_value_t = DEFAULT_SHORT_GAP_MAX_LEN)]
    pub short_gap_max_len: usize,
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_segment_settings(
    settings: SegmentSettings,
) -> SimpleResult<SegmentSettings> {
    validate_input_settings(&settings.input)?;
    check_required_dirname(&settings.alignment_dir, "alignment")?;

    if settings.large_indel_threshold == 0 {
        bail!("--large-indel-threshold argument must be greater than 0");
    }
    if settings.short_gap_max_len == 0 {
        bail!("--short-gap-max-len argument must be greater than 0");
    }
    Ok(settings)
}

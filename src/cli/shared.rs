use camino::Utf8PathBuf;
use clap::Args;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};

use super::utils::check_required_filename;
use crate::fasta_output::DEFAULT_FASTA_LINE_WIDTH;

#[derive(Args, Default, Deserialize, Serialize)]
pub struct SharedSettings {
    /// Turn on extra debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Specify one or more target alt loci by FASTA identifier, e.g. chr11_KI270831v1_alt
    ///
    /// This option is provided strictly for debugging at this point.
    ///
    #[arg(hide = true, long = "target-locus", global = true)]
    pub target_locus_list: Vec<String>,
}

/// Input and output settings used by all commands
#[derive(Args, Default, Deserialize, Serialize)]
pub struct InputSettings {
    /// Genome reference in FASTA format, including all alt scaffolds. The reference must be
    /// indexed.
    #[arg(long = "ref", value_name = "FILE")]
    pub ref_filename: Utf8PathBuf,

    /// Alt scaffold accessions file (NCBI alts_accessions format)
    #[arg(long = "accessions", value_name = "FILE")]
    pub accessions_filename: Utf8PathBuf,

    /// Alt scaffold placement file (NCBI alt_scaffold_placement format)
    #[arg(long = "placement", value_name = "FILE")]
    pub placement_filename: Utf8PathBuf,

    /// Genomic region definitions file (NCBI genomic_regions_definitions format)
    #[arg(long = "regions", value_name = "FILE")]
    pub regions_filename: Utf8PathBuf,

    /// Directory for all command output
    ///
    /// The directory may already exist, in which case existing per-locus output files are kept.
    ///
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_output"))]
    pub output_dir: Utf8PathBuf,

    /// Number of bases per line in FASTA output
    #[arg(long, default_value_t = DEFAULT_FASTA_LINE_WIDTH)]
    pub fasta_line_width: usize,
}

/// Validate input settings
///
/// Assumes that the logger is not setup
///
pub fn validate_input_settings(settings: &InputSettings) -> SimpleResult<()> {
    check_required_filename(&settings.ref_filename, "reference")?;
    check_required_filename(&settings.accessions_filename, "alt scaffold accessions")?;
    check_required_filename(&settings.placement_filename, "alt scaffold placement")?;
    check_required_filename(&settings.regions_filename, "genomic region definitions")?;

    if settings.fasta_line_width == 0 {
        bail!("--fasta-line-width argument must be greater than 0");
    }
    Ok(())
}

use clap::Args;
use serde::{Deserialize, Serialize};
use simple_error::SimpleResult;

use super::shared::{InputSettings, validate_input_settings};

#[derive(Args, Default, Deserialize, Serialize)]
pub struct CreateFastaSettings {
    #[command(flatten)]
    pub input: InputSettings,

    /// Write each extended alt locus to its own FASTA file, instead of one multi-record FASTA file
    /// per region
    #[arg(long)]
    pub single_alt_loci_file: bool,
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_create_fasta_settings(
    settings: CreateFastaSettings,
) -> SimpleResult<CreateFastaSettings> {
    validate_input_settings(&settings.input)?;
    Ok(settings)
}

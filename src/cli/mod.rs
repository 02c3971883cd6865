mod create_fasta;
mod segment;
mod shared;
mod utils;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use simple_error::SimpleResult;

pub use self::create_fasta::CreateFastaSettings;
use self::create_fasta::validate_and_fix_create_fasta_settings;
pub use self::segment::SegmentSettings;
use self::segment::validate_and_fix_segment_settings;
pub use self::shared::{InputSettings, SharedSettings};
use crate::batch_driver::{BatchConfig, BatchTask, SegmentConfig};
use crate::filenames::SETTINGS_FILENAME;

#[derive(Deserialize, Serialize, Subcommand)]
pub enum Commands {
    /// Create the extended alt locus and region reference FASTA files for each alt locus
    CreateFasta(CreateFastaSettings),

    /// Split each alt locus alignment into segments, and write out segments with short unknown
    /// base runs
    Segment(SegmentSettings),
}

#[derive(Deserialize, Parser, Serialize)]
#[command(
    author,
    version,
    about,
    help_template = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
#[clap(propagate_version = true, rename_all = "kebab_case")]
pub struct Settings {
    #[command(flatten)]
    pub shared: SharedSettings,

    #[command(subcommand)]
    pub command: Commands,
}

impl Settings {
    pub fn get_input(&self) -> &InputSettings {
        match &self.command {
            Commands::CreateFasta(x) => &x.input,
            Commands::Segment(x) => &x.input,
        }
    }

    pub fn get_output_dir(&self) -> &Utf8Path {
        &self.get_input().output_dir
    }

    /// Translate command-line settings into the batch configuration
    pub fn get_batch_config(&self) -> BatchConfig {
        let input = self.get_input();
        let task = match &self.command {
            Commands::CreateFasta(x) => BatchTask::CreateFasta {
                single_alt_loci_file: x.single_alt_loci_file,
            },
            Commands::Segment(x) => BatchTask::SegmentAlignments(SegmentConfig {
                alignment_dir: x.alignment_dir.clone(),
                large_indel_threshold: x.large_indel_threshold,
                short_gap_max_len: x.short_gap_max_len,
                write_seed_files: x.write_seed_files,
            }),
        };
        BatchConfig {
            output_dir: input.output_dir.clone(),
            fasta_line_width: input.fasta_line_width,
            target_loci: self.shared.target_locus_list.clone(),
            task,
        }
    }
}

/// Validate settings and update parameters that can't be processed by clap
///
fn validate_and_fix_settings_impl(mut settings: Settings) -> SimpleResult<Settings> {
    settings.command = match settings.command {
        Commands::CreateFasta(x) => {
            let x = validate_and_fix_create_fasta_settings(x)?;
            Commands::CreateFasta(x)
        }
        Commands::Segment(x) => {
            let x = validate_and_fix_segment_settings(x)?;
            Commands::Segment(x)
        }
    };

    Ok(settings)
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_settings(settings: Settings) -> Settings {
    match validate_and_fix_settings_impl(settings) {
        Ok(x) => x,
        Err(msg) => {
            eprintln!("Invalid command-line setting: {}", msg);
            std::process::exit(exitcode::USAGE);
        }
    }
}

pub fn parse_settings() -> Settings {
    Settings::parse()
}

/// Write settings out in json format
pub fn write_settings(output_dir: &Utf8Path, settings: &Settings) {
    let filename = output_dir.join(SETTINGS_FILENAME);

    info!("Writing settings to file: '{filename}'");

    let result = std::fs::File::create(&filename)
        .map_err(serde_json::Error::io)
        .and_then(|f| serde_json::to_writer_pretty(&f, settings));
    if let Err(e) = result {
        warn!("Unable to write settings json file '{filename}': {e}");
    }
}

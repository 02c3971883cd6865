mod alignment;
mod alt_loci;
mod assemble_extended;
mod base_runs;
mod batch_driver;
mod cli;
mod fasta_output;
mod filenames;
mod genome_ref;
mod globals;
mod logger;
mod os_utils;
mod progress;
mod run_stats;
mod seed_output;
mod seq_util;
mod tsv_utils;

use std::{error, process};

use hhmmss::Hhmmss;
use log::{error, info};

use crate::alt_loci::read_alt_loci;
use crate::batch_driver::run_batch;
use crate::genome_ref::IndexedGenomeRef;
use crate::globals::{PROGRAM_NAME, PROGRAM_VERSION};
use crate::logger::setup_output_dir_and_logger;
use crate::run_stats::write_run_stats;

fn run(settings: &cli::Settings) -> Result<(), Box<dyn error::Error>> {
    info!("Starting {PROGRAM_NAME} {PROGRAM_VERSION}");
    info!(
        "cmdline: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );

    let start = std::time::Instant::now();

    let output_dir = settings.get_output_dir();
    cli::write_settings(output_dir, settings);

    let input = settings.get_input();
    let mut genome_ref = IndexedGenomeRef::from_fasta(&input.ref_filename)?;

    let loci = read_alt_loci(
        &input.accessions_filename,
        &input.placement_filename,
        &input.regions_filename,
    )?;
    info!("Found {} alt loci to process", loci.len());

    let batch_config = settings.get_batch_config();
    let run_stats = run_batch(&batch_config, &loci, &mut genome_ref);

    run_stats.log_summary();
    write_run_stats(output_dir, &run_stats);

    info!(
        "{PROGRAM_NAME} completed. Total Runtime: {}",
        start.elapsed().hhmmssxxx()
    );
    Ok(())
}

fn main() {
    let settings = cli::validate_and_fix_settings(cli::parse_settings());

    // Setup logger, including creation of the output directory for the log file:
    setup_output_dir_and_logger(settings.get_output_dir(), settings.shared.debug);

    if let Err(err) = run(&settings) {
        error!("{err}");
        process::exit(exitcode::DATAERR);
    }
}

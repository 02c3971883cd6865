//! Methods specific to the altloci logger
//!

use camino::Utf8Path;

use crate::globals::PROGRAM_NAME;
use crate::os_utils::create_dir_all;

/// If debug is true set the default logger to the more verbose debug level
///
fn setup_logger(output_dir: &Utf8Path, debug: bool) -> Result<(), fern::InitError> {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let log_filename = output_dir.join(PROGRAM_NAME.to_string() + ".log");
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                PROGRAM_NAME,
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .chain(fern::log_file(log_filename)?)
        .apply()?;
    Ok(())
}

/// Create the output directory if needed, then setup logger to write there
///
/// An existing output directory is reused, so that existing output files can be skipped on rerun.
///
/// #Arguments
/// * `debug` - If true use debug log level, and info level otherwise
///
pub fn setup_output_dir_and_logger(output_dir: &Utf8Path, debug: bool) {
    // No logger is setup yet, so errors follow the pattern used in command-line settings
    // verification
    let result = create_dir_all(output_dir, "output").and_then(|_| {
        setup_logger(output_dir, debug).map_err(|e| format!("Can't setup logger: {e}"))
    });
    if let Err(msg) = result {
        eprintln!("Invalid command-line setting: {msg}");
        std::process::exit(exitcode::CANTCREAT);
    }
}

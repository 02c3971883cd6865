use camino::Utf8Path;
use simple_error::{SimpleResult, bail};

/// Check a required input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_required_filename(filename: &Utf8Path, label: &str) -> SimpleResult<()> {
    if filename.as_str().is_empty() {
        bail!("Must specify {label} file");
    }
    if !filename.exists() {
        bail!("Can't find specified {label} file: '{filename}'");
    }
    if !filename.is_file() {
        bail!("Specified {label} file path does not appear to be a file: '{filename}'");
    }
    Ok(())
}

/// Check a required input directory
///
/// Assumes no logger has been configured yet
///
pub fn check_required_dirname(dirname: &Utf8Path, label: &str) -> SimpleResult<()> {
    if dirname.as_str().is_empty() {
        bail!("Must specify {label} directory");
    }
    if !dirname.is_dir() {
        bail!("Can't find specified {label} directory: '{dirname}'");
    }
    Ok(())
}

//! Write FASTA and tabular output files
//!

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};

pub const DEFAULT_FASTA_LINE_WIDTH: usize = 60;

/// How to handle a FASTA record write to a file which may already exist
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WritePolicy {
    /// Leave any existing file untouched
    SkipIfExists,

    /// Multi-record file: the first record of the run replaces the file, later records append
    Grouped,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteOutcome {
    Written,
    Appended,
    Skipped,
}

/// Write a single FASTA record, wrapping sequence lines at `line_width` bases
///
pub fn write_fasta_record(
    f: &mut impl Write,
    name: &str,
    bases: &[u8],
    line_width: usize,
) -> io::Result<()> {
    writeln!(f, ">{name}")?;
    for line in bases.chunks(line_width) {
        f.write_all(line)?;
        f.write_all(b"\n")?;
    }
    Ok(())
}

/// Create `filename` by writing all content to a temporary sibling file, then renaming it into
/// place
///
/// A failed write never leaves a partial file under the final name.
///
pub fn write_file_atomic<F>(filename: &Utf8Path, write_content: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    if let Some(parent) = filename.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_filename = Utf8PathBuf::from(format!("{filename}.partial"));
    let result = File::create(&tmp_filename).and_then(|f| {
        let mut f = BufWriter::new(f);
        write_content(&mut f)?;
        f.flush()?;
        f.get_ref().sync_all()
    });
    match result {
        Ok(_) => fs::rename(&tmp_filename, filename),
        Err(e) => {
            let _ = fs::remove_file(&tmp_filename);
            Err(e)
        }
    }
}

/// FASTA writer shared by all loci in one batch run
///
pub struct FastaWriter {
    line_width: usize,

    /// Grouped files which have already received their first record in this run
    started_grouped_files: HashSet<Utf8PathBuf>,
}

impl FastaWriter {
    pub fn new(line_width: usize) -> Self {
        assert!(line_width > 0);
        Self {
            line_width,
            started_grouped_files: HashSet::new(),
        }
    }

    pub fn write_record(
        &mut self,
        filename: &Utf8Path,
        name: &str,
        bases: &[u8],
        policy: WritePolicy,
    ) -> io::Result<WriteOutcome> {
        let line_width = self.line_width;
        let write_record = |f: &mut BufWriter<File>| write_fasta_record(f, name, bases, line_width);

        match policy {
            WritePolicy::SkipIfExists => {
                if filename.exists() {
                    info!("Skipping write to existing file: '{filename}'");
                    return Ok(WriteOutcome::Skipped);
                }
                write_file_atomic(filename, write_record)?;
                debug!("Wrote record '{name}' to new file '{filename}'");
                Ok(WriteOutcome::Written)
            }
            WritePolicy::Grouped => {
                if self.started_grouped_files.contains(filename) {
                    let f = OpenOptions::new().append(true).open(filename)?;
                    let mut f = BufWriter::new(f);
                    write_record(&mut f)?;
                    f.flush()?;
                    debug!("Appended record '{name}' to file '{filename}'");
                    Ok(WriteOutcome::Appended)
                } else {
                    write_file_atomic(filename, write_record)?;
                    self.started_grouped_files.insert(filename.to_path_buf());
                    debug!("Wrote record '{name}' to new file '{filename}'");
                    Ok(WriteOutcome::Written)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_write_fasta_record() {
        let mut buf = Vec::new();
        write_fasta_record(&mut buf, "chr1", b"ACGTACGTAC", 4).unwrap();
        assert_eq!(buf, b">chr1\nACGT\nACGT\nAC\n");

        let mut buf = Vec::new();
        write_fasta_record(&mut buf, "chr1", b"ACGT", 4).unwrap();
        assert_eq!(buf, b">chr1\nACGT\n");

        let mut buf = Vec::new();
        write_fasta_record(&mut buf, "empty", b"", 4).unwrap();
        assert_eq!(buf, b">empty\n");
    }

    #[test]
    fn test_skip_if_exists() {
        let (_dir, dir) = get_test_dir();
        let filename = dir.join("sub").join("x.fa");

        let mut writer = FastaWriter::new(60);
        let outcome = writer
            .write_record(&filename, "x", b"ACGT", WritePolicy::SkipIfExists)
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Written);

        let outcome = writer
            .write_record(&filename, "y", b"TTTT", WritePolicy::SkipIfExists)
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);

        assert_eq!(fs::read_to_string(&filename).unwrap(), ">x\nACGT\n");
        assert!(!Utf8PathBuf::from(format!("{filename}.partial")).exists());
    }

    #[test]
    fn test_grouped_rerun_is_reproducible() {
        let (_dir, dir) = get_test_dir();
        let filename = dir.join("REGION1_altLoci.fa");

        let run = || {
            let mut writer = FastaWriter::new(2);
            let first = writer
                .write_record(&filename, "a", b"ACG", WritePolicy::Grouped)
                .unwrap();
            let second = writer
                .write_record(&filename, "b", b"TT", WritePolicy::Grouped)
                .unwrap();
            assert_eq!(first, WriteOutcome::Written);
            assert_eq!(second, WriteOutcome::Appended);
            fs::read(&filename).unwrap()
        };

        let expected = b">a\nAC\nG\n>b\nTT\n".to_vec();
        assert_eq!(run(), expected);
        assert_eq!(run(), expected);
    }
}

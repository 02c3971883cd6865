//! Access to subsequences of the indexed genome reference
//!

use std::fmt;
use std::fs::File;

use bio::io::fasta;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use simple_error::{SimpleError, SimpleResult, bail};

use crate::seq_util::rev_comp_in_place;

/// Read access to reference contig subsequences
pub trait SequenceSource {
    /// Get the bases of `contig` from `start` to `stop`, using 1-indexed, fully-closed coordinates
    ///
    fn get_subsequence(&mut self, contig: &str, start: i64, stop: i64) -> SimpleResult<Vec<u8>>;
}

/// Get a subsequence in the requested strand orientation
///
pub fn get_stranded_subsequence(
    source: &mut impl SequenceSource,
    contig: &str,
    start: i64,
    stop: i64,
    is_fwd_strand: bool,
) -> SimpleResult<Vec<u8>> {
    let mut bases = source.get_subsequence(contig, start, stop)?;
    if !is_fwd_strand {
        rev_comp_in_place(&mut bases);
    }
    Ok(bases)
}

fn check_window(contig: &str, start: i64, stop: i64) -> SimpleResult<()> {
    if start < 1 || stop < start {
        bail!("Invalid reference window requested: {}:{}-{}", contig, start, stop);
    }
    Ok(())
}

#[derive(Debug)]
pub enum GenomeRefError {
    NotIndexed(Utf8PathBuf),
    Open(String),
}

impl fmt::Display for GenomeRefError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenomeRefError::NotIndexed(x) => write!(
                f,
                "Reference fasta is not indexed, please index file first and run again: '{x}'"
            ),
            GenomeRefError::Open(x) => write!(f, "Unable to open reference fasta: {x}"),
        }
    }
}

impl std::error::Error for GenomeRefError {}

/// Genome reference fasta with random access through its samtools-style fai index
///
pub struct IndexedGenomeRef {
    reader: fasta::IndexedReader<File>,
}

impl IndexedGenomeRef {
    /// Open the reference, which must already be indexed
    ///
    pub fn from_fasta(filename: &Utf8Path) -> Result<Self, GenomeRefError> {
        info!("Opening indexed reference genome from file '{filename}'");

        let index_filename = Utf8PathBuf::from(format!("{filename}.fai"));
        if !index_filename.is_file() {
            return Err(GenomeRefError::NotIndexed(filename.to_path_buf()));
        }

        let reader = fasta::IndexedReader::from_file(&filename)
            .map_err(|e| GenomeRefError::Open(format!("'{filename}': {e}")))?;

        info!(
            "Found {} indexed reference sequences",
            reader.index.sequences().len()
        );

        Ok(Self { reader })
    }
}

impl SequenceSource for IndexedGenomeRef {
    fn get_subsequence(&mut self, contig: &str, start: i64, stop: i64) -> SimpleResult<Vec<u8>> {
        check_window(contig, start, stop)?;
        let error_msg = || format!("Failed to read reference window {contig}:{start}-{stop}");

        self.reader
            .fetch(contig, (start - 1) as u64, stop as u64)
            .map_err(|e| SimpleError::with(&error_msg(), e))?;

        let mut bases = Vec::new();
        self.reader
            .read(&mut bases)
            .map_err(|e| SimpleError::with(&error_msg(), e))?;

        if bases.len() as i64 != stop + 1 - start {
            bail!(
                "{} (window extends past contig end)",
                error_msg()
            );
        }
        Ok(bases)
    }
}

/// A small in-memory reference for tests
#[cfg(test)]
impl SequenceSource for std::collections::HashMap<String, Vec<u8>> {
    fn get_subsequence(&mut self, contig: &str, start: i64, stop: i64) -> SimpleResult<Vec<u8>> {
        check_window(contig, start, stop)?;
        let Some(seq) = self.get(contig) else {
            bail!("Unknown reference contig: '{}'", contig);
        };
        if stop as usize > seq.len() {
            bail!("Window {}:{}-{} extends past contig end", contig, start, stop);
        }
        Ok(seq[(start - 1) as usize..stop as usize].to_vec())
    }
}

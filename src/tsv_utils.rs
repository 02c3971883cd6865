//! Readers for the tab-delimited metadata and alignment inputs
//!

use std::fs::File;
use std::io::{self, BufReader, Read};

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use simple_error::{SimpleError, SimpleResult, bail};

/// Open a text file for reading, transparently decompressing files ending in ".gz"
///
pub fn open_text_file(filename: &Utf8Path) -> io::Result<Box<dyn Read>> {
    let file = File::open(filename)?;
    let reader: Box<dyn Read> = if filename.extension() == Some("gz") {
        Box::new(flate2::read::MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// Get a reader for `#`-commented, tab-delimited text without a header line
///
/// Field counts are not checked by the reader, so that each record parser can report
/// malformed lines itself.
///
pub fn get_tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .from_reader(reader)
}

/// Parse every record of a tab-delimited file, skipping and reporting malformed lines
///
/// # Arguments
/// * `label` - Describes the file type in log messages
/// * `parse_record` - Converts one record, any error skips the record
///
/// Returns the parsed records in file order, or an error if the file can't be opened
///
pub fn read_tsv_records<T, F>(
    filename: &Utf8Path,
    label: &str,
    parse_record: F,
) -> SimpleResult<Vec<T>>
where
    F: FnMut(&StringRecord) -> SimpleResult<T>,
{
    let reader = open_text_file(filename).map_err(|e| {
        SimpleError::with(&format!("Unable to open {label} file: '{filename}'"), e)
    })?;
    Ok(parse_tsv_records(reader, filename.as_str(), label, parse_record))
}

fn parse_tsv_records<R, T, F>(
    reader: R,
    source: &str,
    label: &str,
    mut parse_record: F,
) -> Vec<T>
where
    R: Read,
    F: FnMut(&StringRecord) -> SimpleResult<T>,
{
    let mut records = Vec::new();
    let mut skipped_count = 0;
    for result in get_tsv_reader(reader).records() {
        let record = match result {
            Ok(x) => x,
            Err(e) => {
                warn!("Skipping unreadable line in {label} file '{source}': {e}");
                skipped_count += 1;
                continue;
            }
        };
        match parse_record(&record) {
            Ok(x) => records.push(x),
            Err(e) => {
                let line = record.position().map(|x| x.line()).unwrap_or_default();
                warn!("Skipping malformed line {line} in {label} file '{source}': {e}");
                skipped_count += 1;
            }
        }
    }
    debug!(
        "Read {} records from {label} file '{source}', skipped {skipped_count} lines",
        records.len()
    );
    records
}

/// Get field `index` of a record, or an error naming the field
///
pub fn get_field<'a>(record: &'a StringRecord, index: usize, name: &str) -> SimpleResult<&'a str> {
    record
        .get(index)
        .ok_or_else(|| SimpleError::new(format!("Missing field {} ({name})", index + 1)))
}

/// Parse field `index` of a record into an integer type
///
pub fn parse_int_field<T: std::str::FromStr>(
    record: &StringRecord,
    index: usize,
    name: &str,
) -> SimpleResult<T> {
    let value = get_field(record, index, name)?;
    value.trim().parse::<T>().map_err(|_| {
        SimpleError::new(format!(
            "Failed to parse integer from {name} field entry: '{value}'"
        ))
    })
}

/// Check that a record has exactly the expected number of fields
///
pub fn check_field_count(record: &StringRecord, expected: usize) -> SimpleResult<()> {
    if record.len() != expected {
        bail!(
            "Expected {expected} fields but there were {}: '{}'",
            record.len(),
            record.iter().collect::<Vec<_>>().join("\t")
        );
    }
    Ok(())
}

use std::sync::LazyLock;

use camino::Utf8Path;
use csv::StringRecord;
use regex::Regex;
use simple_error::{SimpleError, SimpleResult, bail};

use super::{AlignmentElementType, AlignmentRecord, AlignmentSpan, get_alignment_elements};
use crate::tsv_utils::{get_field, parse_int_field, read_tsv_records};

const GFF_FIELD_COUNT: usize = 9;

static GAP_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([MID])([0-9]+)$").unwrap());

fn parse_strand(value: &str) -> SimpleResult<bool> {
    match value {
        "+" => Ok(true),
        "-" => Ok(false),
        _ => Err(SimpleError::new(format!("Unexpected strand value: '{value}'"))),
    }
}

/// Parse a GFF Gap attribute value, e.g. "M100 I5 D3 M20"
///
fn parse_gap_attribute(value: &str) -> SimpleResult<Vec<(AlignmentElementType, u32)>> {
    let mut ops = Vec::new();
    for token in value.split_whitespace() {
        let Some(caps) = GAP_TOKEN_REGEX.captures(token) else {
            bail!("Unexpected Gap token '{}'", token);
        };
        let element_type = caps[1]
            .parse::<AlignmentElementType>()
            .map_err(|e| SimpleError::with("Invalid Gap operation", e))?;
        let length = caps[2]
            .parse::<u32>()
            .map_err(|e| SimpleError::with("Invalid Gap length", e))?;
        if length == 0 {
            bail!("Zero length Gap token '{}'", token);
        }
        ops.push((element_type, length));
    }
    if ops.is_empty() {
        bail!("Empty Gap attribute");
    }
    Ok(ops)
}

/// Alt sequence id, window and strand from a GFF Target attribute value, e.g. "NW_1.1 1 200 +"
///
fn parse_target_attribute(value: &str) -> SimpleResult<(String, i64, i64, bool)> {
    let words = value.split_whitespace().collect::<Vec<_>>();
    if words.len() != 3 && words.len() != 4 {
        bail!("Unexpected Target attribute format: '{}'", value);
    }
    let parse_pos = |x: &str| {
        x.parse::<i64>()
            .map_err(|e| SimpleError::with("Invalid Target position", e))
    };
    let start = parse_pos(words[1])?;
    let stop = parse_pos(words[2])?;
    let is_fwd_strand = match words.get(3) {
        Some(x) => parse_strand(x)?,
        None => true,
    };
    Ok((words[0].to_string(), start, stop, is_fwd_strand))
}

/// Parse one GFF alignment line into an alignment record
///
/// The record is rejected if the Gap attribute doesn't add up to the ref and alt windows.
///
fn parse_gff_alignment_record(record: &StringRecord) -> SimpleResult<AlignmentRecord> {
    if record.len() != GFF_FIELD_COUNT {
        bail!(
            "Expected {} fields but there were {}",
            GFF_FIELD_COUNT,
            record.len()
        );
    }

    let ref_id = get_field(record, 0, "seqid")?;
    let ref_start = parse_int_field::<i64>(record, 3, "start")?;
    let ref_stop = parse_int_field::<i64>(record, 4, "end")?;
    let is_ref_fwd_strand = parse_strand(get_field(record, 6, "strand")?)?;

    let mut target = None;
    let mut gap = None;
    for attribute in get_field(record, 8, "attributes")?.split(';') {
        let attribute = attribute.trim();
        if let Some((key, value)) = attribute.split_once('=') {
            match key {
                "Target" => target = Some(parse_target_attribute(value)?),
                "Gap" => gap = Some(parse_gap_attribute(value)?),
                _ => {}
            }
        }
    }

    let Some((alt_id, alt_start, alt_stop, is_alt_fwd_strand)) = target else {
        bail!("Missing Target attribute");
    };
    let Some(ops) = gap else {
        bail!("Missing Gap attribute");
    };

    if ref_start < 1 || alt_start < 1 {
        bail!("Alignment positions must be 1 or greater");
    }

    let span = AlignmentSpan {
        ref_start,
        ref_stop,
        alt_start,
        alt_stop,
    };
    let alignment = AlignmentRecord::new(
        ref_id,
        &alt_id,
        span,
        is_ref_fwd_strand,
        is_alt_fwd_strand,
        get_alignment_elements(&ops),
    );

    if !alignment.is_consistent() {
        bail!(
            "Gap attribute does not match alignment window sizes (ref: {} alt: {})",
            span.ref_size(),
            span.alt_size()
        );
    }
    Ok(alignment)
}

/// Read all alignment blocks from a GFF alignment file
///
/// Malformed lines are reported and skipped.
///
pub fn read_gff_alignments(filename: &Utf8Path) -> SimpleResult<Vec<AlignmentRecord>> {
    read_tsv_records(filename, "GFF alignment", parse_gff_alignment_record)
}

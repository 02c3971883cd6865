use std::collections::HashMap;

use camino::Utf8Path;
use csv::StringRecord;
use simple_error::{SimpleResult, bail};

use crate::tsv_utils::{check_field_count, get_field, parse_int_field, read_tsv_records};

const REGION_FIELD_COUNT: usize = 4;

/// A named genomic region from the NCBI genomic_regions_definitions file
///
/// The region window (1-indexed, fully closed) bounds the extended alt locus sequence.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionInfo {
    pub region_name: String,
    pub chromosome: String,
    pub start: i64,
    pub stop: i64,
}

fn parse_region_record(record: &StringRecord) -> SimpleResult<RegionInfo> {
    check_field_count(record, REGION_FIELD_COUNT)?;
    let region = RegionInfo {
        region_name: get_field(record, 0, "region_name")?.to_string(),
        chromosome: get_field(record, 1, "chromosome")?.to_string(),
        start: parse_int_field(record, 2, "start")?,
        stop: parse_int_field(record, 3, "stop")?,
    };
    if region.start < 1 || region.start > region.stop {
        bail!("Invalid region range: {}-{}", region.start, region.stop);
    }
    Ok(region)
}

/// Read region definitions keyed on region name
pub fn read_regions(filename: &Utf8Path) -> SimpleResult<HashMap<String, RegionInfo>> {
    let regions = read_tsv_records(filename, "genomic region definitions", parse_region_record)?;
    Ok(regions
        .into_iter()
        .map(|x| (x.region_name.clone(), x))
        .collect())
}

use camino::Utf8Path;
use csv::StringRecord;
use simple_error::{SimpleResult, bail};

use crate::tsv_utils::{check_field_count, get_field, parse_int_field, read_tsv_records};

/// Number of tab-separated fields in the NCBI alt_scaffold_placement file
const PLACEMENT_FIELD_COUNT: usize = 15;

/// Placement of one alt scaffold on its parent chromosome, from the NCBI alt_scaffold_placement
/// file
///
/// All coordinates are 1-indexed and fully closed.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlacementInfo {
    pub alt_asm_name: String,
    pub prim_asm_name: String,
    pub alt_scaf_name: String,
    pub alt_scaf_acc: String,
    pub parent_type: String,
    pub parent_name: String,
    pub parent_acc: String,
    pub region_name: String,
    pub is_fwd_strand: bool,
    pub alt_scaf_start: i64,
    pub alt_scaf_stop: i64,
    pub parent_start: i64,
    pub parent_stop: i64,
    pub alt_start_tail: i64,
    pub alt_stop_tail: i64,
}

impl PlacementInfo {
    /// Name of the parent chromosome sequence in the reference fasta
    pub fn parent_contig_name(&self) -> String {
        format!("chr{}", self.parent_name)
    }

    /// Name of the GFF file holding the alt scaffold to parent alignment
    pub fn gff_filename(&self) -> String {
        format!("{}_{}.gff", self.alt_scaf_acc, self.parent_acc)
    }
}

fn parse_placement_record(record: &StringRecord) -> SimpleResult<PlacementInfo> {
    check_field_count(record, PLACEMENT_FIELD_COUNT)?;
    let field = |index, name| get_field(record, index, name).map(|x| x.to_string());

    let is_fwd_strand = match get_field(record, 8, "orientation")? {
        "+" => true,
        "-" => false,
        x => bail!("Unexpected orientation value: '{}'", x),
    };

    let placement = PlacementInfo {
        alt_asm_name: field(0, "alt_asm_name")?,
        prim_asm_name: field(1, "prim_asm_name")?,
        alt_scaf_name: field(2, "alt_scaf_name")?,
        alt_scaf_acc: field(3, "alt_scaf_acc")?,
        parent_type: field(4, "parent_type")?,
        parent_name: field(5, "parent_name")?,
        parent_acc: field(6, "parent_acc")?,
        region_name: field(7, "region_name")?,
        is_fwd_strand,
        alt_scaf_start: parse_int_field(record, 9, "alt_scaf_start")?,
        alt_scaf_stop: parse_int_field(record, 10, "alt_scaf_stop")?,
        parent_start: parse_int_field(record, 11, "parent_start")?,
        parent_stop: parse_int_field(record, 12, "parent_stop")?,
        alt_start_tail: parse_int_field(record, 13, "alt_start_tail")?,
        alt_stop_tail: parse_int_field(record, 14, "alt_stop_tail")?,
    };

    if placement.alt_scaf_start < 1 || placement.alt_scaf_start > placement.alt_scaf_stop {
        bail!(
            "Invalid alt scaffold range: {}-{}",
            placement.alt_scaf_start,
            placement.alt_scaf_stop
        );
    }
    if placement.parent_start < 1 || placement.parent_start > placement.parent_stop {
        bail!(
            "Invalid parent range: {}-{}",
            placement.parent_start,
            placement.parent_stop
        );
    }
    Ok(placement)
}

/// Read all alt scaffold placements in file order
pub fn read_placements(filename: &Utf8Path) -> SimpleResult<Vec<PlacementInfo>> {
    read_tsv_records(filename, "alt scaffold placement", parse_placement_record)
}

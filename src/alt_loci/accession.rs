use std::collections::HashMap;

use camino::Utf8Path;
use csv::StringRecord;
use simple_error::SimpleResult;

use crate::tsv_utils::{check_field_count, get_field, parse_int_field, read_tsv_records};

/// Number of tab-separated fields in the NCBI alts_accessions file
const ACCESSION_FIELD_COUNT: usize = 5;

/// One row of the NCBI alts_accessions file
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessionInfo {
    pub chromosome: String,
    pub refseq_accession_version: String,
    pub refseq_gi: u64,
    pub genbank_accession_version: String,
    pub genbank_gi: u64,
}

impl AccessionInfo {
    /// Name of the alt scaffold sequence in the reference fasta
    ///
    /// Format is `chr<chromosome>_<GenBank accession.version with '.' -> 'v'>_alt`, for
    /// instance: chr21_GL383580v2_alt
    ///
    pub fn fasta_identifier(&self) -> String {
        format!(
            "chr{}_{}_alt",
            self.chromosome,
            self.genbank_accession_version.replace('.', "v")
        )
    }
}

fn parse_accession_record(record: &StringRecord) -> SimpleResult<AccessionInfo> {
    check_field_count(record, ACCESSION_FIELD_COUNT)?;
    Ok(AccessionInfo {
        chromosome: get_field(record, 0, "chromosome")?.to_string(),
        refseq_accession_version: get_field(record, 1, "RefSeq accession")?.to_string(),
        refseq_gi: parse_int_field(record, 2, "RefSeq gi")?,
        genbank_accession_version: get_field(record, 3, "GenBank accession")?.to_string(),
        genbank_gi: parse_int_field(record, 4, "GenBank gi")?,
    })
}

/// Alt scaffold accessions, which can be looked up by either GenBank or RefSeq accession.version
///
#[derive(Default)]
pub struct AccessionTable {
    records: Vec<AccessionInfo>,
    index: HashMap<String, usize>,
}

impl AccessionTable {
    pub fn from_records(records: Vec<AccessionInfo>) -> Self {
        let mut index = HashMap::new();
        for (record_index, record) in records.iter().enumerate() {
            index.insert(record.genbank_accession_version.clone(), record_index);
            index.insert(record.refseq_accession_version.clone(), record_index);
        }
        Self { records, index }
    }

    pub fn get(&self, accession_version: &str) -> Option<&AccessionInfo> {
        self.index
            .get(accession_version)
            .map(|&x| &self.records[x])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

pub fn read_accession_table(filename: &Utf8Path) -> SimpleResult<AccessionTable> {
    let records = read_tsv_records(filename, "alt accessions", parse_accession_record)?;
    Ok(AccessionTable::from_records(records))
}

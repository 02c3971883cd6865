//! Alt locus metadata from the NCBI assembly reports
//!

mod accession;
mod placement;
mod region;

use std::collections::HashMap;

use camino::Utf8Path;
use log::{info, warn};
use simple_error::SimpleResult;

pub use accession::{AccessionInfo, AccessionTable, read_accession_table};
pub use placement::{PlacementInfo, read_placements};
pub use region::{RegionInfo, read_regions};

/// All metadata describing one alt scaffold placement
#[derive(Clone, Debug)]
pub struct AltLocus {
    pub accession: AccessionInfo,
    pub placement: PlacementInfo,
    pub region: RegionInfo,
}

impl AltLocus {
    pub fn fasta_identifier(&self) -> String {
        self.accession.fasta_identifier()
    }
}

/// Join each placement to its accession and region records
///
/// Placement file order is preserved. A placement without a matching accession or region is
/// skipped with a warning.
///
pub fn join_alt_loci(
    accessions: &AccessionTable,
    placements: Vec<PlacementInfo>,
    regions: &HashMap<String, RegionInfo>,
) -> Vec<AltLocus> {
    let mut loci = Vec::new();
    for placement in placements {
        let Some(accession) = accessions.get(&placement.alt_scaf_acc) else {
            warn!(
                "Skipping placement of alt scaffold '{}': no accession record found",
                placement.alt_scaf_acc
            );
            continue;
        };
        let Some(region) = regions.get(&placement.region_name) else {
            warn!(
                "Skipping placement of alt scaffold '{}': region '{}' is not defined",
                placement.alt_scaf_acc, placement.region_name
            );
            continue;
        };
        loci.push(AltLocus {
            accession: accession.clone(),
            placement,
            region: region.clone(),
        });
    }
    loci
}

/// Read the three metadata files and join them into the ordered alt locus list
///
pub fn read_alt_loci(
    accession_filename: &Utf8Path,
    placement_filename: &Utf8Path,
    region_filename: &Utf8Path,
) -> SimpleResult<Vec<AltLocus>> {
    let accessions = read_accession_table(accession_filename)?;
    let placements = read_placements(placement_filename)?;
    let regions = read_regions(region_filename)?;

    info!(
        "Read {} alt scaffold accessions, {} placements and {} regions",
        accessions.len(),
        placements.len(),
        regions.len()
    );

    Ok(join_alt_loci(&accessions, placements, &regions))
}

//! Assemble extended alt locus sequences
//!
//! An extended alt locus sequence replaces the parent region's reference sequence with the alt
//! scaffold, padded on each side with the reference flanks up to the region boundaries:
//!
//! ```text
//! region:    [---------------------------------------------]
//! parent:             [=========================]
//! extended:  [5' flank][alt scaffold core       ][3' flank ]
//! ```
//!

use simple_error::SimpleResult;

use crate::alt_loci::AltLocus;
use crate::genome_ref::SequenceSource;
use crate::seq_util::rev_comp_in_place;

/// A window on a named contig, 1-indexed and fully closed
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContigWindow {
    pub contig: String,
    pub start: i64,
    pub stop: i64,
}

impl ContigWindow {
    /// Test whether a flank window should be included in the extended sequence
    ///
    /// A flank is only included when start is strictly less than stop. This drops windows that
    /// collapse when the alt scaffold placement abuts the region boundary.
    ///
    pub fn is_supplied_flank(&self) -> bool {
        self.start < self.stop
    }
}

/// Reference and alt scaffold windows which make up one extended alt locus sequence
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendedLocusLayout {
    pub five_prime_flank: ContigWindow,
    pub core: ContigWindow,
    pub is_core_fwd_strand: bool,
    pub three_prime_flank: ContigWindow,
}

impl ExtendedLocusLayout {
    pub fn from_alt_locus(locus: &AltLocus) -> Self {
        let placement = &locus.placement;
        let parent_contig = placement.parent_contig_name();
        Self {
            five_prime_flank: ContigWindow {
                contig: parent_contig.clone(),
                start: locus.region.start,
                stop: placement.parent_start - 1,
            },
            core: ContigWindow {
                contig: locus.fasta_identifier(),
                start: placement.alt_scaf_start,
                stop: placement.alt_scaf_stop,
            },
            is_core_fwd_strand: placement.is_fwd_strand,
            three_prime_flank: ContigWindow {
                contig: parent_contig,
                start: placement.parent_stop + 1,
                stop: locus.region.stop,
            },
        }
    }
}

/// Concatenate the extended sequence from its three components
///
/// The core is reverse complemented in place when it is not on the forward strand.
///
pub fn assemble_extended(
    five_prime_flank: Option<&[u8]>,
    mut core: Vec<u8>,
    is_core_fwd_strand: bool,
    three_prime_flank: Option<&[u8]>,
) -> Vec<u8> {
    let flank_len = |x: Option<&[u8]>| x.map(|x| x.len()).unwrap_or(0);
    let mut extended = Vec::with_capacity(
        flank_len(five_prime_flank) + core.len() + flank_len(three_prime_flank),
    );

    if let Some(flank) = five_prime_flank {
        extended.extend_from_slice(flank);
    }
    if !is_core_fwd_strand {
        rev_comp_in_place(&mut core);
    }
    extended.extend_from_slice(&core);
    if let Some(flank) = three_prime_flank {
        extended.extend_from_slice(flank);
    }
    extended
}

/// Fetch all components of the layout from the reference and assemble the extended sequence
///
pub fn get_extended_locus_seq(
    source: &mut impl SequenceSource,
    layout: &ExtendedLocusLayout,
) -> SimpleResult<Vec<u8>> {
    let mut get_flank = |window: &ContigWindow| -> SimpleResult<Option<Vec<u8>>> {
        if window.is_supplied_flank() {
            Ok(Some(source.get_subsequence(
                &window.contig,
                window.start,
                window.stop,
            )?))
        } else {
            Ok(None)
        }
    };

    let five_prime_flank = get_flank(&layout.five_prime_flank)?;
    let three_prime_flank = get_flank(&layout.three_prime_flank)?;
    let core = source.get_subsequence(&layout.core.contig, layout.core.start, layout.core.stop)?;

    Ok(assemble_extended(
        five_prime_flank.as_deref(),
        core,
        layout.is_core_fwd_strand,
        three_prime_flank.as_deref(),
    ))
}

//! Seed (match) coordinate files for alignment pieces
//!
//! Each line of a seed file describes one match element of the piece as
//! `ref_offset<TAB>alt_offset<TAB>length`, with offsets 0-indexed relative to the piece start.
//!

use std::io::{self, Write};

use camino::Utf8Path;

use crate::alignment::{AlignmentElementType, AlignmentRecord};
use crate::fasta_output::write_file_atomic;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeedMatch {
    pub ref_offset: i64,
    pub alt_offset: i64,
    pub length: i64,
}

/// Get the seed matches of one alignment piece
///
/// The first match is anchored at the piece start and lengthened by `leading_offset`, which is
/// also added to the offsets of all later matches. The last match is lengthened by
/// `trailing_len`.
///
pub fn get_seed_matches(
    piece: &AlignmentRecord,
    leading_offset: i64,
    trailing_len: i64,
) -> Vec<SeedMatch> {
    let Some(first) = piece.elements().first() else {
        return Vec::new();
    };
    let (ref_base, alt_base) = (first.ref_offset, first.alt_offset);

    let matches = piece
        .elements()
        .iter()
        .filter(|x| x.element_type == AlignmentElementType::Match)
        .collect::<Vec<_>>();
    let last_index = matches.len().saturating_sub(1);

    matches
        .iter()
        .enumerate()
        .map(|(match_index, element)| {
            let mut length = element.length as i64;
            if match_index == last_index {
                length += trailing_len;
            }
            if match_index == 0 {
                SeedMatch {
                    ref_offset: 0,
                    alt_offset: 0,
                    length: length + leading_offset,
                }
            } else {
                SeedMatch {
                    ref_offset: element.ref_offset - ref_base + leading_offset,
                    alt_offset: element.alt_offset - alt_base + leading_offset,
                    length,
                }
            }
        })
        .collect()
}

pub fn write_seed_matches(f: &mut impl Write, matches: &[SeedMatch]) -> io::Result<()> {
    for x in matches {
        writeln!(f, "{}\t{}\t{}", x.ref_offset, x.alt_offset, x.length)?;
    }
    Ok(())
}

/// Write the seed file for one alignment piece, replacing any previous file
pub fn write_seed_file(filename: &Utf8Path, piece: &AlignmentRecord) -> io::Result<()> {
    let matches = get_seed_matches(piece, 0, 0);
    write_file_atomic(filename, |f| write_seed_matches(f, &matches))
}

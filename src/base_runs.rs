//! Find runs of unresolved bases in a realized sequence
//!

use std::fmt;

pub const UNKNOWN_BASE: u8 = b'N';

/// Sentinel runs up to this length are treated as short gaps
pub const DEFAULT_SHORT_GAP_MAX_LEN: usize = 10;

/// A run of bases in a realized sequence
///
/// Coordinates are 0-indexed and half-closed, [start,end), in the orientation of the realized
/// sequence.
///
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct SequenceRun {
    pub start: usize,
    pub end: usize,
}

impl SequenceRun {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Translate the run into 1-indexed, fully-closed coordinates on the source contig
    ///
    /// # Arguments
    /// * `contig_start` - 1-indexed contig position of the first base of the extracted window
    /// * `contig_stop` - 1-indexed contig position of the last base of the extracted window
    /// * `is_fwd_strand` - False if the realized sequence is the reverse complement of the window
    ///
    pub fn to_contig_coordinates(
        &self,
        contig_start: i64,
        contig_stop: i64,
        is_fwd_strand: bool,
    ) -> (i64, i64) {
        let (start, end) = (self.start as i64, self.end as i64);
        if is_fwd_strand {
            (contig_start + start, contig_start + end - 1)
        } else {
            (contig_stop - end + 1, contig_stop - start)
        }
    }
}

impl fmt::Debug for SequenceRun {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}-{})", self.start, self.end)
    }
}

/// Find all maximal runs of bases which either match or don't match `sentinel`
///
/// Matching is exact, so soft-masked `n` is not a sentinel. Runs are returned in ascending order, and
/// zero-length runs are never reported.
///
/// # Arguments
/// * `match_sentinel` - If true report runs of sentinel bases, otherwise report runs of all
///   other bases
///
pub fn find_runs(bases: &[u8], sentinel: u8, match_sentinel: bool) -> Vec<SequenceRun> {
    let mut runs = Vec::new();
    let mut start = 0;
    for (pos, base) in bases.iter().enumerate() {
        if (*base == sentinel) != match_sentinel {
            if start < pos {
                runs.push(SequenceRun { start, end: pos });
            }
            start = pos + 1;
        }
    }
    if start < bases.len() {
        runs.push(SequenceRun {
            start,
            end: bases.len(),
        });
    }
    runs
}

/// Runs of unknown ('N') bases
pub fn find_unknown_base_runs(bases: &[u8]) -> Vec<SequenceRun> {
    find_runs(bases, UNKNOWN_BASE, true)
}

/// Runs of resolved (non-'N') bases
pub fn find_resolved_base_runs(bases: &[u8]) -> Vec<SequenceRun> {
    find_runs(bases, UNKNOWN_BASE, false)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GapClass {
    /// Assumed to be an assembly artifact, the enclosing alignment segment is isolated for
    /// realignment
    Short,

    /// Assumed to be a real unresolved region
    Long,
}

/// Classify a run of unknown bases by length
///
pub fn classify_gap(run: &SequenceRun, short_gap_max_len: usize) -> GapClass {
    if run.len() > short_gap_max_len {
        GapClass::Long
    } else {
        GapClass::Short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every position is either in exactly one run of its class, or is a boundary position
    /// of the other class
    fn check_run_partition(bases: &[u8]) {
        let unknown = find_unknown_base_runs(bases);
        let resolved = find_resolved_base_runs(bases);

        for runs in [&unknown, &resolved] {
            for pair in runs.windows(2) {
                assert!(pair[0].end < pair[1].start);
            }
        }

        for (pos, base) in bases.iter().enumerate() {
            let in_run = |runs: &[SequenceRun]| {
                runs.iter()
                    .filter(|x| x.start <= pos && pos < x.end)
                    .count()
            };
            let is_unknown = *base == UNKNOWN_BASE;
            assert_eq!(in_run(&unknown), is_unknown as usize);
            assert_eq!(in_run(&resolved), !is_unknown as usize);
        }
    }

    #[test]
    fn test_find_runs() {
        let bases = b"ACGTNNNNNNACGT";
        assert_eq!(
            find_resolved_base_runs(bases),
            vec![
                SequenceRun { start: 0, end: 4 },
                SequenceRun { start: 10, end: 14 }
            ]
        );
        assert_eq!(
            find_unknown_base_runs(bases),
            vec![SequenceRun { start: 4, end: 10 }]
        );
    }

    #[test]
    fn test_find_runs_edges() {
        assert!(find_unknown_base_runs(b"").is_empty());
        assert!(find_resolved_base_runs(b"").is_empty());

        assert!(find_resolved_base_runs(b"NNNN").is_empty());
        assert_eq!(
            find_unknown_base_runs(b"NNNN"),
            vec![SequenceRun { start: 0, end: 4 }]
        );

        assert!(find_unknown_base_runs(b"ACGT").is_empty());
        assert_eq!(
            find_resolved_base_runs(b"ACGT"),
            vec![SequenceRun { start: 0, end: 4 }]
        );

        assert_eq!(
            find_unknown_base_runs(b"NANnA"),
            vec![
                SequenceRun { start: 0, end: 1 },
                SequenceRun { start: 2, end: 3 }
            ]
        );

        // Soft-masked bases are not unknown
        assert!(find_unknown_base_runs(b"ACnnGT").is_empty());
        assert_eq!(
            find_resolved_base_runs(b"ACnnGT"),
            vec![SequenceRun { start: 0, end: 6 }]
        );
    }

    #[test]
    fn test_run_partition() {
        for bases in [
            b"ACGTNNNNNNACGT".as_slice(),
            b"NACGTN",
            b"N",
            b"A",
            b"NNANNANNNA",
            b"acgtnnACGTNN",
        ] {
            check_run_partition(bases);
        }
    }

    #[test]
    fn test_classify_gap() {
        let run = |len: usize| SequenceRun { start: 4, end: 4 + len };
        assert_eq!(classify_gap(&run(6), DEFAULT_SHORT_GAP_MAX_LEN), GapClass::Short);
        assert_eq!(classify_gap(&run(10), DEFAULT_SHORT_GAP_MAX_LEN), GapClass::Short);
        assert_eq!(classify_gap(&run(11), DEFAULT_SHORT_GAP_MAX_LEN), GapClass::Long);
    }

    #[test]
    fn test_to_contig_coordinates() {
        let run = SequenceRun { start: 2, end: 5 };
        assert_eq!(run.to_contig_coordinates(101, 120, true), (103, 105));

        // Position 0 of the reverse realized sequence is the last window position:
        assert_eq!(run.to_contig_coordinates(101, 120, false), (116, 118));

        let run = SequenceRun { start: 0, end: 20 };
        assert_eq!(run.to_contig_coordinates(101, 120, false), (101, 120));
    }
}

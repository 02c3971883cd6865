//! Pairwise alignment of an alt scaffold to its parent reference region
//!

mod gff;
mod project;
mod segment;

pub use gff::read_gff_alignments;
pub use project::extract_sub_alignment;
pub use segment::{DEFAULT_LARGE_INDEL_THRESHOLD, split_alignment_at_large_indels};

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use itertools::Itertools;
use strum::{Display, EnumString};

/// Alignment edit operation type, serialized with the single letter codes used in the GFF Gap
/// attribute
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
pub enum AlignmentElementType {
    #[strum(serialize = "M")]
    Match,

    /// Bases present in the alt scaffold only
    #[strum(serialize = "I")]
    Insertion,

    /// Bases present in the reference only
    #[strum(serialize = "D")]
    Deletion,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlignmentElement {
    pub element_type: AlignmentElementType,
    pub length: u32,

    /// Offset of the element start from the reference start of the full source alignment
    pub ref_offset: i64,

    /// Offset of the element start from the alt start of the full source alignment
    pub alt_offset: i64,
}

impl AlignmentElement {
    /// Number of reference bases covered by this element
    pub fn ref_len(&self) -> i64 {
        use AlignmentElementType::*;
        match self.element_type {
            Match | Deletion => self.length as i64,
            Insertion => 0,
        }
    }

    /// Number of alt scaffold bases covered by this element
    pub fn alt_len(&self) -> i64 {
        use AlignmentElementType::*;
        match self.element_type {
            Match | Insertion => self.length as i64,
            Deletion => 0,
        }
    }

    pub fn is_indel(&self) -> bool {
        self.element_type != AlignmentElementType::Match
    }
}

/// A utility method to track ref and alt positions while iterating through alignment elements
///
pub fn update_ref_and_alt_pos(element: &AlignmentElement, ref_pos: &mut i64, alt_pos: &mut i64) {
    *ref_pos += element.ref_len();
    *alt_pos += element.alt_len();
}

/// Convert a list of edit operations into alignment elements, filling in the offset of each
/// element from the start of the alignment
///
pub fn get_alignment_elements(ops: &[(AlignmentElementType, u32)]) -> Vec<AlignmentElement> {
    let mut ref_pos = 0;
    let mut alt_pos = 0;
    ops.iter()
        .map(|&(element_type, length)| {
            let element = AlignmentElement {
                element_type,
                length,
                ref_offset: ref_pos,
                alt_offset: alt_pos,
            };
            update_ref_and_alt_pos(&element, &mut ref_pos, &mut alt_pos);
            element
        })
        .collect()
}

/// Reference and alt coordinate window of an alignment
///
/// All coordinates are 1-indexed and fully closed. An empty window on either side is expressed
/// as `stop == start - 1`.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AlignmentSpan {
    pub ref_start: i64,
    pub ref_stop: i64,
    pub alt_start: i64,
    pub alt_stop: i64,
}

impl AlignmentSpan {
    pub fn ref_size(&self) -> i64 {
        self.ref_stop + 1 - self.ref_start
    }

    pub fn alt_size(&self) -> i64 {
        self.alt_stop + 1 - self.alt_start
    }
}

/// Immutable alignment record
///
/// Sub-alignments produced by segmentation share the element list of the alignment they were cut
/// from, and only store the range of elements they cover.
///
#[derive(Clone)]
pub struct AlignmentRecord {
    ref_id: String,
    alt_id: String,
    span: AlignmentSpan,
    is_ref_fwd_strand: bool,
    is_alt_fwd_strand: bool,
    source_elements: Arc<[AlignmentElement]>,
    element_range: Range<usize>,
}

impl AlignmentRecord {
    pub fn new(
        ref_id: &str,
        alt_id: &str,
        span: AlignmentSpan,
        is_ref_fwd_strand: bool,
        is_alt_fwd_strand: bool,
        elements: Vec<AlignmentElement>,
    ) -> Self {
        let element_range = 0..elements.len();
        Self {
            ref_id: ref_id.to_string(),
            alt_id: alt_id.to_string(),
            span,
            is_ref_fwd_strand,
            is_alt_fwd_strand,
            source_elements: elements.into(),
            element_range,
        }
    }

    /// Create a record covering a sub-range of this record's elements
    ///
    /// The span is taken as given, see `extract_sub_alignment` to derive a consistent one.
    ///
    fn with_element_subrange(&self, span: AlignmentSpan, range: Range<usize>) -> Self {
        assert!(range.start <= range.end && range.end <= self.element_range.len());
        let offset = self.element_range.start;
        Self {
            ref_id: self.ref_id.clone(),
            alt_id: self.alt_id.clone(),
            span,
            is_ref_fwd_strand: self.is_ref_fwd_strand,
            is_alt_fwd_strand: self.is_alt_fwd_strand,
            source_elements: self.source_elements.clone(),
            element_range: (offset + range.start)..(offset + range.end),
        }
    }

    pub fn ref_id(&self) -> &str {
        &self.ref_id
    }

    pub fn alt_id(&self) -> &str {
        &self.alt_id
    }

    pub fn span(&self) -> &AlignmentSpan {
        &self.span
    }

    pub fn is_ref_fwd_strand(&self) -> bool {
        self.is_ref_fwd_strand
    }

    pub fn is_alt_fwd_strand(&self) -> bool {
        self.is_alt_fwd_strand
    }

    pub fn elements(&self) -> &[AlignmentElement] {
        &self.source_elements[self.element_range.clone()]
    }

    /// True if this record shares its element storage with `other`
    #[cfg(test)]
    pub fn shares_elements_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source_elements, &other.source_elements)
    }

    /// Test that the ref and alt window sizes match the total ref and alt lengths of the elements
    ///
    pub fn is_consistent(&self) -> bool {
        let ref_len = self.elements().iter().map(|x| x.ref_len()).sum::<i64>();
        let alt_len = self.elements().iter().map(|x| x.alt_len()).sum::<i64>();
        ref_len == self.span.ref_size() && alt_len == self.span.alt_size()
    }

    /// Gap attribute string of the elements, e.g. "M100 I5 M20"
    pub fn gap_string(&self) -> String {
        self.elements()
            .iter()
            .map(|x| format!("{}{}", x.element_type, x.length))
            .join(" ")
    }
}

impl fmt::Debug for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "AlignmentRecord: ref: {}:{}-{} fwd?: {} alt: {}:{}-{} fwd?: {} elements: {}",
            self.ref_id,
            self.span.ref_start,
            self.span.ref_stop,
            self.is_ref_fwd_strand,
            self.alt_id,
            self.span.alt_start,
            self.span.alt_stop,
            self.is_alt_fwd_strand,
            self.element_range.len(),
        )
    }
}

/// Format as a GFF alignment line
impl fmt::Display for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let strand_char = |x: bool| if x { '+' } else { '-' };
        write!(
            f,
            "{}\tRefSeq\tmatch\t{}\t{}\t.\t{}\t.\tTarget={} {} {} {};Gap={}",
            self.ref_id,
            self.span.ref_start,
            self.span.ref_stop,
            strand_char(self.is_ref_fwd_strand),
            self.alt_id,
            self.span.alt_start,
            self.span.alt_stop,
            strand_char(self.is_alt_fwd_strand),
            self.gap_string(),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::test_utils::get_test_alignment;
    use super::*;

    use AlignmentElementType::*;

    #[test]
    fn test_get_alignment_elements() {
        let elements = get_alignment_elements(&[(Match, 10), (Insertion, 3), (Deletion, 4), (Match, 2)]);
        let offsets = elements
            .iter()
            .map(|x| (x.ref_offset, x.alt_offset))
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![(0, 0), (10, 10), (10, 13), (14, 13)]);
    }

    #[test]
    fn test_element_type_codes() {
        assert_eq!(Match.to_string(), "M");
        assert_eq!("D".parse::<AlignmentElementType>().unwrap(), Deletion);
        assert!("X".parse::<AlignmentElementType>().is_err());
    }

    #[test]
    fn test_is_consistent() {
        let al = get_test_alignment(100, 1, &[(Match, 10), (Deletion, 5), (Insertion, 2)]);
        assert_eq!(al.span().ref_size(), 15);
        assert_eq!(al.span().alt_size(), 12);
        assert!(al.is_consistent());

        let span = AlignmentSpan {
            ref_start: 100,
            ref_stop: 110,
            alt_start: 1,
            alt_stop: 10,
        };
        let al = AlignmentRecord::new("a", "b", span, true, true, get_alignment_elements(&[(Match, 10)]));
        assert!(!al.is_consistent());
    }

    #[test]
    fn test_display() {
        let al = get_test_alignment(100, 1, &[(Match, 10), (Insertion, 2)]);
        assert_eq!(
            al.to_string(),
            "chr1\tRefSeq\tmatch\t100\t109\t.\t+\t.\tTarget=chr1_KI000001v1_alt 1 12 +;Gap=M10 I2"
        );
    }
}

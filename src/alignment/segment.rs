use super::{AlignmentRecord, extract_sub_alignment};

/// Minimum length of an insertion or deletion element to count towards a structural break
pub const DEFAULT_LARGE_INDEL_THRESHOLD: u32 = 5000;

/// Split an alignment wherever two or more large indel elements occur back to back
///
/// A single large indel is kept as an ordinary alignment edit. A run of two or more
/// consecutive insertion/deletion elements of at least `large_indel_threshold` bases starts a
/// new alignment segment at the first element of the run, so that each side of the break can be
/// handled independently.
///
/// The returned segments are in input order, and together cover every input element exactly
/// once. If no break is found, the input alignment is returned as the only segment.
///
pub fn split_alignment_at_large_indels(
    alignment: AlignmentRecord,
    large_indel_threshold: u32,
) -> Vec<AlignmentRecord> {
    let element_count = alignment.elements().len();

    let mut break_indices = Vec::new();
    let mut large_indel_run = 0;
    for (element_index, element) in alignment.elements().iter().enumerate() {
        if element.is_indel() && element.length >= large_indel_threshold {
            large_indel_run += 1;
        } else {
            large_indel_run = 0;
        }

        // Break once per run, at the first large indel of the run. A break at index zero would
        // leave an empty leading segment, so it is not a break.
        if large_indel_run == 2 && element_index > 1 {
            break_indices.push(element_index - 1);
        }
    }

    if break_indices.is_empty() {
        return vec![alignment];
    }

    let mut segments = Vec::new();
    let mut segment_start = 0;
    for break_index in break_indices.into_iter().chain(std::iter::once(element_count)) {
        if segment_start < break_index {
            segments.push(extract_sub_alignment(&alignment, segment_start, break_index));
        }
        segment_start = break_index;
    }
    segments
}

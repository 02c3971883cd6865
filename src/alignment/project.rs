use log::debug;

use super::{AlignmentRecord, AlignmentSpan};

/// Find the reference and alt window covered by the element range `[start_index, end_index)`
/// of `alignment`
///
/// Element indices are 0-indexed and relative to the elements of `alignment`. The result is
/// independent of the elements outside of the requested range. An empty range yields an empty
/// window (`stop == start - 1`) on both sides, anchored where the range starts.
///
pub fn project_element_range(
    alignment: &AlignmentRecord,
    start_index: usize,
    end_index: usize,
) -> AlignmentSpan {
    let elements = alignment.elements();
    assert!(
        start_index <= end_index && end_index <= elements.len(),
        "Invalid element range [{start_index},{end_index}) for alignment with {} elements",
        elements.len()
    );

    let source_span = alignment.span();
    let mut span = AlignmentSpan {
        ref_start: source_span.ref_start,
        ref_stop: source_span.ref_start - 1,
        alt_start: source_span.alt_start,
        alt_stop: source_span.alt_start - 1,
    };

    for (element_index, element) in elements.iter().take(end_index).enumerate() {
        if element_index < start_index {
            span.ref_start += element.ref_len();
            span.alt_start += element.alt_len();
        }
        span.ref_stop += element.ref_len();
        span.alt_stop += element.alt_len();
    }
    span
}

/// Extract the sub-alignment covering elements `[start_index, end_index)` of `alignment`
///
/// The new record shares the element storage of `alignment` and carries the coordinate window
/// of the extracted elements.
///
pub fn extract_sub_alignment(
    alignment: &AlignmentRecord,
    start_index: usize,
    end_index: usize,
) -> AlignmentRecord {
    let span = project_element_range(alignment, start_index, end_index);
    debug!(
        "Extracting alignment elements [{start_index},{end_index}) of {} from {}",
        alignment.elements().len(),
        alignment.alt_id()
    );
    alignment.with_element_subrange(span, start_index..end_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignmentElementType::*;
    use crate::alignment::test_utils::get_test_alignment;

    #[test]
    fn test_project_full_range() {
        let al = get_test_alignment(
            1000,
            1,
            &[(Match, 100), (Insertion, 7), (Match, 20), (Deletion, 3), (Match, 5)],
        );
        let span = project_element_range(&al, 0, al.elements().len());
        assert_eq!(&span, al.span());
    }

    #[test]
    fn test_project_inner_range() {
        let al = get_test_alignment(
            1000,
            1,
            &[(Match, 100), (Insertion, 7), (Match, 20), (Deletion, 3), (Match, 5)],
        );

        let span = project_element_range(&al, 1, 4);
        assert_eq!(
            span,
            AlignmentSpan {
                ref_start: 1100,
                ref_stop: 1122,
                alt_start: 101,
                alt_stop: 127,
            }
        );
        assert_eq!(span.ref_size(), 23);
        assert_eq!(span.alt_size(), 27);
    }

    #[test]
    fn test_project_empty_range() {
        let al = get_test_alignment(1000, 1, &[(Match, 100), (Insertion, 7)]);
        let span = project_element_range(&al, 1, 1);
        assert_eq!(span.ref_start, 1100);
        assert_eq!(span.ref_size(), 0);
        assert_eq!(span.alt_start, 101);
        assert_eq!(span.alt_size(), 0);
    }

    #[test]
    fn test_extract_sub_alignment() {
        let al = get_test_alignment(
            1000,
            50,
            &[(Match, 10), (Deletion, 4), (Match, 6), (Insertion, 2), (Match, 8)],
        );

        let sub = extract_sub_alignment(&al, 1, 3);
        assert!(sub.is_consistent());
        assert!(sub.shares_elements_with(&al));
        assert_eq!(sub.elements(), &al.elements()[1..3]);
        assert_eq!(sub.span().ref_start, 1010);
        assert_eq!(sub.span().ref_stop, 1019);
        assert_eq!(sub.span().alt_start, 60);
        assert_eq!(sub.span().alt_stop, 65);

        // Projection of a sub-alignment is relative to the sub-alignment's own elements:
        let subsub = extract_sub_alignment(&sub, 1, 2);
        assert_eq!(subsub.elements(), &al.elements()[2..3]);
        assert_eq!(subsub.span().ref_start, 1014);
        assert_eq!(subsub.span().alt_start, 60);
        assert!(subsub.is_consistent());
    }

    #[test]
    #[should_panic]
    fn test_project_invalid_range() {
        let al = get_test_alignment(1, 1, &[(Match, 10)]);
        project_element_range(&al, 0, 2);
    }
}

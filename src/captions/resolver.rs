use super::segment::Segment;

/// Returns the first segment, in list order, whose inclusive range contains `time`.
///
/// Input may be unsorted and overlapping; the lowest index wins on overlap.
pub fn resolve_active(time: f64, segments: &[Segment]) -> Option<usize> {
    segments.iter().position(|segment| segment.contains(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_scenario() {
        let segments = vec![Segment::new(0.0, 0.4, "Hi")];
        assert_eq!(resolve_active(0.2, &segments), Some(0));
        assert_eq!(resolve_active(0.5, &segments), None);
    }

    #[test]
    fn overlap_resolves_to_first_match() {
        let segments = vec![Segment::new(0.0, 2.0, "A"), Segment::new(1.0, 3.0, "B")];
        assert_eq!(resolve_active(1.5, &segments), Some(0));
        assert_eq!(resolve_active(2.5, &segments), Some(1));
    }

    #[test]
    fn unsorted_input_keeps_list_order() {
        let segments = vec![
            Segment::new(5.0, 6.0, "late"),
            Segment::new(0.0, 10.0, "wide"),
            Segment::new(5.0, 5.5, "inner"),
        ];
        assert_eq!(resolve_active(5.2, &segments), Some(0));
        assert_eq!(resolve_active(1.0, &segments), Some(1));
    }

    #[test]
    fn empty_set_has_no_active_segment() {
        assert_eq!(resolve_active(0.0, &[]), None);
    }

    #[test]
    fn gaps_and_boundaries() {
        let segments = vec![
            Segment::new(0.0, 0.4, "If you are watching"),
            Segment::new(0.5, 1.4, "all this,"),
            Segment::new(2.0, 3.0, "you can watch this"),
        ];
        assert_eq!(resolve_active(0.4, &segments), Some(0));
        assert_eq!(resolve_active(0.45, &segments), None);
        assert_eq!(resolve_active(0.5, &segments), Some(1));
        assert_eq!(resolve_active(1.7, &segments), None);
        assert_eq!(resolve_active(3.0, &segments), Some(2));
    }

    #[test]
    fn matches_lowest_index_for_every_sample() {
        let segments = vec![
            Segment::new(0.0, 1.0, "a"),
            Segment::new(0.5, 2.0, "b"),
            Segment::new(3.0, 2.5, "inverted"),
            Segment::new(1.5, 4.0, "c"),
        ];
        for step in 0..=50 {
            let t = step as f64 * 0.1;
            let expected = (0..segments.len())
                .find(|&i| segments[i].start <= t && t <= segments[i].end);
            assert_eq!(resolve_active(t, &segments), expected, "t = {t}");
        }
    }
}

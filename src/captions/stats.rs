use serde::Serialize;

use super::segment::Segment;

/// Summary of a caption set, used by `captl check`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaptionStats {
    pub segment_count: usize,
    pub first_start: Option<f64>,
    pub last_end: Option<f64>,
    pub spoken_seconds: f64,
    /// Index pairs whose ranges overlap; resolution picks the lower index
    pub overlapping_pairs: Vec<(usize, usize)>,
    pub inverted: Vec<usize>,
    pub empty_text: Vec<usize>,
}

pub fn caption_stats(segments: &[Segment]) -> CaptionStats {
    let mut stats = CaptionStats {
        segment_count: segments.len(),
        ..CaptionStats::default()
    };

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_inverted() {
            stats.inverted.push(i);
        } else {
            stats.first_start = Some(
                stats
                    .first_start
                    .map_or(segment.start, |start| start.min(segment.start)),
            );
            stats.last_end = Some(
                stats
                    .last_end
                    .map_or(segment.end, |end| end.max(segment.end)),
            );
        }
        if segment.text.trim().is_empty() {
            stats.empty_text.push(i);
        }
        stats.spoken_seconds += segment.duration();

        for (j, other) in segments.iter().enumerate().skip(i + 1) {
            if segment.overlaps(other) {
                stats.overlapping_pairs.push((i, j));
            }
        }
    }

    stats
}

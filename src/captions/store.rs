use super::error::{CaptionError, CaptionResult};
use super::segment::Segment;

/// Owns the live caption set and the baseline snapshot taken at generation time.
///
/// The store does not track external index references. After `delete_at`
/// every index past the removed one refers to a different segment, so callers
/// holding indices have to re-derive them.
#[derive(Debug, Clone, Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    baseline: Option<Vec<Segment>>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a freshly generated caption set and snapshots it as the baseline.
    pub fn replace_all(&mut self, segments: Vec<Segment>) {
        self.baseline = Some(segments.clone());
        self.segments = segments;
    }

    /// Restores the live set from the baseline. The baseline itself is never touched,
    /// so applying this twice yields the same set as applying it once.
    pub fn revert_to_baseline(&mut self) -> CaptionResult<()> {
        let baseline = self
            .baseline
            .as_ref()
            .ok_or(CaptionError::NoBaselineAvailable)?;
        self.segments = baseline.clone();
        Ok(())
    }

    /// Empties the live set and keeps the baseline.
    pub fn clear_current(&mut self) {
        self.segments.clear();
    }

    pub fn update_text(&mut self, index: usize, text: impl Into<String>) -> CaptionResult<()> {
        let len = self.segments.len();
        let segment = self
            .segments
            .get_mut(index)
            .ok_or(CaptionError::IndexOutOfRange { index, len })?;
        segment.text = text.into();
        Ok(())
    }

    pub fn delete_at(&mut self, index: usize) -> CaptionResult<Segment> {
        if index >= self.segments.len() {
            return Err(CaptionError::IndexOutOfRange {
                index,
                len: self.segments.len(),
            });
        }
        Ok(self.segments.remove(index))
    }

    pub fn get(&self, index: usize) -> CaptionResult<&Segment> {
        self.segments.get(index).ok_or(CaptionError::IndexOutOfRange {
            index,
            len: self.segments.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn baseline(&self) -> Option<&[Segment]> {
        self.baseline.as_deref()
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }
}

use serde::Serialize;

use super::clock::PlaybackClock;
use super::edit::{EditMode, EditSession, EditSessions};
use super::error::{CaptionError, CaptionResult};
use super::scheduler::{FrameScheduler, TickScheduler};
use super::segment::{Segment, format_clock};
use super::service::{GenerationResponse, RenderRequest};
use super::store::SegmentStore;
use super::style::CaptionStyle;
use super::sync::{SyncEvent, SyncLoop, SyncState};

/// What applying a generation response did to the caption set.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Number of segments now installed
    pub installed: usize,
    /// Service message when no speech was found
    pub notice: Option<String>,
    pub detected_language: Option<String>,
    pub event: Option<SyncEvent>,
}

/// One row of the editable caption list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub label: String,
    pub active: bool,
    pub mode: EditMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_text: Option<String>,
    /// Working text differs from the text the session opened with
    pub modified: bool,
}

/// One caption editing session: the caption set, its baseline, the sync loop
/// and the open edits. Construct one per editing session.
#[derive(Debug)]
pub struct CaptionEngine<C, S = FrameScheduler> {
    store: SegmentStore,
    sync: SyncLoop<S>,
    edits: EditSessions,
    clock: C,
}

impl<C: PlaybackClock> CaptionEngine<C, FrameScheduler> {
    pub fn new(clock: C) -> Self {
        Self::with_scheduler(clock, FrameScheduler::new())
    }
}

impl<C: PlaybackClock, S: TickScheduler> CaptionEngine<C, S> {
    pub fn with_scheduler(clock: C, scheduler: S) -> Self {
        Self {
            store: SegmentStore::new(),
            sync: SyncLoop::new(scheduler),
            edits: EditSessions::new(),
            clock,
        }
    }

    // --- caption set ---

    /// Installs a new caption set and baseline. Open edits are discarded and the
    /// active pointer is reset; if something was displayed a deactivation is returned.
    pub fn replace_all(&mut self, segments: Vec<Segment>) -> Option<SyncEvent> {
        self.store.replace_all(segments);
        self.edits.clear();
        self.sync.invalidate()
    }

    pub fn revert_to_baseline(&mut self) -> CaptionResult<Option<SyncEvent>> {
        self.store.revert_to_baseline()?;
        self.edits.clear();
        Ok(self.sync.invalidate())
    }

    /// Applies a generation service response. On error nothing is touched.
    pub fn apply_generation(
        &mut self,
        response: GenerationResponse,
    ) -> CaptionResult<GenerationOutcome> {
        match response {
            GenerationResponse::Success {
                segments,
                words,
                detected_language,
            } => {
                let source = if segments.is_empty() { words } else { segments };
                let segments: Vec<Segment> = source.into_iter().map(Segment::from).collect();
                let installed = segments.len();
                let event = self.replace_all(segments);
                Ok(GenerationOutcome {
                    installed,
                    notice: None,
                    detected_language,
                    event,
                })
            }
            GenerationResponse::NoAudio { message } | GenerationResponse::NoVoice { message } => {
                self.store.clear_current();
                self.edits.clear();
                let event = self.sync.invalidate();
                Ok(GenerationOutcome {
                    installed: 0,
                    notice: Some(message),
                    detected_language: None,
                    event,
                })
            }
            GenerationResponse::Error { message } => Err(CaptionError::Generation { message }),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }

    pub fn get(&self, index: usize) -> CaptionResult<&Segment> {
        self.store.get(index)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    // --- playback ---

    pub fn play(&mut self) -> Option<SyncEvent> {
        self.clock.set_playing(true);
        let time = self.clock.position();
        self.sync.start(time, self.store.segments())
    }

    pub fn pause(&mut self) {
        self.clock.set_playing(false);
        self.sync.stop();
    }

    /// Delivers one scheduled tick: samples the clock and resolves against the
    /// current caption set.
    pub fn tick(&mut self) -> Option<SyncEvent> {
        let time = self.clock.position();
        self.sync.tick(time, self.store.segments())
    }

    pub fn seek(&mut self, seconds: f64) -> Option<SyncEvent> {
        self.clock.seek(seconds);
        let time = self.clock.position();
        self.sync.seek(time, self.store.segments())
    }

    /// Jumps to the start of a segment and resolves there.
    pub fn seek_to_segment(&mut self, index: usize) -> CaptionResult<Option<SyncEvent>> {
        let start = self.store.get(index)?.start;
        Ok(self.seek(start))
    }

    /// Jumps to the start of a segment and starts playback from there.
    pub fn play_segment(&mut self, index: usize) -> CaptionResult<Option<SyncEvent>> {
        let jumped = self.seek_to_segment(index)?;
        let started = self.play();
        Ok(jumped.or(started))
    }

    pub fn ticks(&self) -> u64 {
        self.sync.ticks()
    }

    pub fn tick_pending(&self) -> bool {
        self.sync.scheduler().is_pending()
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    pub fn is_playing(&self) -> bool {
        self.sync.is_running()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.sync.active()
    }

    pub fn active_segment(&self) -> Option<&Segment> {
        self.sync
            .active()
            .and_then(|index| self.store.segments().get(index))
    }

    pub fn position(&self) -> f64 {
        self.clock.position()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // --- editing ---

    /// Opens (or reopens) an edit session and returns its working text.
    pub fn begin_edit(&mut self, index: usize) -> CaptionResult<&str> {
        let current = &self.store.get(index)?.text;
        Ok(self.edits.open(index, current).working_text())
    }

    pub fn set_working_text(&mut self, index: usize, text: impl Into<String>) -> CaptionResult<()> {
        self.edits.set_working_text(index, text)
    }

    pub fn working_text(&self, index: usize) -> Option<&str> {
        self.edits.get(index).map(|session| session.working_text())
    }

    /// Commits the trimmed working text. When the edited segment is on screen it
    /// is re-announced so the display picks up the new text.
    pub fn save_edit(&mut self, index: usize) -> CaptionResult<Option<SyncEvent>> {
        let text = self
            .edits
            .get(index)
            .ok_or(CaptionError::NoEditSession { index })?
            .committed_text();
        self.store.update_text(index, text)?;
        self.edits.close(index)?;

        if self.sync.active() == Some(index) {
            let time = self.clock.position();
            return Ok(self.sync.refresh(time, self.store.segments()));
        }
        Ok(None)
    }

    pub fn cancel_edit(&mut self, index: usize) -> CaptionResult<()> {
        self.edits.close(index).map(|_| ())
    }

    /// Removes a segment. Open edits and the active pointer are re-keyed so they
    /// keep referring to the same segments, then the position is resolved again.
    pub fn delete(&mut self, index: usize) -> CaptionResult<Option<SyncEvent>> {
        self.store.delete_at(index)?;
        self.edits.rekey_after_delete(index);
        let rekeyed = self.sync.rekey_after_delete(index);
        // another segment may now cover the position the deleted one held
        let time = self.clock.position();
        let resolved = self.sync.seek(time, self.store.segments());
        Ok(resolved.or(rekeyed))
    }

    pub fn edit_mode(&self, index: usize) -> EditMode {
        self.edits.mode(index)
    }

    pub fn open_edits(&self) -> Vec<usize> {
        self.edits.open_indices()
    }

    // --- outward views ---

    pub fn renderable_segments(&self) -> Vec<SegmentRow> {
        let active = self.sync.active();
        self.store
            .segments()
            .iter()
            .enumerate()
            .map(|(index, segment)| SegmentRow {
                index,
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
                label: format!(
                    "{} → {}",
                    format_clock(segment.start),
                    format_clock(segment.end)
                ),
                active: active == Some(index),
                mode: self.edits.mode(index),
                working_text: self.working_text(index).map(str::to_string),
                modified: self
                    .edits
                    .get(index)
                    .is_some_and(EditSession::is_modified),
            })
            .collect()
    }

    pub fn render_request<'a>(
        &'a self,
        media: impl Into<String>,
        style: &'a CaptionStyle,
    ) -> RenderRequest<'a> {
        RenderRequest {
            media: media.into(),
            segments: self.store.segments(),
            styles: style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::clock::ManualClock;

    fn engine_with(segments: Vec<Segment>) -> CaptionEngine<ManualClock> {
        let mut engine = CaptionEngine::new(ManualClock::default());
        engine.replace_all(segments);
        engine
    }

    fn demo() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 0.4, "If you are watching"),
            Segment::new(0.5, 1.4, "all this,"),
            Segment::new(2.0, 3.0, "you can watch this"),
            Segment::new(3.1, 3.4, "video."),
        ]
    }

    #[test]
    fn playback_emits_one_event_per_change() {
        let mut engine = engine_with(demo());
        let mut events = Vec::new();
        events.extend(engine.play());
        for step in 0..40 {
            engine.clock_mut().set(step as f64 * 0.1 + 0.05);
            events.extend(engine.tick());
        }
        let indices: Vec<Option<usize>> = events.iter().map(SyncEvent::index).collect();
        assert_eq!(
            indices,
            vec![Some(0), None, Some(1), None, Some(2), None, Some(3), None]
        );
    }

    #[test]
    fn resolver_sees_edits_made_mid_playback() {
        let mut engine = engine_with(demo());
        engine.play();
        engine.begin_edit(1).unwrap();
        engine.set_working_text(1, "  everything  ").unwrap();
        assert_eq!(engine.save_edit(1).unwrap(), None);

        engine.clock_mut().set(0.7);
        assert_eq!(
            engine.tick(),
            Some(SyncEvent::Activated {
                index: 1,
                text: "everything".to_string()
            })
        );
    }

    #[test]
    fn saving_active_segment_reannounces_it() {
        let mut engine = engine_with(demo());
        engine.seek(0.2);
        engine.begin_edit(0).unwrap();
        engine.set_working_text(0, "Hello").unwrap();
        let event = engine.save_edit(0).unwrap();
        assert_eq!(
            event,
            Some(SyncEvent::Activated {
                index: 0,
                text: "Hello".to_string()
            })
        );
        assert_eq!(engine.edit_mode(0), EditMode::Viewing);
    }

    #[test]
    fn edit_isolation_until_save() {
        let mut engine = engine_with(demo());
        engine.begin_edit(2).unwrap();
        engine.set_working_text(2, "draft").unwrap();
        assert_eq!(engine.get(2).unwrap().text, "you can watch this");
        engine.cancel_edit(2).unwrap();
        assert_eq!(engine.get(2).unwrap().text, "you can watch this");
        assert_eq!(engine.edit_mode(2), EditMode::Viewing);
        assert_eq!(
            engine.save_edit(2),
            Err(CaptionError::NoEditSession { index: 2 })
        );
    }

    #[test]
    fn empty_save_is_allowed() {
        let mut engine = engine_with(demo());
        engine.begin_edit(0).unwrap();
        engine.set_working_text(0, "   ").unwrap();
        engine.save_edit(0).unwrap();
        assert_eq!(engine.get(0).unwrap().text, "");
    }

    #[test]
    fn begin_edit_out_of_range() {
        let mut engine = engine_with(demo());
        assert_eq!(
            engine.begin_edit(9).unwrap_err(),
            CaptionError::IndexOutOfRange { index: 9, len: 4 }
        );
    }

    #[test]
    fn delete_rekeys_sessions_and_pointer() {
        let mut engine = engine_with(demo());
        engine.seek(2.5);
        engine.begin_edit(3).unwrap();
        engine.set_working_text(3, "movie.").unwrap();

        assert_eq!(engine.delete(0).unwrap(), None);
        assert_eq!(engine.active_index(), Some(1));
        assert_eq!(engine.open_edits(), vec![2]);
        assert_eq!(engine.working_text(2), Some("movie."));

        engine.save_edit(2).unwrap();
        assert_eq!(engine.get(2).unwrap().text, "movie.");
    }

    #[test]
    fn deleting_active_segment_clears_display() {
        let mut engine = engine_with(demo());
        engine.seek(0.6);
        assert_eq!(engine.delete(1).unwrap(), Some(SyncEvent::Deactivated));
        assert_eq!(engine.active_index(), None);
        assert_eq!(engine.get(1).unwrap().text, "you can watch this");
        assert!(engine.delete(10).is_err());
    }

    #[test]
    fn deleting_active_segment_reveals_overlapped_one() {
        let mut engine = engine_with(vec![
            Segment::new(0.0, 2.0, "A"),
            Segment::new(1.0, 3.0, "B"),
        ]);
        engine.seek(1.5);
        assert_eq!(engine.active_index(), Some(0));

        assert_eq!(
            engine.delete(0).unwrap(),
            Some(SyncEvent::Activated {
                index: 0,
                text: "B".to_string()
            })
        );
        assert_eq!(engine.active_segment().unwrap().text, "B");
    }

    #[test]
    fn seek_to_segment_jumps_to_its_start() {
        let mut engine = engine_with(demo());
        assert_eq!(
            engine.seek_to_segment(2).unwrap(),
            Some(SyncEvent::Activated {
                index: 2,
                text: "you can watch this".to_string()
            })
        );
        assert_eq!(engine.position(), 2.0);
        assert!(!engine.is_playing());
        assert_eq!(
            engine.seek_to_segment(4),
            Err(CaptionError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(engine.position(), 2.0);
    }

    #[test]
    fn play_segment_starts_playback_at_segment() {
        let mut engine = engine_with(demo());
        assert_eq!(
            engine.play_segment(1).unwrap(),
            Some(SyncEvent::Activated {
                index: 1,
                text: "all this,".to_string()
            })
        );
        assert!(engine.is_playing());
        assert!(engine.tick_pending());
        assert_eq!(engine.position(), 0.5);

        // already running: only the jump happens
        assert_eq!(
            engine.play_segment(3).unwrap().and_then(|event| event.index()),
            Some(3)
        );
        assert!(engine.play_segment(9).is_err());
        assert!(engine.is_playing());
    }

    #[test]
    fn revert_restores_generation_result() {
        let mut engine = engine_with(demo());
        engine.begin_edit(0).unwrap();
        engine.set_working_text(0, "changed").unwrap();
        engine.save_edit(0).unwrap();
        engine.delete(3).unwrap();
        engine.begin_edit(1).unwrap();

        engine.revert_to_baseline().unwrap();
        engine.revert_to_baseline().unwrap();
        assert_eq!(engine.segments(), demo().as_slice());
        assert!(engine.open_edits().is_empty());
    }

    #[test]
    fn revert_without_generation_is_non_fatal() {
        let mut engine = CaptionEngine::new(ManualClock::default());
        assert_eq!(
            engine.revert_to_baseline(),
            Err(CaptionError::NoBaselineAvailable)
        );
        assert!(CaptionError::NoBaselineAvailable.is_benign());
    }

    #[test]
    fn replace_all_invalidates_pointer() {
        let mut engine = engine_with(demo());
        engine.seek(0.2);
        let event = engine.replace_all(vec![Segment::new(0.0, 5.0, "new")]);
        assert_eq!(event, Some(SyncEvent::Deactivated));
        assert_eq!(engine.active_index(), None);
        assert_eq!(
            engine.seek(0.2),
            Some(SyncEvent::Activated {
                index: 0,
                text: "new".to_string()
            })
        );
    }

    #[test]
    fn generation_error_leaves_state_untouched() {
        let mut engine = engine_with(demo());
        let result = engine.apply_generation(GenerationResponse::Error {
            message: "boom".to_string(),
        });
        assert!(matches!(result, Err(CaptionError::Generation { .. })));
        assert_eq!(engine.segments(), demo().as_slice());
        assert_eq!(engine.store().baseline(), Some(demo().as_slice()));
    }

    #[test]
    fn no_voice_installs_empty_set_and_keeps_baseline() {
        let mut engine = engine_with(demo());
        let outcome = engine
            .apply_generation(GenerationResponse::NoVoice {
                message: "No speech".to_string(),
            })
            .unwrap();
        assert_eq!(outcome.installed, 0);
        assert_eq!(outcome.notice.as_deref(), Some("No speech"));
        assert!(engine.is_empty());
        assert_eq!(engine.seek(0.2), None);
        engine.revert_to_baseline().unwrap();
        assert_eq!(engine.len(), 4);
    }

    #[test]
    fn generation_success_replaces_baseline() {
        let mut engine = engine_with(demo());
        let outcome = engine
            .apply_generation(GenerationResponse::success(vec![Segment::new(
                0.0, 1.0, "fresh",
            )]))
            .unwrap();
        assert_eq!(outcome.installed, 1);
        engine.begin_edit(0).unwrap();
        engine.set_working_text(0, "edited").unwrap();
        engine.save_edit(0).unwrap();
        engine.revert_to_baseline().unwrap();
        assert_eq!(engine.get(0).unwrap().text, "fresh");
    }

    #[test]
    fn renderable_rows_reflect_state() {
        let mut engine = engine_with(demo());
        engine.seek(2.2);
        engine.begin_edit(0).unwrap();
        let rows = engine.renderable_segments();
        assert_eq!(rows.len(), 4);
        assert!(rows[2].active);
        assert!(!rows[0].active);
        assert_eq!(rows[0].mode, EditMode::Editing);
        assert_eq!(rows[0].working_text.as_deref(), Some("If you are watching"));
        assert!(!rows[0].modified);
        assert_eq!(rows[2].label, "00:02 → 00:03");

        engine.set_working_text(0, "If you're watching").unwrap();
        let rows = engine.renderable_segments();
        assert!(rows[0].modified);
        assert!(!rows[1].modified);
    }

    #[test]
    fn pause_keeps_active_segment() {
        let mut engine = engine_with(demo());
        engine.clock_mut().set(0.6);
        engine.play();
        engine.pause();
        assert_eq!(engine.sync_state(), SyncState::Stopped);
        assert!(!engine.tick_pending());
        assert_eq!(engine.active_segment().map(|s| s.text.as_str()), Some("all this,"));
        engine.clock_mut().set(2.5);
        assert_eq!(engine.tick(), None);
        assert_eq!(
            engine.play(),
            Some(SyncEvent::Activated {
                index: 2,
                text: "you can watch this".to_string()
            })
        );
    }
}

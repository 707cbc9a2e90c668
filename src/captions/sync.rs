use serde::Serialize;

use super::resolver::resolve_active;
use super::scheduler::TickScheduler;
use super::segment::Segment;

/// Edge-triggered notification for the overlay/highlight layer.
/// At most one is produced per resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    Activated { index: usize, text: String },
    Deactivated,
}

impl SyncEvent {
    pub fn index(&self) -> Option<usize> {
        match self {
            SyncEvent::Activated { index, .. } => Some(*index),
            SyncEvent::Deactivated => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncState {
    #[default]
    Stopped,
    Running,
}

/// Drives the resolver on a cooperative schedule and owns the active-segment pointer.
#[derive(Debug)]
pub struct SyncLoop<S> {
    state: SyncState,
    active: Option<usize>,
    scheduler: S,
    ticks: u64,
}

impl<S: TickScheduler> SyncLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            state: SyncState::Stopped,
            active: None,
            scheduler,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SyncState::Running
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Stopped -> Running. Resolves once immediately, then asks for the next tick.
    pub fn start(&mut self, time: f64, segments: &[Segment]) -> Option<SyncEvent> {
        if self.is_running() {
            return None;
        }
        self.state = SyncState::Running;
        let event = self.resolve(time, segments);
        self.scheduler.schedule();
        event
    }

    /// Handles one scheduled tick. Ticks delivered while stopped, or without a
    /// pending schedule, are dropped.
    pub fn tick(&mut self, time: f64, segments: &[Segment]) -> Option<SyncEvent> {
        if !self.is_running() || !self.scheduler.take() {
            return None;
        }
        self.ticks = self.ticks.wrapping_add(1);
        let event = self.resolve(time, segments);
        self.scheduler.schedule();
        event
    }

    /// Running -> Stopped. The pointer keeps its value so resuming does not flicker.
    pub fn stop(&mut self) {
        self.state = SyncState::Stopped;
        self.scheduler.cancel();
    }

    /// Out-of-band pass, regardless of state.
    pub fn seek(&mut self, time: f64, segments: &[Segment]) -> Option<SyncEvent> {
        self.resolve(time, segments)
    }

    /// Re-resolves and re-announces the active segment even if the index did not
    /// change, so text edits reach the display.
    pub fn refresh(&mut self, time: f64, segments: &[Segment]) -> Option<SyncEvent> {
        let previous = self.active;
        let next = resolve_active(time, segments);
        self.active = next;
        match next {
            Some(index) => Some(SyncEvent::Activated {
                index,
                text: segments[index].text.clone(),
            }),
            None if previous.is_some() => Some(SyncEvent::Deactivated),
            None => None,
        }
    }

    /// Resets the pointer after a bulk replacement of the caption set.
    pub fn invalidate(&mut self) -> Option<SyncEvent> {
        self.active.take().map(|_| SyncEvent::Deactivated)
    }

    /// Keeps the pointer on the same segment after `removed` was deleted.
    pub fn rekey_after_delete(&mut self, removed: usize) -> Option<SyncEvent> {
        match self.active {
            Some(index) if index == removed => {
                self.active = None;
                Some(SyncEvent::Deactivated)
            }
            Some(index) if index > removed => {
                self.active = Some(index - 1);
                None
            }
            _ => None,
        }
    }

    fn resolve(&mut self, time: f64, segments: &[Segment]) -> Option<SyncEvent> {
        let next = resolve_active(time, segments);
        if next == self.active {
            return None;
        }
        self.active = next;
        Some(match next {
            Some(index) => SyncEvent::Activated {
                index,
                text: segments[index].text.clone(),
            },
            None => SyncEvent::Deactivated,
        })
    }
}

/// Cooperative scheduling interface for the sync loop.
///
/// The sync loop asks for one more tick after every pass; whoever drives the
/// loop (a frame callback, a tokio interval, a test) delivers it.
pub trait TickScheduler {
    fn schedule(&mut self);
    fn cancel(&mut self);
    fn is_pending(&self) -> bool;

    /// Consumes the pending tick, returning whether there was one.
    fn take(&mut self) -> bool;
}

/// Single pending-tick slot. Scheduling twice still yields one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickScheduler for FrameScheduler {
    fn schedule(&mut self) {
        self.pending = true;
    }

    fn cancel(&mut self) {
        self.pending = false;
    }

    fn is_pending(&self) -> bool {
        self.pending
    }

    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_is_idempotent_until_taken() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule();
        scheduler.schedule();
        assert!(scheduler.is_pending());
        assert!(scheduler.take());
        assert!(!scheduler.take());
    }

    #[test]
    fn cancel_drops_pending_tick() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule();
        scheduler.cancel();
        assert!(!scheduler.is_pending());
        assert!(!scheduler.take());
    }
}

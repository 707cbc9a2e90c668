use tokio::time::Instant;

/// Source of the current playback position, sampled once per tick.
pub trait PlaybackClock {
    /// Current position in seconds.
    fn position(&self) -> f64;

    fn seek(&mut self, seconds: f64);

    /// Notifies the clock that the player started or paused.
    fn set_playing(&mut self, _playing: bool) {}
}

/// Clock whose position only moves when told to. Used for synthetic time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    position: f64,
}

impl ManualClock {
    pub fn new(position: f64) -> Self {
        Self { position }
    }

    pub fn set(&mut self, seconds: f64) {
        self.position = seconds;
    }
}

impl PlaybackClock for ManualClock {
    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
    }
}

/// Real-time clock that advances while playing, scaled by `rate`.
#[derive(Debug, Clone)]
pub struct WallClock {
    /// Position accumulated before the current running window.
    baseline: f64,
    running_anchor: Option<Instant>,
    rate: f64,
}

impl WallClock {
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            1.0
        };
        Self {
            baseline: 0.0,
            running_anchor: None,
            rate,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.running_anchor.is_some()
    }

    fn elapsed(&self) -> f64 {
        self.running_anchor
            .map(|anchor| anchor.elapsed().as_secs_f64() * self.rate)
            .unwrap_or(0.0)
    }
}

impl PlaybackClock for WallClock {
    fn position(&self) -> f64 {
        self.baseline + self.elapsed()
    }

    fn seek(&mut self, seconds: f64) {
        self.baseline = seconds.max(0.0);
        if self.running_anchor.is_some() {
            self.running_anchor = Some(Instant::now());
        }
    }

    fn set_playing(&mut self, playing: bool) {
        match (playing, self.running_anchor) {
            (true, None) => self.running_anchor = Some(Instant::now()),
            (false, Some(_)) => {
                self.baseline += self.elapsed();
                self.running_anchor = None;
            }
            _ => {}
        }
    }
}

use serde::{Deserialize, Serialize};

/// A timed caption unit. Identity is positional: a segment is addressed by
/// its index in the caption set, never by a stored id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds, expected to be >= `start`
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Inclusive on both ends. An inverted segment (`end < start`) never matches.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn overlaps(&self, other: &Segment) -> bool {
        !self.is_inverted()
            && !other.is_inverted()
            && self.start <= other.end
            && other.start <= self.end
    }
}

/// Formats seconds as `MM:SS` for timeline and list displays.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

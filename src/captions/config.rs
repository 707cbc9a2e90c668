use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::common::config::DocumentedConfig;
use crate::common::paths;
use crate::documented_config;

use super::style::CaptionStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Milliseconds between sync ticks (roughly one display refresh)
    pub tick_interval_ms: u64,
    /// Playback speed multiplier for `captl play`
    pub playback_rate: f64,
    pub font: String,
    pub font_size: u32,
    pub color: String,
    pub position: String,
    pub animation: String,
    /// Project name used in transcript exports
    pub project_name: Option<String>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        let style = CaptionStyle::default();
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            playback_rate: Self::DEFAULT_PLAYBACK_RATE,
            font: style.font,
            font_size: style.size,
            color: style.color,
            position: style.position,
            animation: style.animation,
            project_name: None,
        }
    }
}

documented_config!(CaptionConfig {
    fields: [
        tick_interval_ms, "Milliseconds between sync ticks",
        playback_rate, "Playback speed multiplier",
        font, "Caption font family",
        font_size, "Caption font size in pixels",
        color, "Highlight color",
        position, "Overlay position (top, middle, bottom)",
        animation, "Entry animation (pop, none, ...)",
    ],
    optional: [
        project_name, "Project name used in transcript exports",
    ],
    config_path: paths::default_config_path(),
});

impl CaptionConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;
    pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

    /// Loads from `path` when given, otherwise from the default location.
    pub fn load_or_default_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => <Self as DocumentedConfig>::load_from_path(path),
            None => <Self as DocumentedConfig>::load(),
        }
    }

    fn sanitize_values(&mut self) {
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = Self::DEFAULT_TICK_INTERVAL_MS;
        }
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            self.playback_rate = Self::DEFAULT_PLAYBACK_RATE;
        }
        if self.font_size == 0 {
            self.font_size = CaptionStyle::default().size;
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn style(&self) -> CaptionStyle {
        CaptionStyle {
            font: self.font.clone(),
            size: self.font_size,
            color: self.color.clone(),
            position: self.position.clone(),
            animation: self.animation.clone(),
        }
    }
}

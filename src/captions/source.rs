use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::service::{GeneratedSegment, GenerationResponse};
use super::srt::parse_srt;

/// Reads captions from disk as a generation response.
///
/// Accepts a generation service response (`{"status": ...}`), a bare JSON array
/// of `{start, end, text}` records, or a SubRip file (`.srt`).
pub fn load_generation(path: &Path) -> Result<GenerationResponse> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read captions from {}", path.display()))?;

    let is_srt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"));

    if is_srt {
        let segments = parse_srt(&contents)
            .with_context(|| format!("Failed to parse SRT file {}", path.display()))?;
        return Ok(GenerationResponse::success(segments));
    }

    parse_generation_json(&contents)
        .with_context(|| format!("Failed to parse caption JSON {}", path.display()))
}

pub fn parse_generation_json(contents: &str) -> Result<GenerationResponse> {
    let value: serde_json::Value = serde_json::from_str(contents).context("Invalid JSON")?;
    if value.is_array() {
        let segments: Vec<GeneratedSegment> =
            serde_json::from_value(value).context("Invalid caption segment list")?;
        return Ok(GenerationResponse::Success {
            segments,
            words: Vec::new(),
            detected_language: None,
        });
    }
    serde_json::from_value(value).context("Invalid caption generation response")
}

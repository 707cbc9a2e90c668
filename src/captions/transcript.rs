use chrono::{DateTime, Local};

use super::segment::Segment;
use super::style::CaptionStyle;

const RULE: &str = "========================================";

/// Header fields of a transcript export. The timestamp is supplied by the
/// caller so formatting stays deterministic.
#[derive(Debug, Clone)]
pub struct TranscriptHeader {
    pub project: String,
    pub generated_at: Option<DateTime<Local>>,
}

impl Default for TranscriptHeader {
    fn default() -> Self {
        Self {
            project: "Untitled Project".to_string(),
            generated_at: None,
        }
    }
}

/// Renders the caption set as a plain-text report. Returns `None` when there is
/// nothing to export.
pub fn format_transcript(
    segments: &[Segment],
    style: &CaptionStyle,
    header: &TranscriptHeader,
) -> Option<String> {
    if segments.is_empty() {
        return None;
    }

    let mut content = String::new();
    content.push_str(RULE);
    content.push('\n');
    content.push_str("           CAPTION TRANSCRIPT\n");
    content.push_str(RULE);
    content.push_str("\n\n");

    if let Some(generated_at) = header.generated_at {
        content.push_str(&format!(
            "Timestamp: {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    content.push_str(&format!("Project: {}\n\n", header.project));

    content.push_str("--- STYLE CONFIGURATION ---\n");
    content.push_str(&format!("Font Family: {}\n", style.font));
    content.push_str(&format!("Font Size: {}px\n", style.size));
    content.push_str(&format!("Highlight Color: {}\n", style.color));
    content.push_str(&format!("Position: {}\n", style.position));
    content.push_str(&format!("Animation: {}\n\n", style.animation));

    content.push_str("--- TRANSCRIPT DATA ---\n");
    for (i, segment) in segments.iter().enumerate() {
        content.push_str(&format_line(i + 1, segment));
        content.push('\n');
    }

    content.push('\n');
    content.push_str(RULE);
    content.push('\n');
    Some(content)
}

fn format_line(position: usize, segment: &Segment) -> String {
    format!(
        "[Segment {}] {:.2}s - {:.2}s: \"{}\"",
        position,
        segment.start,
        segment.end,
        segment.text.to_uppercase()
    )
}

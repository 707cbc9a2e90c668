//! Data contracts of the external caption generation and render services.
//!
//! Transport is not handled here; only the payloads the engine consumes and
//! produces.

use serde::{Deserialize, Serialize};

use super::segment::Segment;
use super::style::CaptionStyle;

/// Result of a caption generation request, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResponse {
    Success {
        #[serde(default)]
        segments: Vec<GeneratedSegment>,
        // Word-level results, used when no segments were produced
        #[serde(default)]
        words: Vec<GeneratedSegment>,
        #[serde(default)]
        detected_language: Option<String>,
    },
    NoAudio {
        #[serde(default)]
        message: String,
    },
    NoVoice {
        #[serde(default)]
        message: String,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

impl GenerationResponse {
    pub fn success(segments: Vec<Segment>) -> Self {
        GenerationResponse::Success {
            segments: segments.into_iter().map(GeneratedSegment::from).collect(),
            words: Vec::new(),
            detected_language: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub word: Option<String>,
}

impl From<GeneratedSegment> for Segment {
    fn from(generated: GeneratedSegment) -> Self {
        let text = generated
            .text
            .filter(|text| !text.is_empty())
            .or(generated.word)
            .unwrap_or_default();
        Segment::new(generated.start, generated.end, text)
    }
}

impl From<Segment> for GeneratedSegment {
    fn from(segment: Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            text: Some(segment.text),
            word: None,
        }
    }
}

/// Burn-in instructions for the render service: the authoritative caption list
/// plus the style descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct RenderRequest<'a> {
    pub media: String,
    pub segments: &'a [Segment],
    pub styles: &'a CaptionStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_with_segments() {
        let json = r#"{
            "status": "success",
            "segments": [{"start": 0.0, "end": 0.4, "text": "Hi"}],
            "detected_language": "en (0.99)",
            "error_log": null
        }"#;
        let response: GenerationResponse = serde_json::from_str(json).unwrap();
        let GenerationResponse::Success {
            segments,
            detected_language,
            ..
        } = response
        else {
            panic!("expected success");
        };
        assert_eq!(segments.len(), 1);
        assert_eq!(Segment::from(segments[0].clone()).text, "Hi");
        assert_eq!(detected_language.as_deref(), Some("en (0.99)"));
    }

    #[test]
    fn word_field_is_used_when_text_is_missing() {
        let json = r#"{"status": "success", "words": [
            {"start": 0.0, "end": 0.2, "word": "Hello"},
            {"start": 0.2, "end": 0.5, "text": "", "word": "there"}
        ]}"#;
        let response: GenerationResponse = serde_json::from_str(json).unwrap();
        let GenerationResponse::Success { segments, words, .. } = response else {
            panic!("expected success");
        };
        assert!(segments.is_empty());
        let texts: Vec<String> = words.into_iter().map(|w| Segment::from(w).text).collect();
        assert_eq!(texts, vec!["Hello", "there"]);
    }

    #[test]
    fn parses_no_speech_statuses() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"status": "no_voice", "message": "No speech detected"}"#)
                .unwrap();
        assert_eq!(
            response,
            GenerationResponse::NoVoice {
                message: "No speech detected".to_string()
            }
        );
        let response: GenerationResponse =
            serde_json::from_str(r#"{"status": "no_audio"}"#).unwrap();
        assert!(matches!(response, GenerationResponse::NoAudio { .. }));
    }

    #[test]
    fn render_request_shape() {
        let segments = vec![Segment::new(0.0, 1.0, "One")];
        let style = CaptionStyle::default();
        let request = RenderRequest {
            media: "clip.mp4".to_string(),
            segments: &segments,
            styles: &style,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["media"], "clip.mp4");
        assert_eq!(value["segments"][0]["text"], "One");
        assert_eq!(value["styles"]["position"], "bottom");
        assert_eq!(value["styles"]["size"], 48);
    }
}

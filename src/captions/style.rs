use serde::{Deserialize, Serialize};

/// Caption look as chosen in the editor. Opaque to the engine: it is only
/// forwarded to the render service and echoed in transcript exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionStyle {
    pub font: String,
    /// Font size in pixels
    pub size: u32,
    /// Highlight color, e.g. `#ffffff`
    pub color: String,
    /// Overlay position (top, middle, bottom)
    pub position: String,
    /// Entry animation name, `none` disables it
    pub animation: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: "Bebas Neue".to_string(),
            size: 48,
            color: "#ffffff".to_string(),
            position: "bottom".to_string(),
            animation: "pop".to_string(),
        }
    }
}

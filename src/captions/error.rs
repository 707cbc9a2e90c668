use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    #[error("Segment index {index} is out of range (caption set has {len} segments)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No baseline captions available to revert to")]
    NoBaselineAvailable,

    #[error("Segment {index} is not being edited")]
    NoEditSession { index: usize },

    #[error("Caption generation failed: {message}")]
    Generation { message: String },
}

impl CaptionError {
    /// Errors that leave the engine untouched and only need to be reported.
    pub fn is_benign(&self) -> bool {
        matches!(self, CaptionError::NoBaselineAvailable)
    }
}

pub type CaptionResult<T> = Result<T, CaptionError>;

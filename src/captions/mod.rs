//! Caption timeline engine: an editable list of timed captions kept in sync
//! with a playback clock.

pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod console;
pub mod edit;
pub mod engine;
pub mod error;
pub mod playback;
pub mod resolver;
pub mod scheduler;
pub mod segment;
pub mod service;
pub mod source;
pub mod srt;
pub mod stats;
pub mod store;
pub mod style;
pub mod sync;
pub mod transcript;

pub use cli::CaptionCommands;
pub use clock::{ManualClock, PlaybackClock, WallClock};
pub use commands::handle_caption_command;
pub use config::CaptionConfig;
pub use engine::{CaptionEngine, GenerationOutcome, SegmentRow};
pub use error::{CaptionError, CaptionResult};
pub use segment::Segment;
pub use service::{GenerationResponse, RenderRequest};
pub use style::CaptionStyle;
pub use sync::{SyncEvent, SyncState};
pub use transcript::{TranscriptHeader, format_transcript};

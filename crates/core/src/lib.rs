pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod http;
pub mod orchestrator;
pub mod player;
pub mod provider;
pub mod response;
pub mod strategies;
pub mod timed_text;
pub mod tracks;
pub mod types;
pub mod video_ref;

pub use catalog::{InnertubeCatalog, TrackCatalog, TrackList};
pub use config::Config;
pub use error::{ConfigError, ErrorKind, Result, TranscriptError};
pub use events::{ResolutionEvent, ResolutionOutcome};
pub use format::{format_timestamp, format_transcript_with_timestamps};
pub use orchestrator::Orchestrator;
pub use provider::Provider;
pub use response::TranscriptResponse;
pub use strategies::{Attempt, Strategy, TimedTextStrategy, TranscriptApiStrategy, WatchPageStrategy};
pub use tracks::{CaptionTrack, TrackKind, TrackSummary, select_track};
pub use types::{Segment, TranscriptResult};
pub use video_ref::VideoRef;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error code, shared by the streaming and non-streaming outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The request itself could not be read (missing field, malformed body).
    InvalidRequest,
    InvalidVideoReference,
    NoTrackAvailable,
    EmptyTranscript,
    DecodeError,
    TranscriptsDisabled,
    NoTranscriptFound,
    VideoUnavailable,
    RateLimited,
    NotImplemented,
    Network,
}

impl ErrorKind {
    /// Kinds caused by the caller's input rather than by the data sources.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidRequest | ErrorKind::InvalidVideoReference
        )
    }
}

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid video reference: {input:?} does not contain a video id")]
    InvalidVideoReference { input: String },

    #[error("No caption tracks available for {video_id}")]
    NoTrackAvailable { video_id: String },

    #[error("Caption track for {video_id} decoded to an empty transcript")]
    EmptyTranscript { video_id: String },

    #[error("Timed-text decode failed: {reason}")]
    Decode { reason: String },

    #[error("Transcripts are disabled for {video_id}")]
    TranscriptsDisabled { video_id: String },

    #[error("No transcript found for {video_id} in {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Requests for {video_id} are being rate limited")]
    RateLimited { video_id: String },

    #[error("{tier} is not implemented")]
    NotImplemented { tier: &'static str },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid track URL: {0}")]
    TrackUrl(#[from] url::ParseError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::InvalidVideoReference { .. } => ErrorKind::InvalidVideoReference,
            TranscriptError::NoTrackAvailable { .. } => ErrorKind::NoTrackAvailable,
            TranscriptError::EmptyTranscript { .. } => ErrorKind::EmptyTranscript,
            TranscriptError::Decode { .. }
            | TranscriptError::TrackUrl(_)
            | TranscriptError::Json(_) => ErrorKind::DecodeError,
            TranscriptError::TranscriptsDisabled { .. } => ErrorKind::TranscriptsDisabled,
            TranscriptError::NoTranscriptFound { .. } => ErrorKind::NoTranscriptFound,
            TranscriptError::VideoUnavailable { .. } => ErrorKind::VideoUnavailable,
            TranscriptError::RateLimited { .. } => ErrorKind::RateLimited,
            TranscriptError::NotImplemented { .. } => ErrorKind::NotImplemented,
            TranscriptError::Http(_) => ErrorKind::Network,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid header value in [http] section: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TranscriptError>;

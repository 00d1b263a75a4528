use serde::{Deserialize, Serialize};

use crate::{
    error::ErrorKind,
    events::ResolutionOutcome,
    provider::Provider,
    tracks::{TrackKind, TrackSummary},
    types::Segment,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

/// Non-streaming response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResponse {
    pub ok: bool,
    pub video_id: Option<String>,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TrackKind>,
    pub text: String,
    pub segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<TrackSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl TranscriptResponse {
    /// `requested_lang` is reported when resolution failed.
    pub fn from_outcome(outcome: ResolutionOutcome, requested_lang: &str) -> Self {
        match outcome {
            ResolutionOutcome::Success(result) => Self {
                ok: true,
                video_id: Some(result.video_id),
                lang: result.language_code,
                kind: result.kind,
                text: result.full_text,
                segments: result.segments,
                tracks: result.tracks,
                provider: Some(result.provider),
                error: None,
            },
            ResolutionOutcome::Failure {
                kind,
                message,
                video_id,
            } => Self {
                ok: false,
                video_id,
                lang: requested_lang.to_string(),
                kind: None,
                text: String::new(),
                segments: Vec::new(),
                tracks: Vec::new(),
                provider: None,
                error: Some(ErrorBody {
                    code: kind,
                    message,
                }),
            },
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.code)
    }
}

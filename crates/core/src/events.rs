//! Events emitted while a request is being resolved, and the terminal outcome
//! they collapse into.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorKind, TranscriptError},
    provider::Provider,
    types::TranscriptResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Captions,
}

/// One message of the streaming output. A stream is zero or more `Progress`
/// events followed by exactly one `Done` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolutionEvent {
    Progress {
        step: Provider,
        message: String,
    },
    Done {
        mode: Mode,
        provider: Provider,
        data: TranscriptResult,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorKind>,
        message: String,
        #[serde(rename = "videoId", default, skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
    },
}

impl ResolutionEvent {
    pub fn progress(step: Provider) -> Self {
        ResolutionEvent::Progress {
            step,
            message: step.progress_message().to_string(),
        }
    }

    pub fn done(result: TranscriptResult) -> Self {
        ResolutionEvent::Done {
            mode: Mode::Captions,
            provider: result.provider,
            data: result,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>, video_id: Option<String>) -> Self {
        ResolutionEvent::Error {
            code: Some(kind),
            message: message.into(),
            video_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResolutionEvent::Progress { .. })
    }

    /// The outcome carried by a terminal event; `None` for progress.
    pub fn into_outcome(self) -> Option<ResolutionOutcome> {
        match self {
            ResolutionEvent::Progress { .. } => None,
            ResolutionEvent::Done { data, .. } => Some(ResolutionOutcome::Success(data)),
            ResolutionEvent::Error {
                code,
                message,
                video_id,
            } => Some(ResolutionOutcome::Failure {
                kind: code.unwrap_or(ErrorKind::NotImplemented),
                message,
                video_id,
            }),
        }
    }
}

/// Final result of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    Success(TranscriptResult),
    Failure {
        kind: ErrorKind,
        message: String,
        video_id: Option<String>,
    },
}

impl ResolutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResolutionOutcome::Success(_))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ResolutionOutcome::Success(_) => None,
            ResolutionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn into_event(self) -> ResolutionEvent {
        match self {
            ResolutionOutcome::Success(result) => ResolutionEvent::done(result),
            ResolutionOutcome::Failure {
                kind,
                message,
                video_id,
            } => ResolutionEvent::error(kind, message, video_id),
        }
    }
}

impl From<TranscriptError> for ResolutionOutcome {
    fn from(err: TranscriptError) -> Self {
        ResolutionOutcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
            video_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn progress_serializes_with_step_name() {
        let event = ResolutionEvent::progress(Provider::WatchPage);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "progress");
        assert_eq!(value["step"], "watch_page");
        assert!(value["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[test]
    fn done_carries_mode_provider_and_data() {
        let result = TranscriptResult::from_text("dQw4w9WgXcQ", "en", "Hello", Provider::Timedtext);
        let value = serde_json::to_value(ResolutionEvent::done(result)).unwrap();

        assert_eq!(value["type"], "done");
        assert_eq!(value["mode"], "captions");
        assert_eq!(value["provider"], "timedtext");
        assert_eq!(value["data"]["videoId"], "dQw4w9WgXcQ");
        assert_eq!(value["data"]["languageCode"], "en");
        assert_eq!(value["data"]["fullText"], "Hello");
    }

    #[test]
    fn error_uses_camel_case_video_id() {
        let event = ResolutionEvent::error(
            ErrorKind::NotImplemented,
            "audio transcription is not implemented",
            Some("dQw4w9WgXcQ".to_string()),
        );

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "error",
                "code": "NotImplemented",
                "message": "audio transcription is not implemented",
                "videoId": "dQw4w9WgXcQ",
            })
        );
    }

    #[test]
    fn only_terminal_events_carry_outcomes() {
        assert!(ResolutionEvent::progress(Provider::Timedtext)
            .into_outcome()
            .is_none());

        let outcome = ResolutionEvent::error(ErrorKind::RateLimited, "slow down", None)
            .into_outcome()
            .unwrap();
        assert_eq!(outcome.error_kind(), Some(ErrorKind::RateLimited));
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Retrieval method that produced (or is about to attempt) a transcript.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    TranscriptApi,
    WatchPage,
    Timedtext,
    AudioTranscription,
}

impl Provider {
    /// Step name used in progress events.
    pub fn step(&self) -> &'static str {
        match self {
            Provider::TranscriptApi => "transcript_api",
            Provider::WatchPage => "watch_page",
            Provider::Timedtext => "timedtext",
            Provider::AudioTranscription => "audio_transcription",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::TranscriptApi => "Transcript API",
            Provider::WatchPage => "Watch page",
            Provider::Timedtext => "Timed-text endpoint",
            Provider::AudioTranscription => "Audio transcription",
        }
    }

    /// Human readable progress message announcing this step.
    pub fn progress_message(&self) -> &'static str {
        match self {
            Provider::TranscriptApi => "Looking up caption tracks via the transcript API",
            Provider::WatchPage => "Scraping the watch page for caption tracks",
            Provider::Timedtext => "Probing the timed-text endpoint directly",
            Provider::AudioTranscription => "Falling back to audio transcription",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step())
    }
}

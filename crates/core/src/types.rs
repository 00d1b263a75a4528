use serde::{Deserialize, Serialize};

use crate::{
    provider::Provider,
    tracks::{TrackKind, TrackSummary},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    #[serde(alias = "dur")]
    pub duration: f64,
}

/// Normalized transcript, the terminal artifact of a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResult {
    pub video_id: String,
    pub language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TrackKind>,
    pub full_text: String,
    pub segments: Vec<Segment>,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<TrackSummary>,
}

impl TranscriptResult {
    /// Build a result whose full text is the segments' text joined by newlines.
    pub fn from_segments(
        video_id: impl Into<String>,
        language_code: impl Into<String>,
        kind: Option<TrackKind>,
        segments: Vec<Segment>,
        provider: Provider,
    ) -> Self {
        let full_text = join_segments(&segments);
        Self {
            video_id: video_id.into(),
            language_code: language_code.into(),
            kind,
            full_text,
            segments,
            provider,
            tracks: Vec::new(),
        }
    }

    /// Build a result carrying text only, when the source has no usable timing.
    pub fn from_text(
        video_id: impl Into<String>,
        language_code: impl Into<String>,
        full_text: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            language_code: language_code.into(),
            kind: None,
            full_text: full_text.into(),
            segments: Vec::new(),
            provider,
            tracks: Vec::new(),
        }
    }

    pub fn with_tracks(mut self, tracks: Vec<TrackSummary>) -> Self {
        self.tracks = tracks;
        self
    }

    /// Timing of the last segment's end, if timing is known.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.segments.last().map(|s| s.start + s.duration)
    }
}

pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, start: f64, duration: f64) -> Segment {
        Segment {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn full_text_joins_segments_with_newlines() {
        let result = TranscriptResult::from_segments(
            "dQw4w9WgXcQ",
            "en",
            Some(TrackKind::Manual),
            vec![segment("Never gonna", 0.0, 1.5), segment("give you up", 1.5, 2.0)],
            Provider::WatchPage,
        );

        assert_eq!(result.full_text, "Never gonna\ngive you up");
        assert_eq!(result.duration_seconds(), Some(3.5));
    }

    #[test]
    fn segment_accepts_dur_alias() {
        let seg: Segment = serde_json::from_str(r#"{"text":"hi","start":1.0,"dur":2.5}"#).unwrap();
        assert_eq!(seg, segment("hi", 1.0, 2.5));
    }
}

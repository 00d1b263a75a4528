use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    #[serde(rename = "manual")]
    Manual,
    #[serde(rename = "auto")]
    AutoGenerated,
}

impl TrackKind {
    pub fn is_manual(&self) -> bool {
        matches!(self, TrackKind::Manual)
    }
}

/// A caption track advertised by the platform for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    pub language_code: String,
    pub kind: TrackKind,
    pub source_url: String,
}

impl CaptionTrack {
    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            lang: self.language_code.clone(),
            kind: self.kind,
        }
    }

    pub fn speaks(&self, lang: &str) -> bool {
        self.language_code.eq_ignore_ascii_case(lang)
    }
}

/// `{lang, kind}` entry listed next to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub lang: String,
    pub kind: TrackKind,
}

/// Pick the best track for `lang`.
///
/// Preference, first match wins: manual track in `lang`, any track in `lang`,
/// any manual track, the first track. Returns `None` only for an empty list.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.kind.is_manual() && t.speaks(lang))
        .or_else(|| tracks.iter().find(|t| t.speaks(lang)))
        .or_else(|| tracks.iter().find(|t| t.kind.is_manual()))
        .or_else(|| tracks.first())
}

//! Serde model of the player response the platform embeds in watch pages and
//! returns from its player endpoint. Only the fields we read are modeled.

use serde::{Deserialize, de::DeserializeOwned};

use crate::tracks::{CaptionTrack, TrackKind};

const PLAYER_ANCHOR: &str = "ytInitialPlayerResponse";
const CAPTION_TRACKS_ANCHOR: &str = "\"captionTracks\":";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    pub captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayabilityStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl PlayabilityStatus {
    pub fn is_ok(&self) -> bool {
        self.status.is_empty() || self.status == "OK"
    }

    /// Playback refused behind a "confirm you're not a bot" interstitial.
    pub fn is_bot_check(&self) -> bool {
        self.reason
            .as_deref()
            .is_some_and(|r| r.to_ascii_lowercase().contains("not a bot"))
    }

    pub fn describe(&self) -> String {
        match &self.reason {
            Some(reason) => format!("{} ({reason})", self.status),
            None => self.status.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer", default)]
    pub tracklist: Option<Tracklist>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracklist {
    #[serde(default)]
    pub caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCaptionTrack {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
    /// `"asr"` for speech-recognized tracks, absent for uploaded ones.
    #[serde(default)]
    pub kind: Option<String>,
}

impl RawCaptionTrack {
    fn into_track(self) -> Option<CaptionTrack> {
        if self.base_url.is_empty() {
            return None;
        }

        let kind = match self.kind.as_deref() {
            Some("asr") => TrackKind::AutoGenerated,
            _ => TrackKind::Manual,
        };

        Some(CaptionTrack {
            language_code: self.language_code,
            kind,
            source_url: self.base_url,
        })
    }
}

impl PlayerResponse {
    /// Whether the response carries a caption tracklist at all.
    pub fn has_captions(&self) -> bool {
        self.captions
            .as_ref()
            .is_some_and(|c| c.tracklist.is_some())
    }

    pub fn caption_tracks(&self) -> Vec<CaptionTrack> {
        self.captions
            .as_ref()
            .and_then(|c| c.tracklist.as_ref())
            .map(|t| to_tracks(t.caption_tracks.clone()))
            .unwrap_or_default()
    }
}

/// Pull the caption tracks out of a watch page.
///
/// Tries the embedded player response first, then a bare `"captionTracks":`
/// array. `None` means neither anchor yielded parseable JSON.
pub fn extract_caption_tracks(html: &str) -> Option<Vec<CaptionTrack>> {
    if let Some(player) = extract_player_response(html) {
        if player.has_captions() {
            return Some(player.caption_tracks());
        }
    }

    html.match_indices(CAPTION_TRACKS_ANCHOR)
        .find_map(|(at, anchor)| {
            first_json_value::<Vec<RawCaptionTrack>>(&html[at + anchor.len()..])
        })
        .map(to_tracks)
        .or_else(|| extract_player_response(html).map(|p| p.caption_tracks()))
}

pub fn extract_player_response(html: &str) -> Option<PlayerResponse> {
    html.match_indices(PLAYER_ANCHOR).find_map(|(at, anchor)| {
        let rest = html[at + anchor.len()..].trim_start_matches(['"', ']']);
        let rest = rest.trim_start().strip_prefix('=')?.trim_start();
        if !rest.starts_with('{') {
            return None;
        }
        first_json_value(rest)
    })
}

/// Parse the first JSON value at the start of `text`, ignoring whatever follows.
fn first_json_value<T: DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<T>()
        .next()?
        .ok()
}

fn to_tracks(raw: Vec<RawCaptionTrack>) -> Vec<CaptionTrack> {
    raw.into_iter().filter_map(RawCaptionTrack::into_track).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: &str = r#"{"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en","languageCode":"en","kind":"asr"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=fr","languageCode":"fr"}]}}}"#;

    #[test]
    fn extracts_tracks_after_player_anchor() {
        let html = format!(
            "<html><script>var ytInitialPlayerResponse = {PLAYER};var meta = {{}};</script></html>"
        );

        let tracks = extract_caption_tracks(&html).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].kind, TrackKind::AutoGenerated);
        assert_eq!(
            tracks[0].source_url,
            "https://www.youtube.com/api/timedtext?v=dQw4w9WgXcQ&lang=en"
        );
        assert_eq!(tracks[1].language_code, "fr");
        assert_eq!(tracks[1].kind, TrackKind::Manual);
    }

    #[test]
    fn skips_anchor_occurrences_without_a_value() {
        let html = format!(
            r#"<script>window["ytInitialPlayerResponse"] = null;</script><script>var ytInitialPlayerResponse = {PLAYER};</script>"#
        );

        let player = extract_player_response(&html).unwrap();
        assert!(player.has_captions());
    }

    #[test]
    fn falls_back_to_bare_caption_tracks_array() {
        let html = r#"<script>{"foo":1,"captionTracks":[{"baseUrl":"https://example.test/tt","languageCode":"de"}],"bar":2}</script>"#;

        let tracks = extract_caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "de");
    }

    #[test]
    fn page_without_anchors_yields_none() {
        assert!(extract_caption_tracks("<html><body>consent required</body></html>").is_none());
    }

    #[test]
    fn playability_status_flags_bot_check() {
        let player: PlayerResponse = serde_json::from_str(
            r#"{"playabilityStatus":{"status":"LOGIN_REQUIRED","reason":"Sign in to confirm you’re not a bot"}}"#,
        )
        .unwrap();

        let status = player.playability_status.unwrap();
        assert!(!status.is_ok());
        assert!(status.is_bot_check());
        assert!(player.captions.is_none());
    }
}

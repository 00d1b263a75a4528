//! Track catalog: the list/fetch collaborator behind the transcript API
//! strategy, plus the default implementation over the platform's player
//! endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::{
    error::{Result, TranscriptError},
    player::PlayerResponse,
    timed_text,
    tracks::{CaptionTrack, TrackSummary},
    types::Segment,
    video_ref::VideoRef,
};

const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

/// Caption tracks of one video, split by origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackList {
    pub video_id: String,
    pub manually_created: Vec<CaptionTrack>,
    pub generated: Vec<CaptionTrack>,
}

impl TrackList {
    pub fn from_tracks(video_id: impl Into<String>, tracks: Vec<CaptionTrack>) -> Self {
        let (manually_created, generated): (Vec<_>, Vec<_>) =
            tracks.into_iter().partition(|t| t.kind.is_manual());
        Self {
            video_id: video_id.into(),
            manually_created,
            generated,
        }
    }

    /// First manual track matching `languages`, in preference order.
    pub fn find_manually_created(&self, languages: &[String]) -> Option<&CaptionTrack> {
        find_in(&self.manually_created, languages)
    }

    pub fn find_generated(&self, languages: &[String]) -> Option<&CaptionTrack> {
        find_in(&self.generated, languages)
    }

    /// Any track at all, manual ones first.
    pub fn first(&self) -> Option<&CaptionTrack> {
        self.manually_created.first().or(self.generated.first())
    }

    pub fn summaries(&self) -> Vec<TrackSummary> {
        self.manually_created
            .iter()
            .chain(&self.generated)
            .map(CaptionTrack::summary)
            .collect()
    }
}

fn find_in<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages
        .iter()
        .find_map(|lang| tracks.iter().find(|t| t.speaks(lang)))
}

#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Every caption track of `video`.
    ///
    /// Fails with `TranscriptsDisabled`, `VideoUnavailable` or `RateLimited`
    /// when the platform says so.
    async fn list(&self, video: &VideoRef) -> Result<TrackList>;

    async fn fetch(&self, track: &CaptionTrack) -> Result<Vec<Segment>>;
}

/// Catalog backed by the player endpoint (`youtubei/v1/player`).
pub struct InnertubeCatalog {
    client: reqwest::Client,
    player_url: String,
}

impl InnertubeCatalog {
    pub fn new(client: reqwest::Client, player_url: impl Into<String>) -> Self {
        Self {
            client,
            player_url: player_url.into(),
        }
    }
}

#[async_trait]
impl TrackCatalog for InnertubeCatalog {
    async fn list(&self, video: &VideoRef) -> Result<TrackList> {
        let video_id = video.as_str();
        tracing::debug!(video_id, url = %self.player_url, "Requesting player response");

        let response = self
            .client
            .post(&self.player_url)
            .json(&serde_json::json!({
                "context": {
                    "client": {
                        "clientName": CLIENT_NAME,
                        "clientVersion": CLIENT_VERSION,
                    }
                },
                "videoId": video_id,
            }))
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::RateLimited {
                video_id: video_id.to_string(),
            });
        }

        let body = response.error_for_status()?.text().await?;
        let player: PlayerResponse = serde_json::from_str(&body)?;

        if let Some(status) = &player.playability_status {
            if status.is_bot_check() {
                return Err(TranscriptError::RateLimited {
                    video_id: video_id.to_string(),
                });
            }
            if !status.is_ok() {
                return Err(TranscriptError::VideoUnavailable {
                    video_id: video_id.to_string(),
                    reason: status.describe(),
                });
            }
        }

        let tracks = player.caption_tracks();
        if tracks.is_empty() {
            return Err(TranscriptError::TranscriptsDisabled {
                video_id: video_id.to_string(),
            });
        }

        Ok(TrackList::from_tracks(video_id, tracks))
    }

    async fn fetch(&self, track: &CaptionTrack) -> Result<Vec<Segment>> {
        let url = without_srv3_hint(&track.source_url)?;
        tracing::debug!(lang = %track.language_code, %url, "Fetching caption track");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        timed_text::decode_xml(&body)
    }
}

/// Drop `fmt=srv3` so the endpoint answers with the classic `<text>` format.
fn without_srv3_hint(source_url: &str) -> Result<Url> {
    let mut url = Url::parse(source_url)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, value)| !(key == "fmt" && value == "srv3"))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::TrackKind;

    fn track(lang: &str, kind: TrackKind) -> CaptionTrack {
        CaptionTrack {
            language_code: lang.to_string(),
            kind,
            source_url: format!("https://example.test/{lang}"),
        }
    }

    fn langs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partitions_and_searches_in_preference_order() {
        let list = TrackList::from_tracks(
            "dQw4w9WgXcQ",
            vec![
                track("en-GB", TrackKind::Manual),
                track("en", TrackKind::AutoGenerated),
                track("en-US", TrackKind::Manual),
            ],
        );

        assert_eq!(list.manually_created.len(), 2);
        assert_eq!(list.generated.len(), 1);

        let found = list
            .find_manually_created(&langs(&["en", "en-US", "en-GB"]))
            .unwrap();
        assert_eq!(found.language_code, "en-US");

        let found = list.find_generated(&langs(&["en"])).unwrap();
        assert_eq!(found.language_code, "en");
        assert!(list.find_generated(&langs(&["fr"])).is_none());
    }

    #[test]
    fn first_prefers_manual_tracks() {
        let list = TrackList::from_tracks(
            "dQw4w9WgXcQ",
            vec![track("ja", TrackKind::AutoGenerated), track("ko", TrackKind::Manual)],
        );
        assert_eq!(list.first().unwrap().language_code, "ko");
        assert!(TrackList::default().first().is_none());
    }

    #[test]
    fn strips_only_the_srv3_hint() {
        let url =
            without_srv3_hint("https://example.test/api/timedtext?v=abc&fmt=srv3&lang=en").unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/timedtext?v=abc&lang=en");

        let url = without_srv3_hint("https://example.test/api/timedtext?fmt=vtt").unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/timedtext?fmt=vtt");

        let url = without_srv3_hint("https://example.test/api/timedtext?fmt=srv3").unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/timedtext");
    }

    #[test]
    fn unparsable_track_url_is_a_decode_error() {
        let err = without_srv3_hint("not a url").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DecodeError);
    }
}

use async_trait::async_trait;
use url::Url;

use super::{Attempt, Strategy};
use crate::{
    error::{Result, TranscriptError},
    player,
    provider::Provider,
    timed_text,
    tracks::select_track,
    types::TranscriptResult,
    video_ref::VideoRef,
};

/// Scrapes the watch page for the embedded caption tracks.
pub struct WatchPageStrategy {
    client: reqwest::Client,
    watch_url: String,
}

impl WatchPageStrategy {
    pub fn new(client: reqwest::Client, watch_url: impl Into<String>) -> Self {
        Self {
            client,
            watch_url: watch_url.into(),
        }
    }

    async fn resolve(&self, video: &VideoRef, lang: &str) -> Result<Attempt> {
        tracing::debug!(video_id = %video, url = %self.watch_url, "Fetching watch page");
        let response = self
            .client
            .get(&self.watch_url)
            .query(&[("v", video.as_str()), ("hl", "en")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(Attempt::empty(format!(
                "watch page returned {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let Some(tracks) = player::extract_caption_tracks(&html) else {
            return Ok(Attempt::empty("no player response in watch page"));
        };

        let track = select_track(&tracks, lang).ok_or_else(|| TranscriptError::NoTrackAvailable {
            video_id: video.to_string(),
        })?;

        let url = with_format_hint(&track.source_url)?;
        tracing::debug!(lang = %track.language_code, %url, "Fetching caption track");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(Attempt::empty(format!(
                "caption track returned {}",
                response.status()
            )));
        }

        let segments = timed_text::decode_xml(&response.text().await?)?;
        if segments.is_empty() {
            return Err(TranscriptError::EmptyTranscript {
                video_id: video.to_string(),
            });
        }

        let summaries = tracks.iter().map(|t| t.summary()).collect();
        let result = TranscriptResult::from_segments(
            video.as_str(),
            track.language_code.as_str(),
            Some(track.kind),
            segments,
            Provider::WatchPage,
        )
        .with_tracks(summaries);

        Ok(Attempt::Found(result))
    }
}

#[async_trait]
impl Strategy for WatchPageStrategy {
    fn provider(&self) -> Provider {
        Provider::WatchPage
    }

    async fn attempt(&self, video: &VideoRef, lang: &str) -> Attempt {
        self.resolve(video, lang)
            .await
            .unwrap_or_else(Attempt::Failed)
    }
}

/// Ask for the `<text>` XML format unless the URL already names one.
fn with_format_hint(source_url: &str) -> Result<Url> {
    let mut url = Url::parse(source_url)?;
    if !url.query_pairs().any(|(key, _)| key == "fmt") {
        url.query_pairs_mut().append_pair("fmt", "srv1");
    }
    Ok(url)
}

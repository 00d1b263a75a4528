use async_trait::async_trait;

use super::{Attempt, Strategy};
use crate::{
    provider::Provider,
    timed_text::{decode_vtt, decode_xml, looks_like_vtt, looks_like_xml_transcript},
    types::TranscriptResult,
    video_ref::VideoRef,
};

/// Probes the timed-text endpoint directly, VTT first, then XML.
pub struct TimedTextStrategy {
    client: reqwest::Client,
    timedtext_url: String,
}

impl TimedTextStrategy {
    pub fn new(client: reqwest::Client, timedtext_url: impl Into<String>) -> Self {
        Self {
            client,
            timedtext_url: timedtext_url.into(),
        }
    }

    /// Body of a successful probe. Transport errors and non-2xx are misses.
    async fn probe(&self, video: &VideoRef, lang: &str, fmt: &str) -> Option<String> {
        let response = self
            .client
            .get(&self.timedtext_url)
            .query(&[("v", video.as_str()), ("lang", lang), ("fmt", fmt)])
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => response.text().await.ok(),
            Ok(response) => {
                tracing::debug!(fmt, status = %response.status(), "Timed-text probe refused");
                None
            }
            Err(err) => {
                tracing::debug!(fmt, error = %err, "Timed-text probe failed");
                None
            }
        }
    }
}

#[async_trait]
impl Strategy for TimedTextStrategy {
    fn provider(&self) -> Provider {
        Provider::Timedtext
    }

    async fn attempt(&self, video: &VideoRef, lang: &str) -> Attempt {
        if let Some(body) = self.probe(video, lang, "vtt").await {
            if looks_like_vtt(&body) {
                let text = decode_vtt(&body);
                if !text.is_empty() {
                    return Attempt::Found(TranscriptResult::from_text(
                        video.as_str(),
                        lang,
                        text,
                        Provider::Timedtext,
                    ));
                }
            }
        }

        if let Some(body) = self.probe(video, lang, "srv1").await {
            if looks_like_xml_transcript(&body) {
                match decode_xml(&body) {
                    Ok(segments) if !segments.is_empty() => {
                        return Attempt::Found(TranscriptResult::from_segments(
                            video.as_str(),
                            lang,
                            None,
                            segments,
                            Provider::Timedtext,
                        ));
                    }
                    Ok(_) => {}
                    Err(err) => tracing::debug!(error = %err, "Timed-text XML undecodable"),
                }
            }
        }

        Attempt::empty("timed-text endpoint returned no usable captions")
    }
}

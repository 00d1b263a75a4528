use std::sync::Arc;

use async_trait::async_trait;

use super::{Attempt, Strategy};
use crate::{
    catalog::TrackCatalog,
    config::DEFAULT_LANG,
    error::{Result, TranscriptError},
    provider::Provider,
    types::TranscriptResult,
    video_ref::VideoRef,
};

/// Region variants also accepted when the default language is requested.
const DEFAULT_LANG_VARIANTS: [&str; 2] = ["en-US", "en-GB"];

/// Library-mediated retrieval through a [`TrackCatalog`].
pub struct TranscriptApiStrategy {
    catalog: Arc<dyn TrackCatalog>,
}

impl TranscriptApiStrategy {
    pub fn new(catalog: Arc<dyn TrackCatalog>) -> Self {
        Self { catalog }
    }

    async fn resolve(&self, video: &VideoRef, lang: &str) -> Result<Option<TranscriptResult>> {
        let list = self.catalog.list(video).await?;
        let languages = preferred_languages(lang);

        let track = list
            .find_manually_created(&languages)
            .or_else(|| list.find_generated(&languages))
            .or_else(|| list.first())
            .ok_or_else(|| TranscriptError::NoTranscriptFound {
                video_id: video.to_string(),
                languages: languages.clone(),
            })?;

        let segments = self.catalog.fetch(track).await?;
        if segments.is_empty() {
            return Err(TranscriptError::EmptyTranscript {
                video_id: video.to_string(),
            });
        }

        let result = TranscriptResult::from_segments(
            video.as_str(),
            track.language_code.as_str(),
            Some(track.kind),
            segments,
            Provider::TranscriptApi,
        )
        .with_tracks(list.summaries());

        Ok(Some(result))
    }
}

#[async_trait]
impl Strategy for TranscriptApiStrategy {
    fn provider(&self) -> Provider {
        Provider::TranscriptApi
    }

    async fn attempt(&self, video: &VideoRef, lang: &str) -> Attempt {
        self.resolve(video, lang).await.into()
    }
}

fn preferred_languages(lang: &str) -> Vec<String> {
    let mut languages = vec![lang.to_string()];
    if lang.eq_ignore_ascii_case(DEFAULT_LANG) {
        languages.extend(DEFAULT_LANG_VARIANTS.iter().map(|l| l.to_string()));
    }
    languages
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        catalog::TrackList,
        error::ErrorKind,
        tracks::{CaptionTrack, TrackKind},
        types::Segment,
    };

    struct FakeCatalog {
        tracks: Result<Vec<CaptionTrack>>,
        fetched: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn with_tracks(tracks: Vec<CaptionTrack>) -> Self {
            Self {
                tracks: Ok(tracks),
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: TranscriptError) -> Self {
            Self {
                tracks: Err(err),
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TrackCatalog for FakeCatalog {
        async fn list(&self, video: &VideoRef) -> Result<TrackList> {
            match &self.tracks {
                Ok(tracks) => Ok(TrackList::from_tracks(video.as_str(), tracks.clone())),
                Err(_) => Err(TranscriptError::TranscriptsDisabled {
                    video_id: video.to_string(),
                }),
            }
        }

        async fn fetch(&self, track: &CaptionTrack) -> Result<Vec<Segment>> {
            self.fetched
                .lock()
                .unwrap()
                .push(track.language_code.clone());

            if track.source_url.ends_with("/empty") {
                return Ok(Vec::new());
            }

            Ok(vec![
                Segment {
                    text: format!("{} one", track.language_code),
                    start: 0.0,
                    duration: 1.0,
                },
                Segment {
                    text: format!("{} two", track.language_code),
                    start: 1.0,
                    duration: 1.0,
                },
            ])
        }
    }

    fn track(lang: &str, kind: TrackKind) -> CaptionTrack {
        CaptionTrack {
            language_code: lang.to_string(),
            kind,
            source_url: format!("https://example.test/{lang}"),
        }
    }

    fn video() -> VideoRef {
        VideoRef::parse("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn only_the_default_language_expands_to_region_variants() {
        assert_eq!(preferred_languages("en"), vec!["en", "en-US", "en-GB"]);
        assert_eq!(preferred_languages("fr"), vec!["fr"]);
    }

    #[tokio::test]
    async fn prefers_manual_region_variant_over_generated_exact_match() {
        let catalog = Arc::new(FakeCatalog::with_tracks(vec![
            track("en", TrackKind::AutoGenerated),
            track("en-GB", TrackKind::Manual),
        ]));
        let strategy = TranscriptApiStrategy::new(catalog.clone());

        let Attempt::Found(result) = strategy.attempt(&video(), "en").await else {
            panic!("expected a transcript");
        };

        assert_eq!(result.language_code, "en-GB");
        assert_eq!(result.kind, Some(TrackKind::Manual));
        assert_eq!(result.full_text, "en-GB one\nen-GB two");
        assert_eq!(result.provider, Provider::TranscriptApi);
        assert_eq!(result.tracks.len(), 2);
        assert_eq!(*catalog.fetched.lock().unwrap(), vec!["en-GB"]);
    }

    #[tokio::test]
    async fn falls_back_to_any_track_when_language_missing() {
        let catalog = Arc::new(FakeCatalog::with_tracks(vec![track(
            "ja",
            TrackKind::AutoGenerated,
        )]));
        let strategy = TranscriptApiStrategy::new(catalog);

        let Attempt::Found(result) = strategy.attempt(&video(), "de").await else {
            panic!("expected a transcript");
        };
        assert_eq!(result.language_code, "ja");
        assert_eq!(result.kind, Some(TrackKind::AutoGenerated));
    }

    #[tokio::test]
    async fn catalog_errors_become_failed_attempts() {
        let catalog = Arc::new(FakeCatalog::failing(TranscriptError::TranscriptsDisabled {
            video_id: "dQw4w9WgXcQ".to_string(),
        }));
        let strategy = TranscriptApiStrategy::new(catalog);

        match strategy.attempt(&video(), "en").await {
            Attempt::Failed(err) => assert_eq!(err.kind(), ErrorKind::TranscriptsDisabled),
            other => panic!("unexpected attempt: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_catalog_reports_no_transcript_found() {
        let strategy = TranscriptApiStrategy::new(Arc::new(FakeCatalog::with_tracks(vec![])));

        match strategy.attempt(&video(), "en").await {
            Attempt::Failed(err) => assert_eq!(err.kind(), ErrorKind::NoTranscriptFound),
            other => panic!("unexpected attempt: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_track_is_an_empty_transcript() {
        let mut empty = track("en", TrackKind::Manual);
        empty.source_url = "https://example.test/empty".to_string();
        let strategy = TranscriptApiStrategy::new(Arc::new(FakeCatalog::with_tracks(vec![empty])));

        match strategy.attempt(&video(), "en").await {
            Attempt::Failed(err) => assert_eq!(err.kind(), ErrorKind::EmptyTranscript),
            other => panic!("unexpected attempt: {other:?}"),
        }
    }
}

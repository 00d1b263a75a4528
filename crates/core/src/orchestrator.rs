//! Ordered, short-circuiting fallback across retrieval strategies.

use std::sync::Arc;

use futures::{
    StreamExt,
    stream::{self, BoxStream},
};
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::{
    catalog::InnertubeCatalog,
    config::Config,
    error::{ConfigError, ErrorKind},
    events::{ResolutionEvent, ResolutionOutcome},
    http::build_client,
    provider::Provider,
    strategies::{Attempt, Strategy, TimedTextStrategy, TranscriptApiStrategy, WatchPageStrategy},
    video_ref::VideoRef,
};

/// Runs strategies in order until one finds a transcript.
///
/// Cheap to clone; every request gets its own event stream.
#[derive(Clone, Default)]
pub struct Orchestrator {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategies(strategies: Vec<Arc<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    pub fn add_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// transcript_api, then watch_page, then timedtext, sharing one client.
    pub fn standard(config: &Config) -> Result<Self, ConfigError> {
        let client = build_client(&config.http)?;
        let endpoints = &config.endpoints;
        let catalog = InnertubeCatalog::new(client.clone(), endpoints.innertube_url.as_str());

        Ok(Self::new()
            .add_strategy(TranscriptApiStrategy::new(Arc::new(catalog)))
            .add_strategy(WatchPageStrategy::new(client.clone(), endpoints.watch_url.as_str()))
            .add_strategy(TimedTextStrategy::new(client, endpoints.timedtext_url.as_str())))
    }

    pub fn providers(&self) -> Vec<Provider> {
        self.strategies.iter().map(|s| s.provider()).collect()
    }

    /// Event stream of one resolution.
    ///
    /// Strategies only run while the stream is polled; dropping it abandons
    /// the attempt in flight.
    pub fn events(&self, video: VideoRef, lang: String) -> BoxStream<'static, ResolutionEvent> {
        let span = tracing::info_span!(
            "resolve",
            request_id = %Uuid::new_v4(),
            video_id = %video,
            lang = %lang
        );

        let run = Run {
            strategies: self.strategies.clone(),
            video,
            lang,
            stage: Stage::Announce(0),
            span,
        };

        stream::unfold(run, Run::advance).boxed()
    }

    /// Drive the event stream to its terminal event.
    pub async fn resolve(&self, video: &VideoRef, lang: &str) -> ResolutionOutcome {
        let mut events = self.events(video.clone(), lang.to_string());

        while let Some(event) = events.next().await {
            if let Some(outcome) = event.into_outcome() {
                return outcome;
            }
        }

        ResolutionOutcome::Failure {
            kind: ErrorKind::NotImplemented,
            message: exhausted_message(video),
            video_id: Some(video.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Announce(usize),
    Attempt(usize),
    AudioFallback,
    Exhausted,
    Finished,
}

struct Run {
    strategies: Vec<Arc<dyn Strategy>>,
    video: VideoRef,
    lang: String,
    stage: Stage,
    span: Span,
}

impl Run {
    async fn advance(mut self) -> Option<(ResolutionEvent, Self)> {
        loop {
            match self.stage {
                Stage::Announce(index) => {
                    let Some(strategy) = self.strategies.get(index) else {
                        self.stage = Stage::AudioFallback;
                        continue;
                    };
                    let event = ResolutionEvent::progress(strategy.provider());
                    self.stage = Stage::Attempt(index);
                    return Some((event, self));
                }
                Stage::Attempt(index) => {
                    let Some(strategy) = self.strategies.get(index).cloned() else {
                        self.stage = Stage::AudioFallback;
                        continue;
                    };
                    let step = strategy.provider();

                    let attempt = strategy
                        .attempt(&self.video, &self.lang)
                        .instrument(tracing::debug_span!(parent: &self.span, "attempt", %step))
                        .await;

                    match attempt {
                        Attempt::Found(result) => {
                            tracing::info!(
                                parent: &self.span,
                                %step,
                                lang = %result.language_code,
                                segments = result.segments.len(),
                                "Transcript resolved"
                            );
                            self.stage = Stage::Finished;
                            return Some((ResolutionEvent::done(result), self));
                        }
                        miss => {
                            let reason = miss.miss_reason().unwrap_or_default();
                            tracing::warn!(parent: &self.span, %step, %reason, "Strategy missed");
                            self.stage = Stage::Announce(index + 1);
                        }
                    }
                }
                Stage::AudioFallback => {
                    self.stage = Stage::Exhausted;
                    let event = ResolutionEvent::progress(Provider::AudioTranscription);
                    return Some((event, self));
                }
                Stage::Exhausted => {
                    tracing::warn!(parent: &self.span, "Every caption strategy missed");
                    self.stage = Stage::Finished;
                    let event = ResolutionEvent::error(
                        ErrorKind::NotImplemented,
                        exhausted_message(&self.video),
                        Some(self.video.to_string()),
                    );
                    return Some((event, self));
                }
                Stage::Finished => return None,
            }
        }
    }
}

fn exhausted_message(video: &VideoRef) -> String {
    format!("No captions found for {video}; audio transcription is not implemented")
}

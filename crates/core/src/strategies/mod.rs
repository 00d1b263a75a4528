//! Retrieval strategies tried, in order, by the orchestrator.

mod timedtext;
mod transcript_api;
mod watch_page;

use async_trait::async_trait;

pub use timedtext::TimedTextStrategy;
pub use transcript_api::TranscriptApiStrategy;
pub use watch_page::WatchPageStrategy;

use crate::{
    error::{Result, TranscriptError},
    provider::Provider,
    types::TranscriptResult,
    video_ref::VideoRef,
};

/// Outcome of one strategy's attempt.
#[derive(Debug)]
pub enum Attempt {
    Found(TranscriptResult),
    /// Nothing usable, for a reason not worth an error kind.
    Empty { reason: String },
    Failed(TranscriptError),
}

impl Attempt {
    pub fn empty(reason: impl Into<String>) -> Self {
        Attempt::Empty {
            reason: reason.into(),
        }
    }

    /// Short description of a miss, for logs.
    pub fn miss_reason(&self) -> Option<String> {
        match self {
            Attempt::Found(_) => None,
            Attempt::Empty { reason } => Some(reason.clone()),
            Attempt::Failed(err) => Some(format!("{:?}: {err}", err.kind())),
        }
    }
}

/// `Ok(Some)` is a hit, `Ok(None)` an unremarkable miss, `Err` a failed attempt.
impl From<Result<Option<TranscriptResult>>> for Attempt {
    fn from(result: Result<Option<TranscriptResult>>) -> Self {
        match result {
            Ok(Some(found)) => Attempt::Found(found),
            Ok(None) => Attempt::empty("no transcript"),
            Err(err) => Attempt::Failed(err),
        }
    }
}

#[async_trait]
pub trait Strategy: Send + Sync {
    fn provider(&self) -> Provider;

    /// Try to produce a transcript. Never panics and never propagates errors;
    /// every failure is reported through the returned [`Attempt`].
    async fn attempt(&self, video: &VideoRef, lang: &str) -> Attempt;
}

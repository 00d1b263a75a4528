//! HTTP request handlers

use std::convert::Infallible;

use axum::{
    Form, Json,
    extract::{FromRequest, Query, Request, State, rejection::QueryRejection},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, KeepAliveStream, Sse},
    },
};
use futures::{
    StreamExt,
    stream::{self, BoxStream},
};
use serde::Deserialize;
use ytscript_core::{
    ErrorKind, ResolutionEvent, ResolutionOutcome, TranscriptResponse, VideoRef,
    error::TranscriptError,
};

use crate::state::AppState;

/// Logical request: `{ url, lang }`, from a query string, JSON or a form.
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub url: String,
    #[serde(default)]
    pub lang: Option<String>,
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

pub async fn get_transcript(
    State(state): State<AppState>,
    query: Result<Query<TranscriptRequest>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(request)) => respond(&state, request).await,
        Err(rejection) => bad_request(&state, rejection.body_text()),
    }
}

/// Accepts a JSON body, or a urlencoded form when the content type says so.
pub async fn post_transcript(State(state): State<AppState>, request: Request) -> Response {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let parsed = if is_form {
        Form::<TranscriptRequest>::from_request(request, &())
            .await
            .map(|Form(body)| body)
            .map_err(|rejection| rejection.body_text())
    } else {
        Json::<TranscriptRequest>::from_request(request, &())
            .await
            .map(|Json(body)| body)
            .map_err(|rejection| rejection.body_text())
    };

    match parsed {
        Ok(body) => respond(&state, body).await,
        Err(reason) => bad_request(&state, reason),
    }
}

pub async fn stream_transcript(
    State(state): State<AppState>,
    query: Result<Query<TranscriptRequest>, QueryRejection>,
) -> Sse<KeepAliveStream<BoxStream<'static, Result<Event, Infallible>>>> {
    let events: BoxStream<'static, ResolutionEvent> = match query {
        Ok(Query(request)) => {
            let lang = state.lang_or_default(request.lang);
            match VideoRef::parse(&request.url) {
                Ok(video) => state.orchestrator.events(video, lang),
                Err(err) => stream::iter([rejected(err).into_event()]).boxed(),
            }
        }
        Err(rejection) => {
            stream::iter([unreadable(rejection.body_text()).into_event()]).boxed()
        }
    };

    let messages = events
        .map(|event| {
            let data = serde_json::to_string(&event).unwrap_or_else(|e| {
                format!(r#"{{"type":"error","message":"serialization failed: {}"}}"#, e)
            });
            Ok(Event::default().data(data))
        })
        .boxed();

    Sse::new(messages).keep_alive(KeepAlive::default())
}

async fn respond(state: &AppState, request: TranscriptRequest) -> Response {
    let lang = state.lang_or_default(request.lang);

    let outcome = match VideoRef::parse(&request.url) {
        Ok(video) => state.orchestrator.resolve(&video, &lang).await,
        Err(err) => rejected(err),
    };

    let response = TranscriptResponse::from_outcome(outcome, &lang);
    (status_for(response.error_kind()), Json(response)).into_response()
}

fn unreadable(reason: String) -> ResolutionOutcome {
    tracing::debug!(%reason, "Rejected transcript request");
    ResolutionOutcome::Failure {
        kind: ErrorKind::InvalidRequest,
        message: format!("Invalid request: {reason}"),
        video_id: None,
    }
}

fn bad_request(state: &AppState, reason: String) -> Response {
    let response = TranscriptResponse::from_outcome(unreadable(reason), &state.default_lang);
    (status_for(response.error_kind()), Json(response)).into_response()
}

fn rejected(err: TranscriptError) -> ResolutionOutcome {
    tracing::debug!(error = %err, "Rejected video reference");
    ResolutionOutcome::from(err)
}

pub fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        None => StatusCode::OK,
        Some(kind) if kind.is_caller_error() => StatusCode::BAD_REQUEST,
        Some(ErrorKind::NotImplemented) => StatusCode::NOT_FOUND,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// HTTP route handlers for the codepad API

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use codepad_common::store::{new_snippet_id, StoreError};
use codepad_common::types::{ExecutionOptions, ExecutionRequest, ExecutionResult, Language, Snippet};
use codepad_judge::DebugCursor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::metrics;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub options: ExecutionOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugStepBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub breakpoints: Vec<u32>,
    /// Absent on the first step of a session
    #[serde(default)]
    pub current_line: Option<u32>,
    pub line_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugStepResponse {
    pub result: ExecutionResult,
    pub current_line: u32,
    pub finished: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShareBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub id: String,
    pub url: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub id: &'static str,
    pub judge_id: u32,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Ids drawn before giving up on a share when every one is taken
const SHARE_ID_ATTEMPTS: usize = 3;

fn code_and_language_present(code: &str, language: &str) -> bool {
    !code.is_empty() && !language.is_empty()
}

/// POST /execute - Run code on the judge and return the normalized result
pub async fn execute_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExecuteBody>,
) -> Response {
    if !code_and_language_present(&payload.code, &payload.language) {
        return error_response(StatusCode::BAD_REQUEST, "Code and language are required");
    }

    let request = ExecutionRequest::new(payload.code, payload.language, payload.input)
        .with_options(payload.options);

    let start = Instant::now();
    let result = state.orchestrator.execute(&request).await;
    let elapsed = start.elapsed();
    metrics::record_execution(&result, elapsed);

    info!(
        language = %request.language,
        status = ?result.status,
        error_kind = ?result.error_kind(),
        elapsed_ms = elapsed.as_millis(),
        "Execution request handled"
    );

    (StatusCode::OK, Json(result)).into_response()
}

/// POST /debug/step - Advance the simulated debugger by one stop.
/// Every step re-runs the whole program; only the cursor moves.
pub async fn debug_step(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DebugStepBody>,
) -> Response {
    if !code_and_language_present(&payload.code, &payload.language) {
        return error_response(StatusCode::BAD_REQUEST, "Code and language are required");
    }

    let cursor = DebugCursor::new(payload.breakpoints, payload.line_count);
    let plan = match payload.current_line {
        Some(line) => cursor.step(line),
        None => cursor.start(),
    };

    let request = plan.apply(&ExecutionRequest::new(payload.code, payload.language, payload.input));

    let start = Instant::now();
    let result = state.orchestrator.execute(&request).await;
    metrics::record_execution(&result, start.elapsed());

    info!(
        language = %request.language,
        start_at_line = ?plan.start_at_line,
        stop_at_line = plan.stop_at_line,
        status = ?result.status,
        "Debug step handled"
    );

    (
        StatusCode::OK,
        Json(DebugStepResponse {
            result,
            current_line: plan.stop_at_line,
            finished: plan.finished,
        }),
    )
        .into_response()
}

/// POST /share - Store a snippet and return its short link
pub async fn share_snippet(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ShareBody>,
) -> Response {
    if !code_and_language_present(&payload.code, &payload.language) {
        return error_response(StatusCode::BAD_REQUEST, "Code and language are required");
    }

    let mut snippet = Snippet {
        id: new_snippet_id(),
        code: payload.code,
        language: payload.language,
        created_at: Utc::now(),
    };

    for attempt in 1..=SHARE_ID_ATTEMPTS {
        let id = snippet.id.clone();
        match state.snippets.put(snippet.clone()).await {
            Ok(()) => {
                metrics::SNIPPETS_SHARED_TOTAL.inc();
                info!(snippet_id = %id, language = %snippet.language, "Snippet shared");
                return (
                    StatusCode::CREATED,
                    Json(ShareResponse {
                        url: format!("/s/{}", id),
                        id,
                        status: "success",
                    }),
                )
                    .into_response();
            }
            Err(StoreError::Conflict(_)) => {
                warn!(snippet_id = %id, attempt, "Snippet id already taken, drawing another");
                snippet.id = new_snippet_id();
            }
            Err(e) => {
                error!(snippet_id = %id, error = %e, "Failed to store snippet");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to share code");
            }
        }
    }

    error!(attempts = SHARE_ID_ATTEMPTS, "No free snippet id found");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to share code")
}

/// GET /share?id={id}
pub async fn get_shared_snippet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShareQuery>,
) -> Response {
    match query.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => load_snippet(&state, &id).await,
        None => error_response(StatusCode::BAD_REQUEST, "Snippet ID is required"),
    }
}

/// GET /s/{id}
pub async fn get_snippet_by_path(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    load_snippet(&state, &id).await
}

async fn load_snippet(state: &AppState, id: &str) -> Response {
    match state.snippets.get(id).await {
        Ok(Some(snippet)) => {
            info!(snippet_id = %id, "Snippet retrieved");
            let mut body = serde_json::to_value(&snippet).unwrap_or_default();
            body["status"] = serde_json::Value::from("success");
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Snippet not found"),
        Err(e) => {
            error!(snippet_id = %id, error = %e, "Failed to load snippet");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve code snippet")
        }
    }
}

/// GET /languages - Supported language ids and their judge ids
pub async fn list_languages() -> impl IntoResponse {
    let languages: Vec<LanguageInfo> = Language::ALL
        .iter()
        .map(|l| LanguageInfo {
            id: l.as_str(),
            judge_id: l.judge_id(),
        })
        .collect();
    Json(languages)
}

/// GET /status - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus text format
pub async fn export_metrics() -> Response {
    match metrics::render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics")
        }
    }
}

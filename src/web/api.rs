//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::analytics::{logger, reporter};
use crate::chat::driver::FALLBACK_REPLY;
use crate::chat::ChatEntry;
use crate::dataset::stats::describe;
use crate::dataset::summary::SAMPLE_ROWS;

use super::{content_type_json, AppState};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Overview API response — dataset shape and the first rows.
#[derive(Serialize)]
struct OverviewResponse {
    source: String,
    rows: usize,
    columns: usize,
    column_info: Vec<ColumnInfoResponse>,
    head: HeadResponse,
}

#[derive(Serialize)]
struct ColumnInfoResponse {
    name: String,
    dtype: String,
    non_null: usize,
}

#[derive(Serialize)]
struct HeadResponse {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Chat request body.
#[derive(serde::Deserialize)]
struct ChatRequest {
    message: String,
}

/// Chat response — the reply now in the transcript, plus the error that
/// produced a fallback, if any.
#[derive(Serialize)]
struct ChatResponse {
    reply: String,
    fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    dataset_source: String,
    dataset_rows: usize,
    dataset_columns: usize,
    assistant_configured: bool,
    chat_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    configure_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_error: Option<String>,
    turn_log_exists: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Build a JSON error response with the given status code.
fn json_error(status: u16, message: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/overview` — dataset shape, column types, first rows.
pub fn get_overview(state: &AppState) -> Result<Response<Cursor<Vec<u8>>>> {
    let dataset = &state.dataset;

    let resp = OverviewResponse {
        source: dataset.source.display().to_string(),
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        column_info: dataset
            .columns
            .iter()
            .map(|col| ColumnInfoResponse {
                name: col.name.clone(),
                dtype: col.dtype.to_string(),
                non_null: col.non_null_count(),
            })
            .collect(),
        head: HeadResponse {
            header: dataset.header(),
            rows: dataset.head(SAMPLE_ROWS),
        },
    };

    json_response(&resp)
}

/// `GET /api/describe` — descriptive statistics for numeric columns.
pub fn get_describe(state: &AppState) -> Result<Response<Cursor<Vec<u8>>>> {
    let stats = describe(&state.dataset);
    json_response(&serde_json::json!({ "stats": stats }))
}

/// `GET /api/transcript` — the session message log, in order.
pub fn get_transcript(state: &AppState) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&serde_json::json!({ "entries": state.log.entries() }))
}

/// `POST /api/chat` — drive one conversation turn.
///
/// Appends the user entry, runs the full append → run → poll → extract
/// sequence synchronously, then appends the assistant entry (the fallback
/// reply on failure) so the transcript always stays consistent.
pub fn post_chat(body: &str, state: &mut AppState) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: ChatRequest =
        serde_json::from_str(body).context("invalid JSON in chat request")?;
    let message = req.message.trim();
    if message.is_empty() {
        return json_error(400, "message must not be empty");
    }

    state.log.append(ChatEntry::user(message));

    let start = Instant::now();
    let (reply, error_text) = match (&state.client, &state.session) {
        (Some(client), Some(session)) => {
            let outcome = session.send(client, message);
            let error_text = outcome.error.map(|e| e.to_string());
            (outcome.reply, error_text)
        }
        _ => {
            let reason = state
                .session_error
                .clone()
                .unwrap_or_else(|| "assistant not configured".to_string());
            (FALLBACK_REPLY.to_string(), Some(reason))
        }
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    logger::log_turn(
        message.chars().count(),
        reply.chars().count(),
        latency_ms,
        error_text.as_deref(),
    );

    state.log.append(ChatEntry::assistant(reply.clone()));

    let resp = ChatResponse {
        reply,
        fallback: error_text.is_some(),
        error: error_text,
    };
    json_response(&resp)
}

/// `GET /api/health` — dashboard health summary.
pub fn get_health(state: &AppState) -> Result<Response<Cursor<Vec<u8>>>> {
    let resp = HealthResponse {
        dataset_source: state.dataset.source.display().to_string(),
        dataset_rows: state.dataset.row_count(),
        dataset_columns: state.dataset.column_count(),
        assistant_configured: state.configure_error.is_none() && state.client.is_some(),
        chat_available: state.session.is_some(),
        configure_error: state.configure_error.clone(),
        session_error: state.session_error.clone(),
        turn_log_exists: logger::turn_log_path().map(|p| p.exists()).unwrap_or(false),
    };

    json_response(&resp)
}

/// `GET /api/stats` — turn log aggregates.
pub fn get_stats() -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&reporter::compute_stats())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Embedded web dashboard for fraudlens.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with three views: Dashboard, Data Explorer,
//!   and AI Chat
//! - JSON API endpoints backing those views
//!
//! Requests are handled sequentially on one thread, so a chat submission
//! drives its entire turn — including the bounded poll loop — before the
//! next request is read. That is the session's single logical thread of
//! control; there is no worker pool and no cross-request locking.

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::assistant::client::AssistantClient;
use crate::chat::{ChatSession, SessionLog};
use crate::config::FraudlensConfig;
use crate::dataset::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the dashboard serves from. Owned by the serve loop; the chat
/// handler mutates only the session log.
pub struct AppState {
    pub config: FraudlensConfig,
    pub dataset: Dataset,
    pub summary: String,
    pub client: Option<AssistantClient>,
    pub session: Option<ChatSession>,
    pub log: SessionLog,
    /// Instructions push failed at startup (non-fatal).
    pub configure_error: Option<String>,
    /// Chat is unavailable: missing settings or thread creation failed.
    pub session_error: Option<String>,
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on the given address.
///
/// Blocks the current thread and handles requests sequentially. Errors are
/// reported per-request without crashing the server.
pub fn serve(addr: &str, mut state: AppState) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("fraudlens dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let result = dispatch(&method, &url, body.as_deref(), &mut state);

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    method: &Method,
    url: &str,
    body: Option<&str>,
    state: &mut AppState,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API — dataset views
        (&Method::Get, "/api/overview") => api::get_overview(state),
        (&Method::Get, "/api/describe") => api::get_describe(state),

        // API — chat
        (&Method::Get, "/api/transcript") => api::get_transcript(state),
        (&Method::Post, "/api/chat") => api::post_chat(body.unwrap_or("{}"), state),

        // API — diagnostics
        (&Method::Get, "/api/health") => api::get_health(state),
        (&Method::Get, "/api/stats") => api::get_stats(),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

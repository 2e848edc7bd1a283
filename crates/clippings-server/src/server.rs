//! Preview server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::RwLock;

use clippings_core::{extract, extract_file, Clippings, ExtractError, NoteKind};
use clippings_render::{
    assets::preview_css, render_html, render_markdown, MarkdownOptions, PageContext,
    PageRenderer, RenderError,
};

use crate::live::{live_client_script, LiveHub, LiveMessage};
use crate::watcher::{FileWatcher, WatchEvent};

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct PreviewServerConfig {
    /// Export to load and watch; without one the server waits for an upload
    pub input: Option<PathBuf>,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Minify the preview stylesheet
    pub minify: bool,

    /// Options for the Markdown download
    pub markdown: MarkdownOptions,
}

impl Default for PreviewServerConfig {
    fn default() -> Self {
        Self {
            input: None,
            port: 7878,
            host: "127.0.0.1".to_string(),
            open: true,
            minify: false,
            markdown: MarkdownOptions::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Shared server state.
struct PreviewState {
    config: PreviewServerConfig,
    /// Most recent extraction; replaced wholesale, never merged
    current: Option<Clippings>,
    pages: PageRenderer,
    live: LiveHub,
}

impl PreviewState {
    fn new(config: PreviewServerConfig) -> Result<Self, ServerError> {
        Ok(Self {
            config,
            current: None,
            pages: PageRenderer::new()?,
            live: LiveHub::new(),
        })
    }

    /// Replace the current extraction and notify connected clients.
    fn replace(&mut self, clippings: Clippings) {
        tracing::info!(
            "Loaded \"{}\": {} highlights, {} notes",
            clippings.title,
            clippings.count(NoteKind::Highlight),
            clippings.count(NoteKind::Note)
        );

        self.live.send(LiveMessage::UpdateContent {
            title: clippings.title.clone(),
            authors: clippings.authors.clone(),
            html: render_html(&clippings),
        });
        self.current = Some(clippings);
    }

    fn ws_url(&self) -> String {
        format!("ws://{}:{}/__live", self.config.host, self.config.port)
    }
}

type SharedState = Arc<RwLock<PreviewState>>;

/// Preview server.
pub struct PreviewServer {
    config: PreviewServerConfig,
}

impl PreviewServer {
    /// Create a new preview server.
    pub fn new(config: PreviewServerConfig) -> Self {
        Self { config }
    }

    /// Start the preview server.
    ///
    /// The input export, if any, is extracted before binding so that a bad
    /// input fails startup instead of serving an empty preview.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_str = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr_str.clone()))?;

        let mut initial = PreviewState::new(self.config.clone())?;
        if let Some(input) = &self.config.input {
            initial.replace(extract_file(input)?);
        }
        let state = Arc::new(RwLock::new(initial));

        if let Some(input) = &self.config.input {
            let (watcher, mut rx) =
                FileWatcher::new(input).map_err(|e| ServerError::WatchError(e.to_string()))?;

            let state_clone = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle_watch_event(&state_clone, event).await;
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let app = router(state);

        tracing::info!("Starting preview server at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/export.md", get(markdown_handler))
        .route("/clippings.json", get(json_handler))
        .route("/upload", post(upload_handler))
        .route("/__live", get(ws_handler))
        .route("/__live.js", get(live_script_handler))
        .with_state(state)
}

/// Handle file watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::Changed(path) => {
            tracing::info!("Export modified: {}", path.display());

            match extract_file(&path) {
                Ok(clippings) => state.write().await.replace(clippings),
                Err(e) => {
                    tracing::warn!("Failed to extract {}: {}", path.display(), e);
                    state.read().await.live.send(LiveMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
        }

        WatchEvent::Removed(path) => {
            // Keep showing the last good extraction until a new one arrives
            tracing::warn!("Export removed: {}", path.display());
        }
    }
}

/// Handler for the preview page.
async fn index_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    let mut context = match &state.current {
        Some(clippings) => PageContext {
            title: clippings.title.clone(),
            authors: clippings.authors.clone(),
            content: render_html(clippings),
            ..Default::default()
        },
        None => PageContext {
            title: "Kindle Clippings".to_string(),
            content: EMPTY_CONTENT.to_string(),
            ..Default::default()
        },
    };

    let page = preview_css(state.config.minify).and_then(|styles| {
        context.styles = styles;
        context.script = Some(live_client_script(&state.ws_url()));
        state.pages.render(&context)
    });

    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render preview: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Handler for the Markdown download.
async fn markdown_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    let Some(clippings) = &state.current else {
        return (StatusCode::NOT_FOUND, "No notebook loaded").into_response();
    };

    match render_markdown(clippings, &state.config.markdown) {
        Ok(md) => {
            (
                [
                    (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, content_disposition(&clippings.title)),
                ],
                md,
            )
                .into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Handler for the extracted data as JSON.
async fn json_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    match &state.current {
        Some(clippings) => Json(clippings.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "No notebook loaded").into_response(),
    }
}

/// Handler for uploading a new export as the raw request body.
///
/// Invalid UTF-8 is replaced rather than rejected, matching `extract_file`.
async fn upload_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html");

    if !content_type.starts_with("text/html") {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Please upload a valid Kindle HTML file.",
        )
            .into_response();
    }

    let body = String::from_utf8_lossy(&body);
    if body.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Empty upload").into_response();
    }

    match extract(&body) {
        Ok(clippings) => {
            let summary = serde_json::json!({
                "title": clippings.title,
                "authors": clippings.authors,
                "items": clippings.items.len(),
            });
            state.write().await.replace(clippings);
            Json(summary).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to extract upload: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
    }
}

/// Handler for the live WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.live.subscribe()
    };

    if send_json(&mut socket, &LiveMessage::Connected).await.is_err() {
        return;
    }

    // Forward live messages to the client
    while let Ok(msg) = rx.recv().await {
        if send_json(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &LiveMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

/// Handler for the live client script.
async fn live_script_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let script = live_client_script(&state.read().await.ws_url());
    ([(header::CONTENT_TYPE, "application/javascript")], script)
}

/// `Content-Disposition` for the Markdown download.
///
/// `filename` carries an ASCII-only fallback; `filename*` carries the full
/// UTF-8 name percent-encoded (RFC 5987).
fn content_disposition(title: &str) -> String {
    let stem = file_stem(title);
    let fallback: String = stem
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{}.md\"; filename*=UTF-8''{}.md",
        fallback,
        urlencoding::encode(&stem)
    )
}

/// File name for a downloaded export, derived from the book title.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem = stem.trim();
    if stem.is_empty() {
        "clippings".to_string()
    } else {
        stem.to_string()
    }
}

const EMPTY_CONTENT: &str = r#"<article>
  <p class="empty">No notebook loaded yet. POST a Kindle HTML export to <code>/upload</code>
  or restart with an input file.</p>
</article>"#;

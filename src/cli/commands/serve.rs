//! Web interface: an HTML page plus the JSON API it calls.

use crate::assistant::VideoAssistant;
use crate::captions::extract_video_id;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TubesumError;
use crate::language::Language;
use crate::transcript::TranscriptSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// Shared application state.
struct AppState {
    assistant: Arc<VideoAssistant>,
}

/// Build the web router around an assistant.
pub fn router(assistant: Arc<VideoAssistant>) -> Router {
    let state = Arc::new(AppState { assistant });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/languages", get(languages))
        .route("/api/video", post(video))
        .route("/api/transcript", post(transcript))
        .route("/api/summary", post(summary))
        .route("/api/ask", post(ask))
        .route("/api/speech", post(speech))
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Generate, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let purge_every = settings.cache.transcript_ttl().min(settings.cache.summary_ttl());
    let assistant = Arc::new(VideoAssistant::new(settings)?);
    spawn_cache_purge(Arc::clone(&assistant), purge_every);
    let app = router(assistant);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("tubesum");
    println!();
    Output::success(&format!("Open http://{} in your browser", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Web UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Languages", "GET  /api/languages");
    Output::kv("Video", "POST /api/video");
    Output::kv("Transcript", "POST /api/transcript");
    Output::kv("Summary", "POST /api/summary");
    Output::kv("Ask", "POST /api/ask");
    Output::kv("Speech", "POST /api/speech");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop expired transcripts and summaries.
fn spawn_cache_purge(assistant: Arc<VideoAssistant>, every: Duration) {
    if every.is_zero() {
        return;
    }
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = assistant.purge_caches();
            if removed > 0 {
                debug!("Purged {} expired cache entries", removed);
            }
        }
    });
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct VideoRequest {
    url: String,
}

#[derive(Serialize)]
struct VideoResponse {
    video_id: String,
    embed_url: String,
}

#[derive(Deserialize)]
struct TranscriptRequest {
    url: String,
    #[serde(default)]
    language: Language,
}

#[derive(Serialize)]
struct TranscriptResponse {
    video_id: String,
    text: String,
    original_language: String,
    language: String,
    translated: bool,
    source: TranscriptSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

#[derive(Serialize)]
struct SummaryResponse {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

#[derive(Deserialize)]
struct AskRequest {
    url: String,
    question: String,
    #[serde(default)]
    language: Language,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

#[derive(Deserialize)]
struct SpeechRequest {
    text: String,
}

#[derive(Serialize)]
struct SpeechResponse {
    format: String,
    mime_type: String,
    audio_base64: String,
    html: String,
}

#[derive(Serialize)]
struct LanguageInfo {
    code: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn status_for(err: &TubesumError) -> StatusCode {
    match err {
        TubesumError::InvalidUrl(_) | TubesumError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TubesumError::NoTranscript(_)
        | TubesumError::TranscriptsDisabled(_)
        | TubesumError::EmptyTranscript(_)
        | TubesumError::VideoUnavailable(_) => StatusCode::NOT_FOUND,
        TubesumError::Config(_)
        | TubesumError::Io(_)
        | TubesumError::Json(_)
        | TubesumError::TomlParse(_)
        | TubesumError::ToolNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(err: TubesumError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn languages() -> impl IntoResponse {
    let list: Vec<LanguageInfo> = Language::ALL
        .iter()
        .map(|l| LanguageInfo {
            code: l.code(),
            name: l.name(),
        })
        .collect();
    Json(list)
}

async fn video(Json(req): Json<VideoRequest>) -> Response {
    match extract_video_id(&req.url) {
        Ok(video_id) => Json(VideoResponse {
            embed_url: format!("https://www.youtube.com/embed/{}", video_id),
            video_id,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Response {
    match state.assistant.transcript(&req.url, req.language).await {
        Ok(t) => Json(TranscriptResponse {
            notice: t.fallback_notice(req.language),
            source: t.source,
            video_id: t.video_id,
            text: t.text,
            original_language: t.original_language,
            language: t.language,
            translated: t.translated,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn summary(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Response {
    let transcript = match state.assistant.transcript(&req.url, req.language).await {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };

    match state.assistant.summarize_text(&transcript.text).await {
        Ok(summary) => Json(SummaryResponse {
            summary,
            notice: transcript.fallback_notice(req.language),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> Response {
    match state
        .assistant
        .ask(&req.url, &req.question, req.language)
        .await
    {
        Ok(answer) => Json(AskResponse { answer }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn speech(State(state): State<Arc<AppState>>, Json(req): Json<SpeechRequest>) -> Response {
    match state.assistant.speak(&req.text).await {
        Ok(audio) => Json(SpeechResponse {
            mime_type: audio.mime_type().to_string(),
            audio_base64: audio.to_base64(),
            html: audio.to_html_player(),
            format: audio.format,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&TubesumError::InvalidUrl("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&TubesumError::NoTranscript("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&TubesumError::Llm("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&TubesumError::Config("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

//! HTTP surface for innersense-rs.
//!
//! Three routes: the static index page, the meditate pipeline, and the
//! recent-session history. Status-code mapping lives on `MeditateError`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::error::MeditateError;
use crate::service::MeditationService;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<MeditationService>,
}

#[derive(Deserialize)]
struct MeditateRequest {
    #[serde(default)]
    mood: Option<String>,
}

/// Build the axum router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/meditate", post(handle_meditate))
        .route("/history", get(handle_history))
        .with_state(state)
}

// --- Handlers ---

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_meditate(
    State(state): State<ApiState>,
    Json(req): Json<MeditateRequest>,
) -> Result<Response, MeditateError> {
    // Reject before anything upstream is contacted.
    let mood = match req.mood.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => return Err(MeditateError::MoodMissing),
    };

    info!("POST /meditate: mood \"{mood}\"");
    let audio = state.service.meditate(&mood).await?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

async fn handle_history(
    State(state): State<ApiState>,
) -> Result<Json<Vec<(String, String, String)>>, MeditateError> {
    let records = state.service.history().await?;
    let rows = records
        .into_iter()
        .map(|r| {
            (
                r.mood,
                r.transcript,
                r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            )
        })
        .collect();
    Ok(Json(rows))
}

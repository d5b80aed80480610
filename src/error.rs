//! Error taxonomy for the meditation pipeline.
//!
//! Every fault a request can hit is a [`MeditateError`] variant; the
//! `IntoResponse` impl is the single place status codes and JSON error
//! bodies are decided. Display strings double as the wire `error` field.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::scriptwriter::ScriptError;
use crate::store::StoreError;
use crate::synthesizer::SynthesisError;

#[derive(Debug, Error)]
pub enum MeditateError {
    /// Request carried no usable mood. Rejected before any upstream call.
    #[error("Mood not provided")]
    MoodMissing,
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Runtime-level fault outside the pipeline stages, e.g. a blocking
    /// store task that did not complete.
    #[error("{0}")]
    Internal(String),
}

impl MeditateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MeditateError::MoodMissing => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for MeditateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_missing_maps_to_400_with_fixed_text() {
        let err = MeditateError::MoodMissing;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Mood not provided");
    }

    #[test]
    fn synthesis_status_fault_hides_upstream_detail() {
        let err = MeditateError::Synthesis(SynthesisError::UpstreamStatus { status: 401 });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Voice generation failed");
    }

    #[test]
    fn script_and_store_faults_map_to_500_with_their_own_text() {
        let err = MeditateError::Script(ScriptError::MalformedResponse);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "text service response missing message content"
        );

        let err = MeditateError::Store(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("database error"));
    }
}

//! Novella API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use novella_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// The story book could not be loaded or imported.
    #[error("story error: {0}")]
    Story(#[from] DomainError),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::SceneNotFound(_) => (StatusCode::NOT_FOUND, "scene_not_found"),
            DomainError::PlaythroughNotFound(_) => {
                (StatusCode::NOT_FOUND, "playthrough_not_found")
            }
            DomainError::InvalidChoice { .. } => (StatusCode::BAD_REQUEST, "invalid_choice"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::EngineEnded => (StatusCode::CONFLICT, "engine_ended"),
            DomainError::NotStarted => (StatusCode::CONFLICT, "not_started"),
            DomainError::ChoicePending(_) => (StatusCode::CONFLICT, "choice_pending"),
            DomainError::NoPendingChoice => (StatusCode::CONFLICT, "no_pending_choice"),
            DomainError::PlaythroughBusy(_) => (StatusCode::CONFLICT, "playthrough_busy"),
            DomainError::CharacterNotFound(_)
            | DomainError::SpriteNotFound(_)
            | DomainError::EmptyChoiceGroup(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "story_data_error")
            }
            DomainError::SceneHopLimitExceeded { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "scene_hop_limit_exceeded")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, code = error_code, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use novella_core::ids::{CharacterId, ChoiceGroupId, ChoiceOptionId, SceneId};
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_not_found_errors_map_to_404() {
        assert_eq!(
            status_of(DomainError::SceneNotFound(SceneId(7))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::PlaythroughNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_choice_maps_to_400() {
        assert_eq!(
            status_of(DomainError::InvalidChoice {
                option_id: ChoiceOptionId(9),
                group_id: ChoiceGroupId(1),
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_misuse_maps_to_409() {
        for err in [
            DomainError::EngineEnded,
            DomainError::NotStarted,
            DomainError::ChoicePending(ChoiceGroupId(1)),
            DomainError::NoPendingChoice,
            DomainError::PlaythroughBusy(Uuid::new_v4()),
        ] {
            assert_eq!(status_of(err), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_broken_story_data_maps_to_500() {
        assert_eq!(
            status_of(DomainError::CharacterNotFound(CharacterId(3))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::SceneHopLimitExceeded {
                scene_id: SceneId(1),
                limit: 64,
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

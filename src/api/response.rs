//! Response envelope and the error taxonomy surfaced at the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::festival::ServiceError;

/// Minimal `{status, message}` body for operations without a resource body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ApiAcknowledgement {
    pub status: u16,
    pub message: String,
}

impl ApiAcknowledgement {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiAcknowledgement {
    /// The transport status always matches the envelope status.
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required.")]
    AuthenticationRequired,

    #[error("Invalid festival id: {0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("Internal server error.")]
    Internal,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::InvalidIdentifier(_) | Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiAcknowledgement::new(self.status(), self.to_string()).into_response()
    }
}

impl From<ServiceError> for ApiError {
    /// Database errors are logged server-side and surfaced as `500` without details.
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(id) => Self::NotFound(format!("festival {id} not found")),
            ServiceError::Forbidden(message) => Self::Forbidden(message.to_string()),
            ServiceError::Validation(message) => Self::ValidationFailed(message),
            ServiceError::Database(err) => {
                error!("Database error: {err}");
                Self::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> ApiAcknowledgement {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn acknowledgement_uses_its_status_on_the_wire() {
        let response = ApiAcknowledgement::new(StatusCode::CREATED, "ok").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_of(response).await,
            ApiAcknowledgement {
                status: 201,
                message: "ok".to_string()
            }
        );
    }

    #[tokio::test]
    async fn errors_render_as_envelopes() {
        let response = ApiError::InvalidIdentifier("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body.status, 400);
        assert_eq!(body.message, "Invalid festival id: abc");
    }

    #[test]
    fn service_errors_map_onto_boundary_taxonomy() {
        assert_eq!(
            ApiError::from(ServiceError::NotFound(5)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::Forbidden("no")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(ServiceError::Validation("bad".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ServiceError::Database(sqlx::Error::RowNotFound)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_festival() {
        let err = ApiError::from(ServiceError::NotFound(7));
        assert_eq!(err.to_string(), "festival 7 not found");
    }
}

//! Mapping of library errors onto HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use crate::error::{FieldErrors, PoiError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Poi(#[from] PoiError),

    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invalid path: {0}")]
    Path(#[from] PathRejection),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Poi(PoiError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Poi(PoiError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Poi(PoiError::Timeout(_)) | ApiError::Poi(PoiError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Poi(PoiError::Storage(_))
            | ApiError::Poi(PoiError::Corrupt { .. })
            | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) | ApiError::Path(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::Poi(PoiError::Validation(fields)) => ErrorBody {
                error: "Invalid request".to_string(),
                fields: Some(fields),
            },
            ApiError::Poi(PoiError::NotFound(_)) => ErrorBody {
                error: "Not found.".to_string(),
                fields: None,
            },
            ApiError::Body(rejection) => ErrorBody {
                error: rejection.body_text(),
                fields: None,
            },
            ApiError::Path(rejection) => ErrorBody {
                error: rejection.body_text(),
                fields: None,
            },
            other => {
                // Operators get the cause; clients get the status
                tracing::error!("Request failed: {}", other);
                ErrorBody {
                    error: status
                        .canonical_reason()
                        .unwrap_or("Internal Server Error")
                        .to_string(),
                    fields: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(PoiError::invalid("lat", "bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PoiError::NotFound(3)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PoiError::Timeout(Duration::from_secs(1))).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(PoiError::Unavailable("down".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_response_names_fields() {
        let response = ApiError::from(PoiError::invalid("radius_km", "too far")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

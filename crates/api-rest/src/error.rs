//! Translation of service outcomes into HTTP error responses.

use api_shared::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use patient_core::{PatientError, ValidationErrors};
use std::collections::BTreeMap;

/// Error returned by every handler.
///
/// Carries the request path so the body can report where the failure happened.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
    validation_errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// 400 with one entry per failing field.
    pub fn validation(errors: ValidationErrors, path: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".into(),
            path: path.into(),
            validation_errors: Some(errors.into_map()),
        }
    }

    /// 400 for requests that could not be read at all (malformed JSON, bad path or query).
    pub fn bad_request(message: impl Into<String>, path: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            path: path.into(),
            validation_errors: None,
        }
    }

    pub fn from_patient_error(err: PatientError, path: &str) -> Self {
        let status = match &err {
            PatientError::NotFound { .. } => StatusCode::NOT_FOUND,
            PatientError::DuplicateNationalId => StatusCode::CONFLICT,
            PatientError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PatientError::Store(_) | PatientError::LockPoisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
            path: path.into(),
            validation_errors: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(path = %self.path, "{}", self.message);
        } else {
            tracing::warn!(path = %self.path, status = self.status.as_u16(), "{}", self.message);
        }

        let mut body = ErrorResponse::new(self.status.as_u16(), self.message, self.path);
        if let Some(errors) = self.validation_errors {
            body = body.with_validation_errors(errors);
        }

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_core::StoreError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let not_found = PatientError::NotFound {
            resource: "Patient",
            field: "id",
            value: "1".into(),
        };
        assert_eq!(
            ApiError::from_patient_error(not_found, "/patients/1").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from_patient_error(PatientError::DuplicateNationalId, "/patients").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from_patient_error(
                PatientError::Store(StoreError::NotFound("x".into())),
                "/patients"
            )
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unexpected_errors_pass_their_message_through() {
        let err = ApiError::from_patient_error(PatientError::LockPoisoned, "/patients");
        assert_eq!(err.message, "patient store lock poisoned");
        assert_eq!(err.path, "/patients");
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Error body returned by the REST API.
///
/// `validation_errors` is only present for field validation failures and maps the JSON field
/// name to the first message that failed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = 404)]
    pub status: u16,
    #[schema(example = "Patient not found with id : '7'")]
    pub message: String,
    #[schema(example = "/patients/7")]
    pub path: String,
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            path: path.into(),
            timestamp: chrono::Local::now().naive_local(),
            validation_errors: None,
        }
    }

    pub fn with_validation_errors(mut self, errors: BTreeMap<String, String>) -> Self {
        self.validation_errors = Some(errors);
        self
    }
}

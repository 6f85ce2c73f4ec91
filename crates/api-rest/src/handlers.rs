//! REST handlers for `/patients`.
//!
//! Each handler reads its inputs, validates patient bodies with
//! [`patient_core::validate_patient`], calls the matching [`PatientService`] operation and turns
//! the outcome into a status code. Extractor failures are caught here too so that every error
//! leaves the server with the same [`ErrorResponse`](api_shared::ErrorResponse) body.

use api_shared::{ErrorResponse, HealthRes, HealthService, PatientDto, PatientPayload};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use patient_core::{validate_patient, PatientService};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;

/// Application state for the REST API server
///
/// Holds the `PatientService` shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

/// Query string of `GET /patients/search`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NameQuery {
    /// Substring matched against last and first names, ignoring case.
    pub query: String,
}

/// Query string of `GET /patients/search/birthdate`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthDateRange {
    /// Inclusive lower bound (ISO date).
    pub debut: NaiveDate,
    /// Inclusive upper bound (ISO date).
    pub fin: NaiveDate,
}

fn read_body(
    payload: Result<Json<PatientPayload>, JsonRejection>,
    path: &str,
) -> Result<PatientDto, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text(), path))?;
    let today = chrono::Local::now().date_naive();
    validate_patient(&payload, today).map_err(|errors| ApiError::validation(errors, path))
}

fn read_id(id: Result<Path<i64>, PathRejection>, path: &str) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request(e.body_text(), path))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientPayload,
    responses(
        (status = 201, description = "Patient created", body = PatientDto),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 409, description = "Duplicate national id", body = ErrorResponse)
    )
)]
/// Create a new patient record
///
/// # Errors
/// - `400 Bad Request` if the body is malformed or a field fails validation,
/// - `409 Conflict` if the national id is already used by another patient.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientDto>), ApiError> {
    tracing::info!("REST request to create a new patient");

    let path = uri.path();
    let dto = read_body(payload, path)?;
    let created = state
        .patient_service
        .create(&dto)
        .map_err(|e| ApiError::from_patient_error(e, path))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient found", body = PatientDto),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    )
)]
/// Get a patient by id
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientDto>, ApiError> {
    let path = uri.path();
    let id = read_id(id, path)?;
    tracing::info!(id, "REST request to get patient");

    state
        .patient_service
        .get_by_id(id)
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, path))
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "List of patients", body = [PatientDto]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
/// List all patients in the system
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    tracing::info!("REST request to list all patients");

    state
        .patient_service
        .get_all()
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, uri.path()))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientPayload,
    responses(
        (status = 200, description = "Patient updated", body = PatientDto),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 409, description = "Duplicate national id", body = ErrorResponse)
    )
)]
/// Update a patient
///
/// Every mutable field is overwritten from the body. Any `id` in the body is ignored in favour
/// of the path.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<Json<PatientDto>, ApiError> {
    let path = uri.path();
    let id = read_id(id, path)?;
    tracing::info!(id, "REST request to update patient");

    let dto = read_body(payload, path)?;
    state
        .patient_service
        .update(id, &dto)
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, path))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    )
)]
/// Delete a patient
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let path = uri.path();
    let id = read_id(id, path)?;
    tracing::info!(id, "REST request to delete patient");

    state
        .patient_service
        .delete(id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(|e| ApiError::from_patient_error(e, path))
}

#[utoipa::path(
    get,
    path = "/patients/search/nss/{nss}",
    params(("nss" = String, Path, description = "National id (15 digits)")),
    responses(
        (status = 200, description = "Patient found", body = PatientDto),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    )
)]
/// Find a patient by national id
#[axum::debug_handler]
pub async fn get_patient_by_national_id(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(nss): Path<String>,
) -> Result<Json<PatientDto>, ApiError> {
    tracing::info!("REST request to get patient by national id");

    state
        .patient_service
        .find_by_national_id(&nss)
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, uri.path()))
}

#[utoipa::path(
    get,
    path = "/patients/search",
    params(NameQuery),
    responses(
        (status = 200, description = "Matching patients", body = [PatientDto]),
        (status = 400, description = "Missing query", body = ErrorResponse)
    )
)]
/// Search patients by last or first name
#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let path = uri.path();
    let Query(NameQuery { query }) =
        query.map_err(|e| ApiError::bad_request(e.body_text(), path))?;
    tracing::info!(%query, "REST request to search patients by name");

    state
        .patient_service
        .search_by_name_or_firstname(&query)
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, path))
}

#[utoipa::path(
    get,
    path = "/patients/search/birthdate",
    params(BirthDateRange),
    responses(
        (status = 200, description = "Patients born in the range", body = [PatientDto]),
        (status = 400, description = "Malformed dates", body = ErrorResponse)
    )
)]
/// Search patients born between two dates (inclusive)
#[axum::debug_handler]
pub async fn search_by_birth_date(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    range: Result<Query<BirthDateRange>, QueryRejection>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let path = uri.path();
    let Query(BirthDateRange { debut, fin }) =
        range.map_err(|e| ApiError::bad_request(e.body_text(), path))?;
    tracing::info!(%debut, %fin, "REST request to search patients by birth date");

    state
        .patient_service
        .find_by_birth_date_range(debut, fin)
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, path))
}

#[utoipa::path(
    get,
    path = "/patients/search/bloodgroup/{groupe}",
    params(("groupe" = String, Path, description = "Blood group, e.g. A+")),
    responses(
        (status = 200, description = "Patients with this blood group", body = [PatientDto])
    )
)]
/// Search patients by blood group
#[axum::debug_handler]
pub async fn search_by_blood_group(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(groupe): Path<String>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    tracing::info!(%groupe, "REST request to search patients by blood group");

    state
        .patient_service
        .find_by_blood_group(&groupe)
        .map(Json)
        .map_err(|e| ApiError::from_patient_error(e, uri.path()))
}

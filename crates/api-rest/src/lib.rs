//! # API REST
//!
//! REST API for the patient service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `patient-core` for everything behind the handlers.

#![warn(rust_2018_idioms)]

mod error;
pub mod handlers;

use axum::{routing::get, Router};
use patient_core::PatientService;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;
pub use handlers::AppState;

use handlers::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        get_patient,
        update_patient,
        delete_patient,
        search_patients,
        get_patient_by_national_id,
        search_by_birth_date,
        search_by_blood_group,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::PatientDto,
        api_shared::PatientPayload,
        api_shared::Gender,
        api_shared::ErrorResponse,
    )),
    tags((name = "patients", description = "Patient records"))
)]
pub struct ApiDoc;

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

/// Build the REST application.
///
/// Mounts the patient routes, the health check and the Swagger UI (served at `/swagger-ui`,
/// with the document at `/api-docs/openapi.json`).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/search", get(search_patients))
        .route("/patients/search/nss/:nss", get(get_patient_by_national_id))
        .route("/patients/search/birthdate", get(search_by_birth_date))
        .route(
            "/patients/search/bloodgroup/:groupe",
            get(search_by_blood_group),
        )
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

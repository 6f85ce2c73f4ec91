//! # Patient Core
//!
//! Core business logic for the patient record service.
//!
//! This crate contains pure data operations:
//! - [`store`]: SQLite-backed persistent store with explicit parameterised queries
//! - [`mapper`]: translation between [`PatientRecord`] and the [`PatientDto`] transfer object
//! - [`validation`]: ordered field rules applied to incoming payloads
//! - [`PatientService`]: the record service (uniqueness rule plus delegation)
//! - [`seed`]: development-only synthetic data
//!
//! **No API concerns**: HTTP servers, routing and status codes belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod mapper;
pub mod patient;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;

pub use api_shared::{Gender, PatientDto, PatientPayload};
pub use config::CoreConfig;
pub use error::{PatientError, PatientResult};
pub use patient::PatientRecord;
pub use service::PatientService;
pub use store::{PatientRepository, PatientStore, StoreError, StoreResult};
pub use validation::{validate_patient, ValidationErrors};

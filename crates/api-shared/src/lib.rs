//! # API Shared
//!
//! Shared wire definitions for the patient service APIs.
//!
//! Contains:
//! - The patient transfer object ([`PatientDto`]) and the raw request body ([`PatientPayload`])
//! - The [`Gender`] enumeration
//! - Error bodies returned by the REST surface ([`ErrorResponse`])
//! - Shared services like [`HealthService`]
//!
//! Used by `patient-core`, `api-rest` and `patient-cli` so that every surface speaks the same
//! JSON shape.

pub mod dto;
pub mod error;
pub mod health;

pub use dto::{Gender, PatientDto, PatientPayload};
pub use error::ErrorResponse;
pub use health::{HealthRes, HealthService};

//! Constants used throughout the patient core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DB_PATH: &str = "patient_data/patients.db";

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Resource name used in not-found messages.
pub const PATIENT_RESOURCE: &str = "Patient";

/// Number of synthetic patients inserted by the development seeder.
pub const DEFAULT_SEED_COUNT: usize = 50;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_EMAIL_LEN: usize = 200;
pub const MAX_MEDICAL_HISTORY_LEN: usize = 200;
pub const PHONE_DIGITS: usize = 10;
pub const NATIONAL_ID_DIGITS: usize = 15;

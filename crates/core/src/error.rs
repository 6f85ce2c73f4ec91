use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("{resource} not found with {field} : '{value}'")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("A patient with this national id already exists")]
    DuplicateNationalId,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("patient store lock poisoned")]
    LockPoisoned,
}

impl PatientError {
    pub(crate) fn not_found(field: &'static str, value: impl ToString) -> Self {
        PatientError::NotFound {
            resource: crate::constants::PATIENT_RESOURCE,
            field,
            value: value.to_string(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        PatientError::LockPoisoned
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

//! The canonical, store-resident patient record.

use api_shared::Gender;
use chrono::NaiveDate;

/// A patient row as owned by the [`PatientStore`](crate::store::PatientStore).
///
/// `id`, `created_at` and `updated_at` are `None` until the record has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: Option<i64>,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: NaiveDate,
    pub phone: Option<String>,
    pub address: String,
    pub email: Option<String>,
    pub gender: Gender,
    pub medical_history: Option<String>,
    pub national_id: Option<String>,
    pub blood_group: Option<String>,
    pub created_at: Option<NaiveDate>,
    pub updated_at: Option<NaiveDate>,
}

impl PatientRecord {
    /// Create an unsaved record with the required fields set.
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        birth_date: NaiveDate,
        address: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            id: None,
            last_name: last_name.into(),
            first_name: first_name.into(),
            birth_date,
            phone: None,
            address: address.into(),
            email: None,
            gender,
            medical_history: None,
            national_id: None,
            blood_group: None,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_unsaved() {
        let record = PatientRecord::new(
            "Alaoui",
            "Ahmed",
            NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            "123 Rue Mohammed V",
            Gender::Male,
        );
        assert_eq!(record.id, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.national_id, None);
    }
}

//! Input validation for patient payloads.
//!
//! Validation is an explicit, ordered list of `(field, predicate, message)` rules evaluated
//! against a [`PatientPayload`] before anything reaches the service. Rules are independent of
//! persistence. For each field only the first failing rule is reported.

use crate::constants::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_MEDICAL_HISTORY_LEN, MAX_NAME_LEN, NATIONAL_ID_DIGITS,
    PHONE_DIGITS,
};
use api_shared::{PatientDto, PatientPayload};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Field-level validation failures keyed by JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    fn record(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }
}

/// A single validation rule. `check` returns `true` when the payload satisfies it.
struct Rule {
    field: &'static str,
    message: &'static str,
    check: fn(&PatientPayload, NaiveDate) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        field: "lastName",
        message: "Last name is required",
        check: |p, _| not_blank(&p.last_name),
    },
    Rule {
        field: "lastName",
        message: "Last name must not exceed 100 characters",
        check: |p, _| max_chars(&p.last_name, MAX_NAME_LEN),
    },
    Rule {
        field: "firstName",
        message: "First name is required",
        check: |p, _| not_blank(&p.first_name),
    },
    Rule {
        field: "firstName",
        message: "First name must not exceed 100 characters",
        check: |p, _| max_chars(&p.first_name, MAX_NAME_LEN),
    },
    Rule {
        field: "birthDate",
        message: "Birth date is required",
        check: |p, _| p.birth_date.is_some(),
    },
    Rule {
        field: "birthDate",
        message: "Birth date must be in the past",
        check: |p, today| p.birth_date.map_or(true, |d| d < today),
    },
    Rule {
        field: "phone",
        message: "Phone number must contain 10 digits",
        check: |p, _| p.phone.as_deref().map_or(true, |v| is_digits(v, PHONE_DIGITS)),
    },
    Rule {
        field: "address",
        message: "Address is required",
        check: |p, _| not_blank(&p.address),
    },
    Rule {
        field: "address",
        message: "Address must not exceed 200 characters",
        check: |p, _| max_chars(&p.address, MAX_ADDRESS_LEN),
    },
    Rule {
        field: "email",
        message: "Email format is invalid",
        check: |p, _| {
            p.email
                .as_deref()
                .map_or(true, |v| v.is_empty() || is_valid_email(v))
        },
    },
    Rule {
        field: "email",
        message: "Email must not exceed 200 characters",
        check: |p, _| max_chars(&p.email, MAX_EMAIL_LEN),
    },
    Rule {
        field: "gender",
        message: "Gender is required",
        check: |p, _| p.gender.is_some(),
    },
    Rule {
        field: "medicalHistory",
        message: "Medical history must not exceed 200 characters",
        check: |p, _| max_chars(&p.medical_history, MAX_MEDICAL_HISTORY_LEN),
    },
    Rule {
        field: "nationalId",
        message: "National id must contain 15 digits",
        check: |p, _| {
            p.national_id
                .as_deref()
                .map_or(true, |v| is_digits(v, NATIONAL_ID_DIGITS))
        },
    },
    Rule {
        field: "bloodGroup",
        message: "Blood group must be a valid format (e.g. A+, O-, AB+)",
        check: |p, _| p.blood_group.as_deref().map_or(true, is_valid_blood_group),
    },
];

/// Validate `payload` against every rule, using `today` as the reference for past dates.
///
/// # Returns
///
/// The validated [`PatientDto`] (with `id` and timestamps unset) when every rule passes.
///
/// # Errors
///
/// Returns [`ValidationErrors`] holding the first failing message of each offending field.
pub fn validate_patient(
    payload: &PatientPayload,
    today: NaiveDate,
) -> Result<PatientDto, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for rule in RULES {
        if !(rule.check)(payload, today) {
            errors.record(rule.field, rule.message);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // The required-field rules above already flagged every missing value.
    let (Some(last_name), Some(first_name), Some(birth_date), Some(address), Some(gender)) = (
        payload.last_name.clone(),
        payload.first_name.clone(),
        payload.birth_date,
        payload.address.clone(),
        payload.gender,
    ) else {
        return Err(errors);
    };

    Ok(PatientDto {
        id: None,
        last_name,
        first_name,
        birth_date,
        phone: payload.phone.clone(),
        address,
        email: payload.email.clone(),
        gender,
        medical_history: payload.medical_history.clone(),
        national_id: payload.national_id.clone(),
        blood_group: payload.blood_group.clone(),
        created_at: None,
        updated_at: None,
    })
}

fn not_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn max_chars(value: &Option<String>, max: usize) -> bool {
    value.as_deref().map_or(true, |v| v.chars().count() <= max)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_blood_group(value: &str) -> bool {
    matches!(
        value,
        "A+" | "A-" | "B+" | "B-" | "AB+" | "AB-" | "O+" | "O-"
    )
}

/// Syntactic email check: `local@domain` with dot-separated, non-empty domain labels.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.contains('@') {
        return false;
    }

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let local_ok = local.bytes().all(|b| {
        b.is_ascii_alphanumeric() || b"!#$%&'*+/=?^_`{|}~.-".contains(&b)
    });
    if !local_ok {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::Gender;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_payload() -> PatientPayload {
        PatientPayload {
            id: None,
            last_name: Some("Alaoui".into()),
            first_name: Some("Ahmed".into()),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15),
            phone: Some("0612345678".into()),
            address: Some("123 Rue Mohammed V".into()),
            email: Some("ahmed.alaoui@gmail.com".into()),
            gender: Some(Gender::Male),
            medical_history: None,
            national_id: Some("123456789012345".into()),
            blood_group: Some("A+".into()),
        }
    }

    #[test]
    fn valid_payload_produces_dto() {
        let dto = validate_patient(&valid_payload(), today()).unwrap();
        assert_eq!(dto.last_name, "Alaoui");
        assert_eq!(dto.gender, Gender::Male);
        assert_eq!(dto.id, None);
        assert_eq!(dto.created_at, None);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let payload = PatientPayload {
            phone: None,
            email: None,
            national_id: None,
            blood_group: None,
            ..valid_payload()
        };
        assert!(validate_patient(&payload, today()).is_ok());
    }

    #[test]
    fn short_phone_is_rejected() {
        let payload = PatientPayload {
            phone: Some("123".into()),
            ..valid_payload()
        };
        let errors = validate_patient(&payload, today()).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["phone"]);
        assert_eq!(errors.get("phone"), Some("Phone number must contain 10 digits"));
    }

    #[test]
    fn missing_required_fields_are_each_reported() {
        let errors = validate_patient(&PatientPayload::default(), today()).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["address", "birthDate", "firstName", "gender", "lastName"]
        );
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
    }

    #[test]
    fn blank_name_is_required_error_not_length_error() {
        let payload = PatientPayload {
            last_name: Some("   ".into()),
            ..valid_payload()
        };
        let errors = validate_patient(&payload, today()).unwrap_err();
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let payload = PatientPayload {
            first_name: Some("x".repeat(101)),
            address: Some("y".repeat(201)),
            medical_history: Some("z".repeat(201)),
            ..valid_payload()
        };
        let errors = validate_patient(&payload, today()).unwrap_err();
        assert!(errors.get("firstName").is_some());
        assert!(errors.get("address").is_some());
        assert!(errors.get("medicalHistory").is_some());

        let payload = PatientPayload {
            first_name: Some("x".repeat(100)),
            ..valid_payload()
        };
        assert!(validate_patient(&payload, today()).is_ok());
    }

    #[test]
    fn birth_date_must_be_strictly_past() {
        let payload = PatientPayload {
            birth_date: Some(today()),
            ..valid_payload()
        };
        let errors = validate_patient(&payload, today()).unwrap_err();
        assert_eq!(errors.get("birthDate"), Some("Birth date must be in the past"));
    }

    #[test]
    fn national_id_needs_fifteen_digits() {
        for bad in ["12345678901234", "1234567890123456", "12345678901234a", ""] {
            let payload = PatientPayload {
                national_id: Some(bad.into()),
                ..valid_payload()
            };
            let errors = validate_patient(&payload, today()).unwrap_err();
            assert!(errors.get("nationalId").is_some(), "accepted {bad:?}");
        }
    }

    #[test]
    fn blood_group_format() {
        for good in ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"] {
            assert!(is_valid_blood_group(good));
        }
        for bad in ["C+", "A", "AB", "a+", "O|", "A+ ", "ABO+"] {
            assert!(!is_valid_blood_group(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("ahmed.alaoui@gmail.com"));
        assert!(is_valid_email("a+tag@sub.example.org"));
        assert!(is_valid_email("user@localhost"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("user@exa..mple.com"));
        assert!(!is_valid_email(".user@example.com"));
    }

    #[test]
    fn invalid_email_reports_format_message() {
        let payload = PatientPayload {
            email: Some("not-an-email".into()),
            ..valid_payload()
        };
        let errors = validate_patient(&payload, today()).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email format is invalid"));
    }

    #[test]
    fn empty_email_is_accepted() {
        let payload = PatientPayload {
            email: Some(String::new()),
            ..valid_payload()
        };
        let dto = validate_patient(&payload, today()).unwrap();
        assert_eq!(dto.email.as_deref(), Some(""));
    }
}

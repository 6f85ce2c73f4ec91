//! Patient wire types.
//!
//! [`PatientDto`] is the validated, externally visible representation of a patient record.
//! [`PatientPayload`] is what a client actually sends: every field is optional so that a missing
//! required field can be reported as a field-level validation error instead of a
//! deserialisation failure.
//!
//! Requests also accept the legacy French field names (`nom`, `prenom`, `dateNaissance`, ...)
//! and gender values (`HOMME`, `FEMME`, ...). Responses always use the English names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrative gender of a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[serde(alias = "HOMME")]
    Male,
    #[serde(alias = "FEMME")]
    Female,
    #[serde(alias = "AUTRE")]
    Other,
    #[serde(alias = "NON_SPECIFIE")]
    Unspecified,
}

impl Gender {
    /// Canonical wire/storage spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
            Gender::Unspecified => "UNSPECIFIED",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" | "HOMME" => Ok(Gender::Male),
            "FEMALE" | "FEMME" => Ok(Gender::Female),
            "OTHER" | "AUTRE" => Ok(Gender::Other),
            "UNSPECIFIED" | "NON_SPECIFIE" => Ok(Gender::Unspecified),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// Transfer object for a patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[serde(alias = "nom")]
    #[schema(example = "Alaoui")]
    pub last_name: String,
    #[serde(alias = "prenom")]
    #[schema(example = "Ahmed")]
    pub first_name: String,
    #[serde(alias = "dateNaissance")]
    #[schema(example = "1985-06-15")]
    pub birth_date: NaiveDate,
    #[serde(alias = "telephone")]
    #[schema(example = "0612345678")]
    pub phone: Option<String>,
    #[serde(alias = "adresse")]
    #[schema(example = "123 Rue Mohammed V, 20000 Casablanca")]
    pub address: String,
    #[schema(example = "ahmed.alaoui@gmail.com")]
    pub email: Option<String>,
    #[serde(alias = "genre")]
    pub gender: Gender,
    #[serde(alias = "antecedentsMedicaux")]
    #[schema(example = "Type 2 diabetes")]
    pub medical_history: Option<String>,
    /// 15-digit national identifier, unique across patients.
    #[serde(alias = "numeroSecuriteSociale")]
    #[schema(example = "123456789012345")]
    pub national_id: Option<String>,
    #[serde(alias = "groupeSanguin")]
    #[schema(example = "A+")]
    pub blood_group: Option<String>,
    pub created_at: Option<NaiveDate>,
    pub updated_at: Option<NaiveDate>,
}

/// Raw create/update request body, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    /// Ignored by create and update; the path or the store decides the id.
    pub id: Option<i64>,
    #[serde(alias = "nom")]
    #[schema(example = "Alaoui")]
    pub last_name: Option<String>,
    #[serde(alias = "prenom")]
    #[schema(example = "Ahmed")]
    pub first_name: Option<String>,
    #[serde(alias = "dateNaissance")]
    #[schema(example = "1985-06-15")]
    pub birth_date: Option<NaiveDate>,
    #[serde(alias = "telephone")]
    #[schema(example = "0612345678")]
    pub phone: Option<String>,
    #[serde(alias = "adresse")]
    #[schema(example = "123 Rue Mohammed V, 20000 Casablanca")]
    pub address: Option<String>,
    #[schema(example = "ahmed.alaoui@gmail.com")]
    pub email: Option<String>,
    #[serde(alias = "genre")]
    pub gender: Option<Gender>,
    #[serde(alias = "antecedentsMedicaux")]
    pub medical_history: Option<String>,
    #[serde(alias = "numeroSecuriteSociale")]
    #[schema(example = "123456789012345")]
    pub national_id: Option<String>,
    #[serde(alias = "groupeSanguin")]
    #[schema(example = "A+")]
    pub blood_group: Option<String>,
}

impl From<&PatientDto> for PatientPayload {
    fn from(dto: &PatientDto) -> Self {
        Self {
            id: dto.id,
            last_name: Some(dto.last_name.clone()),
            first_name: Some(dto.first_name.clone()),
            birth_date: Some(dto.birth_date),
            phone: dto.phone.clone(),
            address: Some(dto.address.clone()),
            email: dto.email.clone(),
            gender: Some(dto.gender),
            medical_history: dto.medical_history.clone(),
            national_id: dto.national_id.clone(),
            blood_group: dto.blood_group.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accepts_legacy_french_names() {
        let raw = r#"{
            "nom": "Alaoui",
            "prenom": "Ahmed",
            "dateNaissance": "1985-06-15",
            "genre": "HOMME",
            "adresse": "123 Rue Mohammed V",
            "numeroSecuriteSociale": "123456789012345",
            "groupeSanguin": "A+"
        }"#;

        let payload: PatientPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.last_name.as_deref(), Some("Alaoui"));
        assert_eq!(payload.first_name.as_deref(), Some("Ahmed"));
        assert_eq!(payload.birth_date, NaiveDate::from_ymd_opt(1985, 6, 15));
        assert_eq!(payload.gender, Some(Gender::Male));
        assert_eq!(payload.national_id.as_deref(), Some("123456789012345"));
        assert_eq!(payload.phone, None);
    }

    #[test]
    fn dto_serialises_with_english_camel_case_names() {
        let dto = PatientDto {
            id: Some(3),
            last_name: "Tazi".into(),
            first_name: "Sara".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 2).unwrap(),
            phone: None,
            address: "1 Avenue Hassan II".into(),
            email: None,
            gender: Gender::Female,
            medical_history: None,
            national_id: None,
            blood_group: Some("O-".into()),
            created_at: None,
            updated_at: None,
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["lastName"], "Tazi");
        assert_eq!(value["birthDate"], "1990-01-02");
        assert_eq!(value["gender"], "FEMALE");
        assert_eq!(value["bloodGroup"], "O-");
        assert!(value["nationalId"].is_null());
    }

    #[test]
    fn gender_parses_both_spellings() {
        assert_eq!("UNSPECIFIED".parse::<Gender>(), Ok(Gender::Unspecified));
        assert_eq!("AUTRE".parse::<Gender>(), Ok(Gender::Other));
        assert!("UNKNOWN".parse::<Gender>().is_err());
    }

    #[test]
    fn unknown_gender_is_rejected_by_serde() {
        let raw = r#"{"gender": "ROBOT"}"#;
        assert!(serde_json::from_str::<PatientPayload>(raw).is_err());
    }
}

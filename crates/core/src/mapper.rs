//! Translation between [`PatientRecord`] and the [`PatientDto`] transfer object.
//!
//! Every function here is pure: no validation, no I/O. Absent inputs map to absent outputs.

use crate::PatientRecord;
use api_shared::PatientDto;

impl From<&PatientRecord> for PatientDto {
    fn from(record: &PatientRecord) -> Self {
        PatientDto {
            id: record.id,
            last_name: record.last_name.clone(),
            first_name: record.first_name.clone(),
            birth_date: record.birth_date,
            phone: record.phone.clone(),
            address: record.address.clone(),
            email: record.email.clone(),
            gender: record.gender,
            medical_history: record.medical_history.clone(),
            national_id: record.national_id.clone(),
            blood_group: record.blood_group.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Copies every field including `id`; the timestamps stay unset until the store stamps them.
impl From<&PatientDto> for PatientRecord {
    fn from(dto: &PatientDto) -> Self {
        PatientRecord {
            id: dto.id,
            last_name: dto.last_name.clone(),
            first_name: dto.first_name.clone(),
            birth_date: dto.birth_date,
            phone: dto.phone.clone(),
            address: dto.address.clone(),
            email: dto.email.clone(),
            gender: dto.gender,
            medical_history: dto.medical_history.clone(),
            national_id: dto.national_id.clone(),
            blood_group: dto.blood_group.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}

pub fn to_dto(record: Option<&PatientRecord>) -> Option<PatientDto> {
    record.map(PatientDto::from)
}

pub fn to_record(dto: Option<&PatientDto>) -> Option<PatientRecord> {
    dto.map(PatientRecord::from)
}

/// Overwrite every mutable field of `existing` from `dto`.
///
/// `id`, `created_at` and `updated_at` belong to the store and are left alone.
pub fn apply_update(existing: &mut PatientRecord, dto: Option<&PatientDto>) {
    let Some(dto) = dto else {
        return;
    };

    existing.last_name = dto.last_name.clone();
    existing.first_name = dto.first_name.clone();
    existing.birth_date = dto.birth_date;
    existing.phone = dto.phone.clone();
    existing.address = dto.address.clone();
    existing.email = dto.email.clone();
    existing.gender = dto.gender;
    existing.medical_history = dto.medical_history.clone();
    existing.national_id = dto.national_id.clone();
    existing.blood_group = dto.blood_group.clone();
}

pub fn to_dto_list(records: &[PatientRecord]) -> Vec<PatientDto> {
    records.iter().map(PatientDto::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::Gender;
    use chrono::NaiveDate;

    fn sample_dto() -> PatientDto {
        PatientDto {
            id: None,
            last_name: "Alaoui".into(),
            first_name: "Ahmed".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            phone: Some("0612345678".into()),
            address: "123 Rue Mohammed V".into(),
            email: Some("ahmed.alaoui@gmail.com".into()),
            gender: Gender::Male,
            medical_history: Some("Type 2 diabetes".into()),
            national_id: Some("123456789012345".into()),
            blood_group: Some("A+".into()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn absent_inputs_map_to_absent_outputs() {
        assert_eq!(to_dto(None), None);
        assert_eq!(to_record(None), None);
    }

    #[test]
    fn record_round_trip_preserves_fields() {
        let dto = sample_dto();
        let record = to_record(Some(&dto)).unwrap();
        assert_eq!(to_dto(Some(&record)), Some(dto));
    }

    #[test]
    fn to_record_copies_id_and_drops_timestamps() {
        let mut dto = sample_dto();
        dto.id = Some(12);
        dto.created_at = NaiveDate::from_ymd_opt(2020, 1, 1);
        dto.updated_at = NaiveDate::from_ymd_opt(2021, 1, 1);

        let record = to_record(Some(&dto)).unwrap();
        assert_eq!(record.id, Some(12));
        assert_eq!(record.created_at, None);
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn apply_update_overwrites_mutable_fields_only() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut existing = to_record(Some(&sample_dto())).unwrap();
        existing.id = Some(5);
        existing.created_at = Some(created);
        existing.updated_at = Some(created);

        let mut incoming = sample_dto();
        incoming.id = Some(99);
        incoming.first_name = "Hassan".into();
        incoming.phone = None;
        incoming.gender = Gender::Other;
        incoming.created_at = NaiveDate::from_ymd_opt(1999, 1, 1);

        apply_update(&mut existing, Some(&incoming));

        assert_eq!(existing.id, Some(5));
        assert_eq!(existing.created_at, Some(created));
        assert_eq!(existing.updated_at, Some(created));
        assert_eq!(existing.first_name, "Hassan");
        assert_eq!(existing.phone, None);
        assert_eq!(existing.gender, Gender::Other);
    }

    #[test]
    fn apply_update_with_nothing_is_a_no_op() {
        let mut existing = to_record(Some(&sample_dto())).unwrap();
        let before = existing.clone();
        apply_update(&mut existing, None);
        assert_eq!(existing, before);
    }

    #[test]
    fn list_mapping_preserves_order_and_length() {
        assert!(to_dto_list(&[]).is_empty());

        let first = to_record(Some(&sample_dto())).unwrap();
        let mut second = first.clone();
        second.first_name = "Youssef".into();

        let dtos = to_dto_list(&[first, second]);
        assert_eq!(dtos.len(), 2);
        assert_eq!(dtos[0].first_name, "Ahmed");
        assert_eq!(dtos[1].first_name, "Youssef");
    }
}

//! Patient database operations.

use api_shared::Gender;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{StoreError, StoreResult, FOLD_FUNCTION};
use crate::PatientRecord;

const SELECT_PATIENT: &str = r#"
    SELECT id, last_name, first_name, birth_date, phone, address, email, gender,
           medical_history, national_id, blood_group, created_at, updated_at
    FROM patients
"#;

/// Parameterised queries over the `patients` table.
///
/// Borrows either a plain connection or a transaction (which derefs to one).
pub struct PatientRepository<'c> {
    conn: &'c Connection,
}

impl<'c> PatientRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a new patient.
    ///
    /// Any id on `patient` is ignored: the store assigns a fresh one and stamps both
    /// `created_at` and `updated_at` with today's date.
    pub fn insert(&self, patient: &PatientRecord) -> StoreResult<PatientRecord> {
        let today = today();
        self.conn.execute(
            r#"
            INSERT INTO patients (
                last_name, first_name, birth_date, phone, address, email, gender,
                medical_history, national_id, blood_group, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                patient.last_name,
                patient.first_name,
                patient.birth_date,
                patient.phone,
                patient.address,
                patient.email,
                patient.gender.as_str(),
                patient.medical_history,
                patient.national_id,
                patient.blood_group,
                today,
                today,
            ],
        )?;

        let mut saved = patient.clone();
        saved.id = Some(self.conn.last_insert_rowid());
        saved.created_at = Some(today);
        saved.updated_at = Some(today);
        Ok(saved)
    }

    /// Update an existing patient, restamping `updated_at`.
    ///
    /// `created_at` is never written. Fails with [`StoreError::NotFound`] when the record has
    /// no id or no row carries it.
    pub fn update(&self, patient: &PatientRecord) -> StoreResult<PatientRecord> {
        let id = patient
            .id
            .ok_or_else(|| StoreError::NotFound("patient has no id".into()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                last_name = ?2,
                first_name = ?3,
                birth_date = ?4,
                phone = ?5,
                address = ?6,
                email = ?7,
                gender = ?8,
                medical_history = ?9,
                national_id = ?10,
                blood_group = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
            params![
                id,
                patient.last_name,
                patient.first_name,
                patient.birth_date,
                patient.phone,
                patient.address,
                patient.email,
                patient.gender.as_str(),
                patient.medical_history,
                patient.national_id,
                patient.blood_group,
                today(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(format!("patient {id}")));
        }

        self.get_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(format!("patient {id}")))
    }

    /// Get a patient by id.
    pub fn get_by_id(&self, id: i64) -> StoreResult<Option<PatientRecord>> {
        self.conn
            .query_row(
                &format!("{SELECT_PATIENT} WHERE id = ?"),
                [id],
                row_to_patient,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients, ordered by id.
    pub fn get_all(&self) -> StoreResult<Vec<PatientRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PATIENT} ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient by its id. Returns whether a row was removed.
    pub fn delete(&self, patient: &PatientRecord) -> StoreResult<bool> {
        let Some(id) = patient.id else {
            return Ok(false);
        };
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    pub fn exists_by_national_id(&self, national_id: &str) -> StoreResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE national_id = ?)",
            [national_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn get_by_national_id(&self, national_id: &str) -> StoreResult<Option<PatientRecord>> {
        self.conn
            .query_row(
                &format!("{SELECT_PATIENT} WHERE national_id = ?"),
                [national_id],
                row_to_patient,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients whose last or first name contains `term`, ignoring case.
    ///
    /// Both sides are folded with Unicode lowercasing, so `éric` finds `Éric`. SQL wildcards
    /// in `term` are matched literally.
    pub fn find_by_name_substring(&self, term: &str) -> StoreResult<Vec<PatientRecord>> {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let mut stmt = self.conn.prepare(&format!(
            r#"{SELECT_PATIENT}
            WHERE {FOLD_FUNCTION}(last_name) LIKE ?1 ESCAPE '\'
               OR {FOLD_FUNCTION}(first_name) LIKE ?1 ESCAPE '\'
            ORDER BY id"#
        ))?;
        let rows = stmt.query_map([pattern], row_to_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Patients born between `start` and `end`, both inclusive.
    pub fn find_by_birth_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<PatientRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_PATIENT} WHERE birth_date BETWEEN ?1 AND ?2 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![start, end], row_to_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Patients with exactly this blood group.
    pub fn find_by_blood_group(&self, blood_group: &str) -> StoreResult<Vec<PatientRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_PATIENT} WHERE blood_group = ? ORDER BY id"
        ))?;
        let rows = stmt.query_map([blood_group], row_to_patient)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Exact match on last name, first name and birth date.
    pub fn find_by_identity(
        &self,
        last_name: &str,
        first_name: &str,
        birth_date: NaiveDate,
    ) -> StoreResult<Option<PatientRecord>> {
        self.conn
            .query_row(
                &format!(
                    "{SELECT_PATIENT} WHERE last_name = ?1 AND first_name = ?2 AND birth_date = ?3 \
                     ORDER BY id LIMIT 1"
                ),
                params![last_name, first_name, birth_date],
                row_to_patient,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_patient(row: &Row<'_>) -> rusqlite::Result<PatientRecord> {
    let gender: String = row.get(7)?;
    let gender = gender.parse::<Gender>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(PatientRecord {
        id: row.get(0)?,
        last_name: row.get(1)?,
        first_name: row.get(2)?,
        birth_date: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        email: row.get(6)?,
        gender,
        medical_history: row.get(8)?,
        national_id: row.get(9)?,
        blood_group: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

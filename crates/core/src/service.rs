//! Patient record service.
//!
//! Orchestrates the one business rule of the system, the national-id uniqueness pre-check on
//! create and update, and otherwise delegates to the store. Each operation runs as a single unit
//! of work: the check and the write of create/update share one transaction, and the unique index
//! on `national_id` stays the final authority.
//!
//! ## Pure Data Operations
//!
//! This module contains **only** data operations—no API concerns such as routing or status
//! codes. HTTP mapping of [`PatientError`] belongs in `api-rest`.

use crate::config::CoreConfig;
use crate::error::{PatientError, PatientResult};
use crate::mapper;
use crate::store::{PatientStore, StoreError};
use crate::PatientRecord;
use api_shared::PatientDto;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Cloneable handle to the patient store; every clone shares the same connection.
#[derive(Clone)]
pub struct PatientService {
    store: Arc<Mutex<PatientStore>>,
}

impl PatientService {
    /// Wrap an opened store.
    pub fn new(store: PatientStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Open (creating if needed) the database named by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if the database directory cannot be created or SQLite fails to
    /// open the file.
    pub fn open(cfg: &CoreConfig) -> PatientResult<Self> {
        cfg.ensure_db_dir()?;
        let store = PatientStore::open(cfg.db_path())?;
        tracing::info!("patient store opened at {}", cfg.db_path().display());
        Ok(Self::new(store))
    }

    /// Service over a throwaway in-memory database.
    pub fn in_memory() -> PatientResult<Self> {
        Ok(Self::new(PatientStore::open_in_memory()?))
    }

    /// Creates a new patient.
    ///
    /// # Errors
    ///
    /// - [`PatientError::DuplicateNationalId`] if `dto.national_id` is already in use; nothing
    ///   is written.
    /// - [`PatientError::Store`] for storage faults.
    pub fn create(&self, dto: &PatientDto) -> PatientResult<PatientDto> {
        tracing::info!("creating a new patient");

        let mut store = self.store.lock()?;
        let saved = store.unit_of_work(|repo| {
            if let Some(national_id) = dto.national_id.as_deref() {
                if repo.exists_by_national_id(national_id)? {
                    return Err(PatientError::DuplicateNationalId);
                }
            }

            let record = PatientRecord::from(dto);
            repo.insert(&record).map_err(conflict_on_unique_national_id)
        })?;

        tracing::info!(id = ?saved.id, "patient created");
        Ok(PatientDto::from(&saved))
    }

    pub fn get_by_id(&self, id: i64) -> PatientResult<PatientDto> {
        tracing::info!(id, "fetching patient");

        let store = self.store.lock()?;
        let record = store
            .repository()
            .get_by_id(id)?
            .ok_or_else(|| PatientError::not_found("id", id))?;
        Ok(PatientDto::from(&record))
    }

    pub fn get_all(&self) -> PatientResult<Vec<PatientDto>> {
        tracing::info!("listing all patients");

        let store = self.store.lock()?;
        let records = store.repository().get_all()?;
        Ok(mapper::to_dto_list(&records))
    }

    /// Overwrites every mutable field of patient `id` from `dto`.
    ///
    /// The duplicate check only runs when the incoming national id differs from the record's
    /// current one, so resubmitting a record's own national id is always accepted.
    ///
    /// # Errors
    ///
    /// - [`PatientError::NotFound`] if no patient has this id.
    /// - [`PatientError::DuplicateNationalId`] if the new national id belongs to another patient.
    pub fn update(&self, id: i64, dto: &PatientDto) -> PatientResult<PatientDto> {
        tracing::info!(id, "updating patient");

        let mut store = self.store.lock()?;
        let updated = store.unit_of_work(|repo| {
            let mut existing = repo
                .get_by_id(id)?
                .ok_or_else(|| PatientError::not_found("id", id))?;

            if let Some(national_id) = dto.national_id.as_deref() {
                if existing.national_id.as_deref() != Some(national_id)
                    && repo.exists_by_national_id(national_id)?
                {
                    return Err(PatientError::DuplicateNationalId);
                }
            }

            mapper::apply_update(&mut existing, Some(dto));
            repo.update(&existing).map_err(conflict_on_unique_national_id)
        })?;

        tracing::info!(id, "patient updated");
        Ok(PatientDto::from(&updated))
    }

    pub fn delete(&self, id: i64) -> PatientResult<()> {
        tracing::info!(id, "deleting patient");

        let mut store = self.store.lock()?;
        store.unit_of_work(|repo| {
            let existing = repo
                .get_by_id(id)?
                .ok_or_else(|| PatientError::not_found("id", id))?;
            repo.delete(&existing)?;
            Ok::<_, PatientError>(())
        })?;

        tracing::info!(id, "patient deleted");
        Ok(())
    }

    pub fn find_by_national_id(&self, national_id: &str) -> PatientResult<PatientDto> {
        tracing::info!("fetching patient by national id");

        let store = self.store.lock()?;
        let record = store
            .repository()
            .get_by_national_id(national_id)?
            .ok_or_else(|| PatientError::not_found("national id", national_id))?;
        Ok(PatientDto::from(&record))
    }

    /// Case-insensitive substring search over last and first names.
    pub fn search_by_name_or_firstname(&self, query: &str) -> PatientResult<Vec<PatientDto>> {
        tracing::info!(query, "searching patients by name");

        let store = self.store.lock()?;
        let records = store.repository().find_by_name_substring(query)?;
        Ok(mapper::to_dto_list(&records))
    }

    /// Patients born between `start` and `end` inclusive. The caller orders the bounds.
    pub fn find_by_birth_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> PatientResult<Vec<PatientDto>> {
        tracing::info!(%start, %end, "searching patients by birth date range");

        let store = self.store.lock()?;
        let records = store.repository().find_by_birth_date_range(start, end)?;
        Ok(mapper::to_dto_list(&records))
    }

    pub fn find_by_blood_group(&self, blood_group: &str) -> PatientResult<Vec<PatientDto>> {
        tracing::info!(blood_group, "searching patients by blood group");

        let store = self.store.lock()?;
        let records = store.repository().find_by_blood_group(blood_group)?;
        Ok(mapper::to_dto_list(&records))
    }

    /// Exact lookup on last name, first name and birth date.
    pub fn find_by_identity(
        &self,
        last_name: &str,
        first_name: &str,
        birth_date: NaiveDate,
    ) -> PatientResult<PatientDto> {
        tracing::info!(%birth_date, "fetching patient by identity");

        let store = self.store.lock()?;
        let record = store
            .repository()
            .find_by_identity(last_name, first_name, birth_date)?
            .ok_or_else(|| {
                PatientError::not_found(
                    "identity",
                    format!("{last_name} {first_name} {birth_date}"),
                )
            })?;
        Ok(PatientDto::from(&record))
    }

    pub fn count(&self) -> PatientResult<usize> {
        let store = self.store.lock()?;
        Ok(store.repository().count()?)
    }
}

/// The unique index is the source of truth for national ids; report its violation the same way
/// as the pre-check.
fn conflict_on_unique_national_id(err: StoreError) -> PatientError {
    match err {
        StoreError::Constraint(msg) if msg.contains("national_id") => {
            PatientError::DuplicateNationalId
        }
        other => PatientError::Store(other),
    }
}

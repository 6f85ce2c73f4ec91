//! Persistent store for patient records.
//!
//! [`PatientStore`] owns the SQLite connection and creates the schema on open. Queries live on
//! [`PatientRepository`], a borrowed view over either the bare connection (single statements)
//! or an open transaction (see [`PatientStore::unit_of_work`]).

mod patients;
mod schema;

pub use patients::PatientRepository;
pub use schema::SCHEMA;

use rusqlite::{functions::FunctionFlags, Connection};
use std::path::Path;
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(msg.unwrap_or_else(|| err.to_string()))
            }
            other => StoreError::Sqlite(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// SQL scalar function that lowercases text with full Unicode case mapping (SQLite's own
/// `lower()` only folds ASCII).
pub(crate) const FOLD_FUNCTION: &str = "fold";

/// Database connection wrapper.
pub struct PatientStore {
    conn: Connection,
}

impl PatientStore {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialise()?;
        Ok(store)
    }

    /// Create in-memory database (for testing and throwaway runs).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialise()?;
        Ok(store)
    }

    fn initialise(&self) -> StoreResult<()> {
        self.conn.create_scalar_function(
            FOLD_FUNCTION,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
        )?;
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Repository over the bare connection; each statement commits on its own.
    pub fn repository(&self) -> PatientRepository<'_> {
        PatientRepository::new(&self.conn)
    }

    /// Run `work` inside one transaction.
    ///
    /// The transaction commits when `work` returns `Ok` and rolls back when it returns `Err`
    /// (the transaction is dropped without commit).
    pub fn unit_of_work<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&PatientRepository<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let tx = self.conn.transaction().map_err(StoreError::from)?;
        let out = work(&PatientRepository::new(&tx))?;
        tx.commit().map_err(StoreError::from)?;
        Ok(out)
    }
}

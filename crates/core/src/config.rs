//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_DB_PATH, DEFAULT_REST_ADDR};
use crate::{PatientError, PatientResult};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_path: PathBuf,
    rest_addr: SocketAddr,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(db_path: PathBuf, rest_addr: SocketAddr) -> PatientResult<Self> {
        if db_path.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }

        Ok(Self { db_path, rest_addr })
    }

    /// Build a `CoreConfig` from optional raw values, typically `PATIENT_DB_PATH` and
    /// `PATIENT_REST_ADDR`.
    ///
    /// Missing or whitespace-only values fall back to the defaults in [`crate::constants`].
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if the address cannot be parsed.
    pub fn from_env_values(
        db_path: Option<String>,
        rest_addr: Option<String>,
    ) -> PatientResult<Self> {
        let db_path = non_blank(db_path).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let rest_addr = non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());

        let rest_addr: SocketAddr = rest_addr.parse().map_err(|e| {
            PatientError::InvalidInput(format!("invalid REST address '{rest_addr}': {e}"))
        })?;

        Self::new(PathBuf::from(db_path), rest_addr)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    /// Create the database file's parent directory if it does not exist yet.
    pub fn ensure_db_dir(&self) -> PatientResult<()> {
        match self.db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PatientError::InvalidInput(format!(
                        "failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })
            }
            _ => Ok(()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_when_values_missing() {
        let cfg = CoreConfig::from_env_values(None, Some("   ".into())).unwrap();
        assert_eq!(cfg.db_path(), Path::new(DEFAULT_DB_PATH));
        assert_eq!(cfg.rest_addr(), DEFAULT_REST_ADDR.parse().unwrap());
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = CoreConfig::from_env_values(
            Some("/tmp/p.db".into()),
            Some("127.0.0.1:8081".into()),
        )
        .unwrap();
        assert_eq!(cfg.db_path(), Path::new("/tmp/p.db"));
        assert_eq!(cfg.rest_addr().port(), 8081);
    }

    #[test]
    fn invalid_address_is_rejected() {
        let err = CoreConfig::from_env_values(None, Some("not-an-address".into())).unwrap_err();
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn empty_db_path_is_rejected() {
        let err = CoreConfig::new(PathBuf::new(), DEFAULT_REST_ADDR.parse().unwrap()).unwrap_err();
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn ensure_db_dir_creates_parent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("patients.db");
        let cfg = CoreConfig::new(db_path, DEFAULT_REST_ADDR.parse().unwrap()).unwrap();

        cfg.ensure_db_dir().unwrap();
        assert!(temp_dir.path().join("nested").is_dir());
    }
}

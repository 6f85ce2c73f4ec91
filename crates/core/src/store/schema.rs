//! SQLite schema definition.

/// Complete database schema for the patient service.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    last_name TEXT NOT NULL,
    first_name TEXT NOT NULL,
    birth_date TEXT NOT NULL,                    -- ISO date (YYYY-MM-DD)
    phone TEXT,
    address TEXT NOT NULL,
    email TEXT,
    gender TEXT NOT NULL CHECK (gender IN ('MALE', 'FEMALE', 'OTHER', 'UNSPECIFIED')),
    medical_history TEXT,
    national_id TEXT UNIQUE,                     -- NULLs never collide
    blood_group TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_birth_date ON patients(birth_date);
CREATE INDEX IF NOT EXISTS idx_patients_blood_group ON patients(blood_group);
"#;

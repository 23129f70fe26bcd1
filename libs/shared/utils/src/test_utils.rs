use chrono::FixedOffset;
use serde_json::{json, Value};

use shared_config::{AppConfig, StorageBackend};

use crate::clock::FixedClock;
use crate::datetime::ClinicTime;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub clinic_utc_offset: FixedOffset,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            clinic_utc_offset: FixedOffset::west_opt(3 * 3600).expect("valid offset"),
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            storage_backend: StorageBackend::Supabase,
            clinic_utc_offset: self.clinic_utc_offset,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
        }
    }

    pub fn clinic_time(&self) -> ClinicTime {
        ClinicTime::new(self.clinic_utc_offset)
    }
}

/// Clinic time used across the test suites (UTC-03:00).
pub fn clinic_time() -> ClinicTime {
    TestConfig::default().clinic_time()
}

/// A fixed clock reading the given clinic wall-clock time.
pub fn clock_at(clinic_datetime: &str) -> FixedClock {
    let now = clinic_time()
        .parse(clinic_datetime)
        .expect("test clock needs a valid clinic date-time");
    FixedClock::new(now)
}

/// Row shapes as PostgREST returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn dentist_row(id: i64, license_number: &str) -> Value {
        json!({
            "id": id,
            "surname": "Souza",
            "name": "Ana",
            "license_number": license_number
        })
    }

    pub fn patient_row(id: i64, identity_number: &str) -> Value {
        json!({
            "id": id,
            "surname": "Lima",
            "name": "Bruno",
            "identity_number": identity_number,
            "created_at": "2025-01-10T12:00:00Z"
        })
    }

    pub fn appointment_row(id: i64, date_and_time: &str, dentist_license: &str, patient_identity: &str) -> Value {
        json!({
            "id": id,
            "description": "cleaning",
            "date_and_time": date_and_time,
            "dentist_license": dentist_license,
            "patient_identity": patient_identity
        })
    }

    pub fn appointment_details_row(id: i64, date_and_time: &str, dentist_license: &str, patient_identity: &str) -> Value {
        let mut row = Self::appointment_row(id, date_and_time, dentist_license, patient_identity);
        row["dentist"] = Self::dentist_row(10, dentist_license);
        row["patient"] = Self::patient_row(20, patient_identity);
        row
    }

    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

use std::env;

use chrono::{FixedOffset, Offset, Utc};
use tracing::warn;

const DEFAULT_CLINIC_UTC_OFFSET: &str = "-03:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub storage_backend: StorageBackend,
    pub clinic_utc_offset: FixedOffset,
    pub server_host: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            storage_backend: match env::var("STORAGE_BACKEND") {
                Ok(value) => parse_storage_backend(&value).unwrap_or_else(|| {
                    warn!("Unknown STORAGE_BACKEND '{}', using supabase", value);
                    StorageBackend::Supabase
                }),
                Err(_) => StorageBackend::Supabase,
            },
            clinic_utc_offset: env::var("CLINIC_UTC_OFFSET")
                .ok()
                .and_then(|value| {
                    let parsed = parse_utc_offset(&value);
                    if parsed.is_none() {
                        warn!("Invalid CLINIC_UTC_OFFSET '{}', using {}", value, DEFAULT_CLINIC_UTC_OFFSET);
                    }
                    parsed
                })
                .unwrap_or_else(default_clinic_offset),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(8000),
        };

        if config.storage_backend == StorageBackend::Supabase && !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Configuration for the in-memory backend, used by tests and local runs.
    pub fn in_memory() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            storage_backend: StorageBackend::Memory,
            clinic_utc_offset: default_clinic_offset(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }
}

pub fn parse_storage_backend(value: &str) -> Option<StorageBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "supabase" => Some(StorageBackend::Supabase),
        "memory" | "in-memory" => Some(StorageBackend::Memory),
        _ => None,
    }
}

/// Parses `±HH:MM` into a fixed offset.
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    let (sign, rest) = match value.chars().next()? {
        '+' => (1, &value[1..]),
        '-' => (-1, &value[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn default_clinic_offset() -> FixedOffset {
    parse_utc_offset(DEFAULT_CLINIC_UTC_OFFSET).unwrap_or_else(|| Utc.fix())
}

//! Environment-based configuration.
//!
//! Secrets never live in source. Every setting is read from the process
//! environment, with a `.env` file in the working directory loaded first
//! (via `dotenvy`) for local development.
//!
//! | variable                    | default                                     |
//! |-----------------------------|---------------------------------------------|
//! | `GEMINI_API_KEY`            | none; required by the advisor               |
//! | `GOOGLE_MAPS_API_KEY`       | none; required for map tile URLs            |
//! | `AGRI_GEMINI_MODEL`         | `gemini-1.5-flash`                          |
//! | `AGRI_GEMINI_BASE_URL`      | `https://generativelanguage.googleapis.com` |
//! | `AGRI_REQUEST_TIMEOUT_SECS` | `30`                                        |
//! | `AGRI_VARIANT`              | `lifecycle`                                 |
//! | `AGRI_CLAMP_AT_ZERO`        | `false`                                     |
//! | `AGRI_LOG_FILE`             | unset (TUI logging disabled)                |

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::domain::Variant;
use crate::error::AppError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, PartialEq)]
pub struct Settings {
    pub gemini_api_key: Option<String>,
    pub maps_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    pub variant: Variant,
    pub clamp_at_zero: bool,
    pub log_file: Option<PathBuf>,
}

// Keys are redacted so settings can be logged.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .field("maps_api_key", &self.maps_api_key.as_ref().map(|_| "<set>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("variant", &self.variant)
            .field("clamp_at_zero", &self.clamp_at_zero)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Settings {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let request_timeout = match get("AGRI_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    AppError::input(format!(
                        "AGRI_REQUEST_TIMEOUT_SECS must be a whole number of seconds (got '{raw}')."
                    ))
                })?;
                if secs == 0 {
                    return Err(AppError::input("AGRI_REQUEST_TIMEOUT_SECS must be at least 1."));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let variant = match get("AGRI_VARIANT") {
            Some(raw) => Variant::from_str(&raw, true).map_err(|_| {
                AppError::input(format!(
                    "AGRI_VARIANT must be 'classic' or 'lifecycle' (got '{raw}')."
                ))
            })?,
            None => Variant::Lifecycle,
        };

        let clamp_at_zero = match get("AGRI_CLAMP_AT_ZERO") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::input(format!("AGRI_CLAMP_AT_ZERO must be true or false (got '{raw}')."))
            })?,
            None => false,
        };

        Ok(Self {
            gemini_api_key: get("GEMINI_API_KEY").map(strip_quotes),
            maps_api_key: get("GOOGLE_MAPS_API_KEY").map(strip_quotes),
            gemini_model: get("AGRI_GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: get("AGRI_GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout,
            variant,
            clamp_at_zero,
            log_file: get("AGRI_LOG_FILE").map(PathBuf::from),
        })
    }

    pub fn require_gemini_key(&self) -> Result<&str, AppError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| AppError::input("Missing GEMINI_API_KEY in environment (.env)."))
    }

    pub fn require_maps_key(&self) -> Result<&str, AppError> {
        self.maps_api_key
            .as_deref()
            .ok_or_else(|| AppError::input("Missing GOOGLE_MAPS_API_KEY in environment (.env)."))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `.env` files often carry quoted values.
fn strip_quotes(value: String) -> String {
    value.trim_matches(|c| c == '"' || c == '\'').to_string()
}

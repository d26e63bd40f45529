//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use crate::validation::FormatErrorPolicy;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOCALE: &str = "en";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Port for the HTTP API (from ACME_PLANNER_PORT)
    pub port: u16,
    /// SQLite file (from ACME_PLANNER_DATABASE). `None` uses the platform data dir.
    pub database_path: Option<PathBuf>,
    /// Locale assumed when a request sends no Accept-Language (from ACME_PLANNER_LOCALE)
    pub default_locale: String,
    /// Handling of unparsable dates and workloads (from ACME_PLANNER_FORMAT_ERRORS)
    pub format_errors: FormatErrorPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or invalid values fall back
    /// to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("ACME_PLANNER_PORT")
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_path = lookup("ACME_PLANNER_DATABASE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let default_locale = lookup("ACME_PLANNER_LOCALE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let format_errors = match lookup("ACME_PLANNER_FORMAT_ERRORS") {
            Some(value) => FormatErrorPolicy::from_str(value.trim()).unwrap_or_else(|| {
                tracing::warn!("Unknown format error policy {:?}, using skip", value);
                FormatErrorPolicy::Skip
            }),
            None => FormatErrorPolicy::Skip,
        };

        Self {
            port,
            database_path,
            default_locale,
            format_errors,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: None,
            default_locale: DEFAULT_LOCALE.to_string(),
            format_errors: FormatErrorPolicy::Skip,
        }
    }
}

//! Process configuration read from the environment.
//!
//! [`Config::from_env`] loads `.env` (if present) and reads the process
//! environment; [`Config::from_lookup`] takes any key lookup so the parsing
//! can be tested without touching the real environment.

use std::error::Error;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUDIT_TOPIC: &str = "ip-whitelist";
pub const DEFAULT_AUDIT_TIMEOUT_MSEC: u64 = 2000;

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Test,
    Integration,
    Staging,
    Production,
}

impl Environment {
    /// Unknown or missing names fall back to [`Environment::Test`].
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("integration") => Environment::Integration,
            Some("staging") => Environment::Staging,
            Some("production") => Environment::Production,
            _ => Environment::Test,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Environment::Test => "test",
            Environment::Integration => "integration",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        write!(f, "{name}")
    }
}

/// Settings for the audit log transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Publish records to the message bus (`KAFKA_LOGGING`).
    pub publish: bool,
    /// Also write published records locally (`LOCAL_LOGGING`).
    pub local_copy: bool,
    /// Base URL of the bus REST proxy (`KAFKA_REST_URL`).
    pub endpoint: Option<String>,
    pub topic: String,
    pub timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            publish: false,
            local_copy: false,
            endpoint: None,
            topic: DEFAULT_AUDIT_TOPIC.to_string(),
            timeout: Duration::from_millis(DEFAULT_AUDIT_TIMEOUT_MSEC),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub environment: Environment,
    pub port: u16,
    /// Raw `IP_WHITELIST` value, untouched.
    pub ip_whitelist: Option<String>,
    pub audit: AuditConfig,
}

impl Config {
    /// Read the configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_name(lookup("APP_ENV").as_deref());

        let port = match lookup("PORT").filter(|p| !p.trim().is_empty()) {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT '{p}': {e}"))?,
            None => DEFAULT_PORT,
        };

        let timeout_msec = match lookup("AUDIT_TIMEOUT_MSEC").filter(|t| !t.trim().is_empty()) {
            Some(t) => t
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid AUDIT_TIMEOUT_MSEC '{t}': {e}"))?,
            None => DEFAULT_AUDIT_TIMEOUT_MSEC,
        };

        let publish = flag(lookup("KAFKA_LOGGING").as_deref());
        if publish && environment == Environment::Test {
            log::warn!("KAFKA_LOGGING ignored in the {environment} environment");
        }

        let audit = AuditConfig {
            publish: publish && environment != Environment::Test,
            local_copy: flag(lookup("LOCAL_LOGGING").as_deref()),
            endpoint: lookup("KAFKA_REST_URL")
                .map(|url| strip_ssl_marker(url.trim()))
                .filter(|url| !url.is_empty()),
            topic: lookup("AUDIT_TOPIC")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_AUDIT_TOPIC.to_string()),
            timeout: Duration::from_millis(timeout_msec),
        };

        Ok(Config {
            environment,
            port,
            ip_whitelist: lookup("IP_WHITELIST"),
            audit,
        })
    }
}

/// Interpret an on/off environment flag.
fn flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// `https+ssl://host` => `https://host`.
fn strip_ssl_marker(url: &str) -> String {
    url.replace("+ssl", "")
}

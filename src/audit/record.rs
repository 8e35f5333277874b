//! Audit record and message envelope.

use serde::{Deserialize, Serialize};

/// Severity of an audit message, also used as the bus message key.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn to_log_level(self) -> log::Level {
        match self {
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One verification decision, or one rejected request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

impl AuditRecord {
    pub fn decision(address: &str, allow: bool, elapsed_ms: u64) -> Self {
        AuditRecord {
            address: address.to_string(),
            allow: Some(allow),
            error: None,
            elapsed_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn rejected(address: &str, error: &str, elapsed_ms: u64) -> Self {
        AuditRecord {
            address: address.to_string(),
            allow: None,
            error: Some(error.to_string()),
            elapsed_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Envelope queued for delivery. `value` holds the JSON text of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditMessage {
    pub topic: String,
    pub partition: u32,
    pub key: LogLevel,
    pub value: String,
}

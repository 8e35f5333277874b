//! Delivery of audit messages: local log target or message-bus REST proxy.

use super::record::AuditMessage;
use crate::config::AuditConfig;
use reqwest::header::CONTENT_TYPE;
use std::error::Error;
use std::time::Duration;

/// `log` target that `log4rs.yml` routes to the local audit file.
pub const AUDIT_TARGET: &str = "audit";

/// Content type accepted by the bus REST proxy for JSON records.
pub const BUS_CONTENT_TYPE: &str = "application/vnd.kafka.json.v2+json";

/// How a message ended up being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Local,
    Published,
    /// Publishing failed and the message was written locally instead.
    Fallback,
}

/// Publishes messages to `<endpoint>/topics/<topic>`.
#[derive(Debug, Clone)]
pub struct BusPublisher {
    client: reqwest::Client,
    endpoint: String,
    local_copy: bool,
}

impl BusPublisher {
    pub fn new(endpoint: &str, timeout: Duration, local_copy: bool) -> Result<Self, Box<dyn Error>> {
        if endpoint.trim().is_empty() {
            return Err("Message bus endpoint is empty".into());
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Error building message bus client: {e}"))?;
        Ok(BusPublisher {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            local_copy,
        })
    }

    pub fn url_for(&self, topic: &str) -> String {
        format!("{}/topics/{topic}", self.endpoint)
    }

    /// POST one message; non-2xx responses count as failures.
    pub async fn publish(&self, msg: &AuditMessage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let body = serde_json::json!({
            "records": [{
                "key": msg.key,
                "value": msg.value,
                "partition": msg.partition,
            }]
        });
        let response = self
            .client
            .post(self.url_for(&msg.topic))
            .header(CONTENT_TYPE, BUS_CONTENT_TYPE)
            .body(serde_json::to_vec(&body)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("message bus answered {status}").into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Transport {
    Local,
    Bus(BusPublisher),
}

impl Transport {
    pub async fn deliver(&self, msg: &AuditMessage) -> Delivery {
        match self {
            Transport::Local => {
                write_local(msg);
                Delivery::Local
            }
            Transport::Bus(publisher) => match publisher.publish(msg).await {
                Ok(()) => {
                    if publisher.local_copy {
                        write_local(msg);
                    }
                    Delivery::Published
                }
                Err(e) => {
                    log::error!(
                        "Sending the log message to the message bus failed, writing locally, error: {e}"
                    );
                    write_local(msg);
                    Delivery::Fallback
                }
            },
        }
    }
}

/// Write a message to the local audit log at the level of its key.
pub fn write_local(msg: &AuditMessage) {
    log::log!(target: AUDIT_TARGET, msg.key.to_log_level(), "{}", msg.value);
}

/// Pick the transport for `config`. A publisher that cannot be set up is
/// logged and replaced by [`Transport::Local`]; startup carries on.
pub fn init_transport(config: &AuditConfig) -> Transport {
    if !config.publish {
        log::info!("Audit log: local");
        return Transport::Local;
    }

    let endpoint = config.endpoint.as_deref().unwrap_or_default();
    match BusPublisher::new(endpoint, config.timeout, config.local_copy) {
        Ok(publisher) => {
            log::info!(
                "Audit log: publishing to {url} (local copy: {local})",
                url = publisher.url_for(&config.topic),
                local = config.local_copy
            );
            Transport::Bus(publisher)
        }
        Err(e) => {
            log::error!("Error initialising message bus producer: {e}");
            log::warn!("Audit log: falling back to local");
            Transport::Local
        }
    }
}

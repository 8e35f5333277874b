//! Non-blocking audit logger backed by a background delivery task.

use super::record::{AuditMessage, LogLevel};
use super::transport::{write_local, Transport};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Messages waiting for the worker before new ones are written locally.
pub const AUDIT_QUEUE_CAPACITY: usize = 1024;

/// What [`AuditLogger::write`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Queued,
    /// Queue full; written to the local audit log instead.
    Overflow,
    /// Worker stopped; written to the local audit log instead.
    WorkerGone,
    /// Value could not be serialized; nothing written.
    Unserializable,
}

/// Cloneable handle; each clone feeds the same worker.
///
/// The worker exits once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    tx: mpsc::Sender<AuditMessage>,
    topic: String,
}

impl AuditLogger {
    /// Spawn the delivery worker on the current tokio runtime.
    pub fn start(transport: Transport, topic: &str) -> (AuditLogger, JoinHandle<()>) {
        AuditLogger::start_with_capacity(transport, topic, AUDIT_QUEUE_CAPACITY)
    }

    pub fn start_with_capacity(
        transport: Transport,
        topic: &str,
        capacity: usize,
    ) -> (AuditLogger, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<AuditMessage>(capacity.max(1));

        let worker = tokio::spawn(async move {
            let mut count: u64 = 0;
            while let Some(msg) = rx.recv().await {
                let delivery = transport.deliver(&msg).await;
                log::trace!("audit message #{count} ==> {delivery:?}");
                count += 1;
            }
            log::debug!("Audit worker stopped after {count} message(s)");
        });

        (
            AuditLogger {
                tx,
                topic: topic.to_string(),
            },
            worker,
        )
    }

    /// Queue `value` for delivery under `key`. Never waits on the transport;
    /// when the queue is full the message is written locally right away.
    pub fn write<T: Serialize>(&self, value: &T, key: LogLevel) -> Enqueue {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Error serializing audit record: {e}");
                return Enqueue::Unserializable;
            }
        };
        let msg = AuditMessage {
            topic: self.topic.clone(),
            partition: 0,
            key,
            value,
        };
        match self.tx.try_send(msg) {
            Ok(()) => Enqueue::Queued,
            Err(TrySendError::Full(msg)) => {
                log::warn!("Audit queue full, writing locally");
                write_local(&msg);
                Enqueue::Overflow
            }
            Err(TrySendError::Closed(msg)) => {
                log::warn!("Audit worker unavailable, writing locally");
                write_local(&msg);
                Enqueue::WorkerGone
            }
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

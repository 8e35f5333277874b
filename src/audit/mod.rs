//! Structured audit log of verification decisions.
//!
//! - [`record`] - the record and message envelope
//! - [`transport`] - local log target or message-bus REST proxy
//! - [`logger`] - bounded, non-blocking queue in front of the transport

mod logger;
mod record;
mod transport;

pub use logger::{AuditLogger, Enqueue, AUDIT_QUEUE_CAPACITY};
pub use record::{AuditMessage, AuditRecord, LogLevel};
pub use transport::{
    init_transport, write_local, BusPublisher, Delivery, Transport, AUDIT_TARGET,
    BUS_CONTENT_TYPE,
};

//! Port trait definitions for the bridge.
//!
//! Ports define what the bridge requires from its collaborators: a queue to
//! publish to, an event bus to emit on, and a request validator.

pub mod bus;
pub mod queue;
pub mod validator;

pub use bus::{BusConnection, BusConnector, BusError};
pub use queue::{OutboundMessage, PublishError, QueuePublisher};
pub use validator::{RequestValidator, ValidationPolicy};

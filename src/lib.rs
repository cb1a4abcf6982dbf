//! Bridge between a message queue and a local event bus.
//!
//! Requests arriving on the queue are validated and forwarded to the bus;
//! responses emitted on the bus are formatted and published back to the
//! queue that asked for them.
//!
//! # Modules
//!
//! - [`bridge`]: Message model, validation, formatting and routing
//! - [`config`]: TOML configuration for queues, bus and timeouts

pub mod bridge;
pub mod config;

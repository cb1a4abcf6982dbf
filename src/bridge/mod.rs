//! Message queue to event bus bridge.
//!
//! Inbound queue messages are decoded, their context is normalized, and they
//! are validated against declarative templates before being emitted on the
//! event bus. Events coming back from the bus are checked for staleness,
//! reshaped per response kind, and published to the reply queue their
//! context names.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types ([`domain::Message`], [`domain::Context`], [`domain::Template`])
//! - **Ports**: Abstract collaborators ([`ports::queue::QueuePublisher`], [`ports::bus::BusConnection`], [`ports::validator::RequestValidator`])
//! - **Adapters**: The queue body codec and in-memory stand-ins
//! - **Templates**: The name to schema registry and built-in templates
//! - **Validation**: The structural template checker
//! - **Services**: Enrichment, formatting, routing and the bridge itself
//!
//! # Example
//!
//! ```
//! use mq_bus_bridge::bridge::domain::Context;
//! use mq_bus_bridge::bridge::services::RoutingResolver;
//!
//! let resolver = RoutingResolver::default();
//! assert_eq!(resolver.resolve(&Context::new(), None), "neon_chat_api_response");
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod templates;
pub mod validation;

#[cfg(test)]
mod tests;

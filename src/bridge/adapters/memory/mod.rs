//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe stand-ins for the queue and
//! bus collaborators.

mod bus;
mod queue;

pub use bus::{InMemoryBusConnection, InMemoryBusConnector};
pub use queue::InMemoryQueuePublisher;

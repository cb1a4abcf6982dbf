//! Adapter implementations for the bridge ports.
//!
//! - [`codec`]: the queue body encoding
//! - [`memory`]: in-memory queue and bus stand-ins

pub mod codec;
pub mod memory;

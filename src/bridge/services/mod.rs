//! Application services for the bridge.

pub mod bridge;
pub mod dispatch;
mod enricher;
mod formatter;
pub mod routing;
mod session;

pub use bridge::{
    BridgeService, BridgeSettings, BusOutcome, DEFAULT_ERROR_QUEUE, DropReason, InboundOutcome,
};
pub use dispatch::{DispatchStats, dispatch_bus_events};
pub use enricher::ContextEnricher;
pub use formatter::{ResponseFormatter, ResponsePayload};
pub use routing::{DEFAULT_REPLY_QUEUE, RoutingResolver};
pub use session::BusSession;

//! Shared world state for bridge pipeline BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use mq_bus_bridge::bridge::{
    adapters::memory::{InMemoryBusConnection, InMemoryBusConnector, InMemoryQueuePublisher},
    error::BridgeError,
    services::{BridgeService, BridgeSettings, BusOutcome, BusSession, InboundOutcome},
    validation::TemplateValidator,
};
use mq_bus_bridge::config::BusConfig;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestBridge =
    BridgeService<TemplateValidator, InMemoryQueuePublisher, InMemoryBusConnection, DefaultClock>;

/// Scenario world for bridge pipeline behaviour tests.
pub struct BridgeWorld {
    /// Records everything the bridge publishes.
    pub publisher: Arc<InMemoryQueuePublisher>,
    /// Records everything the bridge emits on the bus.
    pub connector: InMemoryBusConnector,
    /// The bridge under test, once started.
    pub service: Option<TestBridge>,
    /// Result of the last inbound queue message.
    pub last_inbound: Option<Result<InboundOutcome, BridgeError>>,
    /// Result of the last bus event.
    pub last_bus_event: Option<Result<BusOutcome, BridgeError>>,
}

impl BridgeWorld {
    /// Creates a world with no running bridge.
    #[must_use]
    pub fn new() -> Self {
        Self {
            publisher: Arc::new(InMemoryQueuePublisher::new()),
            connector: InMemoryBusConnector::new(),
            service: None,
            last_inbound: None,
            last_bus_event: None,
        }
    }

    /// Connects the bus and builds the bridge service.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory bus refuses the connection.
    pub fn start(&mut self) -> Result<(), eyre::Report> {
        let mut session = BusSession::new(self.connector.clone(), BusConfig::default());
        let bus = run_async(session.connect())
            .map_err(|err| eyre::eyre!("bus connection failed: {err}"))?;
        self.service = Some(BridgeService::new(
            TemplateValidator::new(),
            Arc::clone(&self.publisher),
            bus,
            Arc::new(DefaultClock),
            BridgeSettings::default(),
        ));
        Ok(())
    }

    /// Returns the running bridge.
    ///
    /// # Errors
    ///
    /// Returns an error if no `Given a running bridge` step ran.
    pub fn service(&self) -> Result<&TestBridge, eyre::Report> {
        self.service
            .as_ref()
            .ok_or_else(|| eyre::eyre!("bridge has not been started"))
    }
}

impl Default for BridgeWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BridgeWorld {
    BridgeWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

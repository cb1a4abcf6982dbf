//! Given steps for bridge pipeline BDD scenarios.

use super::world::BridgeWorld;
use rstest_bdd_macros::given;

#[given("a running bridge")]
fn a_running_bridge(world: &mut BridgeWorld) -> Result<(), eyre::Report> {
    world.start()
}

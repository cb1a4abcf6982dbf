//! Unit tests for the bridge module.
//!
//! Tests are organised by component, covering the documented request and
//! response scenarios as well as error and edge cases.

mod routing_tests;
mod validation_tests;

//! Step definitions for bridge pipeline behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

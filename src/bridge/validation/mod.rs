//! Request validation implementation.
//!
//! [`rules`] evaluates a single template against a message; [`service`]
//! chooses which templates apply and chains them.

pub mod rules;
pub mod service;

pub use service::TemplateValidator;

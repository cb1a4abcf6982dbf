//! Template registry and the built-in request templates.

pub mod builtin;
mod registry;

pub use registry::TemplateRegistry;

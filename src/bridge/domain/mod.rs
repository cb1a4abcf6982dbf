//! Domain types for the bridge.
//!
//! Pure types with no transport dependencies: the message envelope, its
//! context, declarative templates and response kinds.

mod context;
mod message;
mod response_kind;
mod template;
pub mod timing;

pub use context::{Context, keys};
pub use message::{Message, MessageError};
pub use response_kind::{
    ERROR_EVENT, PROFILE_UPDATE_EVENT, RESPONSE_EVENT, ResponseKind, ResponseTimeouts,
    STT_RESPONSE_EVENT, SUBSCRIBED_EVENTS, TTS_RESPONSE_EVENT,
};
pub use template::{FieldSpec, FieldType, Presence, Schema, Template, value_type_name};

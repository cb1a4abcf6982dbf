//! Conversions between wall-clock instants and epoch-second floats.
//!
//! Timing fields travel as fractional epoch seconds, so latency checks
//! have to work in floating point.

use chrono::{DateTime, Utc};

/// Time spent decoding the inbound queue body.
pub const INPUT_DESERIALIZE: &str = "mq_input_deserialize";
/// Time between the client sending a message and the bridge receiving it.
pub const INPUT_BUS_TIME: &str = "mq_input_bus_time";
/// Time spent shaping a bus event into a queue response.
pub const FORMAT_RESPONSE: &str = "mq_format_response";

/// Returns `at` as fractional seconds since the Unix epoch.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "epoch timestamps are exchanged as fractional seconds"
)]
pub fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Returns the seconds elapsed from `earlier` (epoch seconds) until `now`.
///
/// Negative when `earlier` lies in the future.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "epoch timestamps are exchanged as fractional seconds"
)]
pub fn seconds_since(earlier: f64, now: DateTime<Utc>) -> f64 {
    epoch_seconds(now) - earlier
}

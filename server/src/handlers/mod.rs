//! Request handlers for sync and record operations.

mod records;
mod sync;

pub use records::*;
pub use sync::*;

use larder_engine::Timestamp;

/// Current wall-clock time in milliseconds since the epoch.
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis().max(0) as Timestamp
}

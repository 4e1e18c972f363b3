pub mod artifacts;
pub mod config;
pub mod error;
pub mod retry;
pub mod schedule;
pub mod window;

pub use config::{BookingConfig, Mode};
pub use error::{Error, Result};
pub use retry::{Attempt, RetryError, RetryPolicy};
pub use schedule::{booking_now, ReleaseSchedule, BOOKING_TZ};
pub use window::TimeWindow;

//! Time subsystem.
//!
//! Provides testable timing utilities without coupling to the runtime:
//! - [`Clock`] abstracts "now" so tests can drive time by hand
//! - [`Scheduler`] orders deadline-tagged tasks for the event loop

mod clock;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::Scheduler;

//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; the binary picks the backend once through [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};

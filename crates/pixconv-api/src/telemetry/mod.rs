//! Tracing setup for the server binary.

mod init;

pub use init::init_telemetry;

pub mod catalog;
pub mod config;
pub mod error;
pub mod router;
pub mod submissions;
pub mod telemetry;

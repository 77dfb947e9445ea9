pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod telemetry;
pub mod valuation;
pub mod workspace;

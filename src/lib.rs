// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain
pub mod notification;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;

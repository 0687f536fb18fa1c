// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod telemetry;

// Domain layer (delivery pipeline)
pub mod delivery;
pub mod dispatch;
pub mod outcome;
pub mod recipients;
pub mod template;

// Application layer
pub mod app;

// src/models/mod.rs

//! Domain models for the bulletin monitor.

mod config;
pub mod messages;
mod warning;

// Re-export all public types
pub use config::{Config, EndpointInfo, Envelope, MonitorConfig};
pub use warning::{AreaRecord, NotificationEvent, SeverityTier, WarningLevel, WarningSnapshot};

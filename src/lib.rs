// src/lib.rs

//! dini-monitor Library
//!
//! Watches the BMKG early-warning bulletin page for West Kalimantan, turns
//! its prose into a structured warning snapshot and classifies the result
//! for downstream map/status/announcer surfaces.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

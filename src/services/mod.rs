// src/services/mod.rs

//! Service layer for the bulletin monitor.
//!
//! This module contains the business logic for:
//! - Proxy failover fetching (`BulletinFetcher`)
//! - Bulletin parsing (`BulletinParser`)
//! - Region decomposition (`classify`)
//! - Regency centroid lookup (`gazetteer`)
//! - Level transitions (`WarningStateMachine`)

pub mod classify;
pub mod fetch;
pub mod gazetteer;
mod parse;
mod state;

pub use fetch::{BulletinFetcher, FetchedBulletin, HttpTransport, Transport};
pub use parse::{contains_termination, BulletinParser};
pub use state::WarningStateMachine;

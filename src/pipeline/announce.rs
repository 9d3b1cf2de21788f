// src/pipeline/announce.rs

//! Announcer seam.
//!
//! The pipeline decides *when* to notify; how a notification sounds or
//! looks belongs to the collaborator behind this trait. The default
//! implementation writes to the log.

use crate::models::{messages, NotificationEvent};

/// Receives notification events plus the localized snapshot summary.
pub trait Announcer {
    fn announce(&self, event: NotificationEvent, summary: &str);
}

/// Log-backed announcer used by the CLI.
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&self, event: NotificationEvent, summary: &str) {
        match event {
            NotificationEvent::Onset => {
                log::warn!("PERINGATAN DINI TERDETEKSI");
                log::warn!("{} {}", messages::ANNOUNCE_ONSET, summary);
            }
            NotificationEvent::Escalation => {
                log::warn!("Peringatan meningkat ke tingkat AWAS");
                log::warn!("{} {}", messages::ANNOUNCE_ONSET, summary);
            }
            NotificationEvent::Cleared => {
                log::info!("Peringatan Dini Berakhir");
                log::info!("{}", messages::ANNOUNCE_CLEARED);
            }
        }
    }
}

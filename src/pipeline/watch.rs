// src/pipeline/watch.rs

//! Polling scheduler.
//!
//! Drives one cycle immediately on startup, then on a fixed interval, and
//! additionally on a manual trigger. Cycles are serialized by the single
//! select loop; a trigger arriving while a cycle runs is dropped, not
//! queued.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::Config;
use super::announce::Announcer;
use super::cycle::{run_cycle, CycleContext};

/// Best-effort manual trigger for an immediate cycle.
#[derive(Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Request a refresh. Returns `false` when a request is already pending
    /// or the watch loop has stopped; callers should treat this as a no-op.
    pub fn request(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

/// Create a refresh handle and the receiver the watch loop drains.
///
/// Capacity 1: at most one trigger can be pending; everything beyond that
/// is dropped, which gives the best-effort semantics.
pub fn refresh_channel() -> (RefreshHandle, mpsc::Receiver<()>) {
    let (tx, rx) = mpsc::channel(1);
    (RefreshHandle { tx }, rx)
}

/// Run the polling loop until Ctrl-C or all refresh handles are dropped
/// together with the channel being closed.
pub async fn run_watch(
    config: &Config,
    announcer: &dyn Announcer,
    mut refresh: mpsc::Receiver<()>,
) -> Result<()> {
    let mut ctx = CycleContext::new(config)?;

    let mut ticker =
        tokio::time::interval(Duration::from_millis(config.monitor.poll_interval_ms));
    // A slow cycle must not cause a burst of catch-up cycles
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "Memantau {} setiap {} ms",
        config.monitor.target_url,
        config.monitor.poll_interval_ms
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            request = refresh.recv() => {
                if request.is_none() {
                    break;
                }
                log::info!("Memperbarui Data BMKG...");
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Berhenti memantau.");
                break;
            }
        }

        let report = run_cycle(&mut ctx).await;

        // Triggers that arrived mid-cycle are stale; drop them
        while refresh.try_recv().is_ok() {}

        log::info!("Status Koneksi: {}", report.status);
        log::info!(
            "Level {} | {} s/d {} | {} wilayah",
            report.level.as_str(),
            ctx.snapshot.time,
            ctx.snapshot.valid_until,
            ctx.snapshot.areas.len()
        );

        if let Some(event) = report.event {
            announcer.announce(event, &ctx.snapshot.summary);
        }
    }

    Ok(())
}

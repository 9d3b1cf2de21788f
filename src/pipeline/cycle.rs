// src/pipeline/cycle.rs

//! One fetch -> parse -> classify -> state-update pass.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{AppError, Result};
use crate::models::{messages, Config, NotificationEvent, WarningLevel, WarningSnapshot};
use crate::services::{BulletinFetcher, BulletinParser, HttpTransport, Transport, WarningStateMachine};
use crate::utils::http;

/// Connection status surfaced after every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// A proxy delivered the bulletin
    Connected { endpoint: String },
    /// Every endpoint was exhausted
    Failed,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Connected { endpoint } => write!(f, "Data Terhubung via {endpoint}"),
            FetchStatus::Failed => write!(f, "{}", messages::STATUS_FAILED),
        }
    }
}

/// Outcome of one cycle, alongside the (possibly unchanged) snapshot held
/// in the context.
#[derive(Debug)]
pub struct CycleReport {
    pub status: FetchStatus,
    pub level: WarningLevel,
    pub event: Option<NotificationEvent>,
}

/// All cross-cycle state, threaded explicitly through each cycle instead of
/// living in ambient globals.
pub struct CycleContext<T: Transport = HttpTransport> {
    fetcher: BulletinFetcher<T>,
    parser: BulletinParser,
    machine: WarningStateMachine,
    target: String,
    offset: FixedOffset,
    /// Last good snapshot; survives fetch failures (stale beats blank)
    pub snapshot: WarningSnapshot,
}

impl CycleContext<HttpTransport> {
    pub fn new(config: &Config) -> Result<Self> {
        let client = http::create_client(&config.monitor)?;
        Self::with_transport(config, HttpTransport::new(client))
    }
}

impl<T: Transport> CycleContext<T> {
    /// Build a context over a custom transport (used by tests).
    pub fn with_transport(config: &Config, transport: T) -> Result<Self> {
        let offset = FixedOffset::east_opt(config.monitor.utc_offset_hours * 3600)
            .ok_or_else(|| AppError::config("utc_offset_hours out of range"))?;

        Ok(Self {
            fetcher: BulletinFetcher::new(config.endpoints.clone(), transport),
            parser: BulletinParser::new(&config.monitor.zone_label)?,
            machine: WarningStateMachine::new(),
            target: config.monitor.target_url.clone(),
            snapshot: WarningSnapshot::connecting(Utc::now().with_timezone(&offset)),
            offset,
        })
    }

    /// Wall-clock time in the monitored zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Run one pipeline cycle.
///
/// A successful fetch replaces the snapshot wholesale. Total fetch failure
/// leaves the snapshot untouched and downgrades to a status message; the
/// only exception is the initial connecting placeholder, which is swapped
/// for a longer retrying message so the operator sees progress.
pub async fn run_cycle<T: Transport>(ctx: &mut CycleContext<T>) -> CycleReport {
    match ctx.fetcher.fetch(&ctx.target).await {
        Ok(bulletin) => {
            for failure in &bulletin.failures {
                log::warn!("Jalur {} gagal: {}", failure.endpoint, failure.reason);
            }

            let snapshot = ctx.parser.parse(&bulletin.body, ctx.now());
            let (level, event) = ctx.machine.observe(&snapshot.areas);
            ctx.snapshot = snapshot;

            CycleReport {
                status: FetchStatus::Connected {
                    endpoint: bulletin.endpoint,
                },
                level,
                event,
            }
        }
        Err(error) => {
            log::error!("{error}");
            if ctx.snapshot.summary == messages::CONNECTING {
                ctx.snapshot.summary = messages::DEGRADED.to_string();
            }

            CycleReport {
                status: FetchStatus::Failed,
                level: ctx.machine.previous(),
                event: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationEvent;
    use crate::services::fetch::testing::StubTransport;
    use crate::services::fetch::TransportResponse;

    const BULLETIN: &str = r#"<p class="prose">pada pkl 08:00 WIB berpotensi terjadi hujan lebat di
        <strong>Kabupaten Sintang</strong>: Sintang, Dedai.</p>"#;

    type StubResponse = std::result::Result<TransportResponse, String>;

    fn ctx_with(responses: impl IntoIterator<Item = StubResponse>) -> CycleContext<StubTransport> {
        // Default config has three endpoints; the stub answers in call order.
        CycleContext::with_transport(&Config::default(), StubTransport::new(responses)).unwrap()
    }

    fn ok(status: u16, body: &str) -> StubResponse {
        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn status_display_lines() {
        let connected = FetchStatus::Connected {
            endpoint: "CodeTabs".to_string(),
        };
        assert_eq!(connected.to_string(), "Data Terhubung via CodeTabs");
        assert_eq!(FetchStatus::Failed.to_string(), "Gagal Koneksi Server");
    }

    #[tokio::test]
    async fn successful_cycle_replaces_snapshot_and_fires_onset() {
        let mut ctx = ctx_with([ok(200, BULLETIN)]);
        assert_eq!(ctx.snapshot.summary, messages::CONNECTING);

        let report = run_cycle(&mut ctx).await;

        assert_eq!(
            report.status,
            FetchStatus::Connected {
                endpoint: "CodeTabs".to_string()
            }
        );
        assert_eq!(report.level, WarningLevel::Active);
        assert_eq!(report.event, Some(NotificationEvent::Onset));
        assert_eq!(ctx.snapshot.time, "08:00 WIB");
    }

    #[tokio::test]
    async fn total_failure_swaps_connecting_placeholder_only() {
        let failures = || {
            [
                Err("timeout".to_string()),
                Err("timeout".to_string()),
                Err("timeout".to_string()),
            ]
        };

        let mut ctx = ctx_with(failures());
        let report = run_cycle(&mut ctx).await;

        assert_eq!(report.status, FetchStatus::Failed);
        assert_eq!(report.event, None);
        assert_eq!(ctx.snapshot.summary, messages::DEGRADED);

        // A later failure must not clear an established snapshot
        let mut ctx = ctx_with(
            [ok(200, BULLETIN)]
                .into_iter()
                .chain(failures()),
        );
        run_cycle(&mut ctx).await;
        let before = ctx.snapshot.clone();

        let report = run_cycle(&mut ctx).await;
        assert_eq!(report.status, FetchStatus::Failed);
        assert_eq!(ctx.snapshot, before);
        assert_eq!(report.level, WarningLevel::Active);
    }
}

// src/services/fetch.rs

//! Proxy failover fetcher.
//!
//! Fetches the bulletin through an ordered list of proxy endpoints,
//! stopping at the first success. Endpoints are tried sequentially; the
//! ordered failure log is part of the contract, so no racing.

use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{EndpointInfo, Envelope};

/// Why one endpoint attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Non-2xx HTTP status
    Status(u16),
    /// Payload was empty or whitespace-only
    Empty,
    /// JSON envelope could not be decoded
    Envelope,
    /// Transport call itself errored
    Error,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(code) => write!(f, "{code}"),
            FailureReason::Empty => write!(f, "Empty"),
            FailureReason::Envelope => write!(f, "Envelope"),
            FailureReason::Error => write!(f, "Error"),
        }
    }
}

/// One entry of the per-cycle failure log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub reason: FailureReason,
}

/// Ordered failure log, one entry per attempted endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureLog(pub Vec<EndpointFailure>);

impl fmt::Display for FailureLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.0 {
            write!(f, "[{}: {}] ", failure.endpoint, failure.reason)?;
        }
        Ok(())
    }
}

/// First successful payload of a cycle, with the failures that preceded it.
#[derive(Debug, Clone)]
pub struct FetchedBulletin {
    /// Endpoint that delivered the payload
    pub endpoint: String,
    /// Unwrapped bulletin markup
    pub body: String,
    /// Endpoints that failed before this one, in configured order
    pub failures: Vec<EndpointFailure>,
}

/// Transport seam over the HTTP client, so failover order and the error log
/// are testable without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and return the status code with the body text. `Err` is
    /// reserved for transport-level failures (connect, timeout).
    async fn get(&self, url: &str) -> std::result::Result<TransportResponse, String>;
}

/// Raw transport response before envelope interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// [`Transport`] backed by a configured [`reqwest::Client`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> std::result::Result<TransportResponse, String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;
        Ok(TransportResponse { status, body })
    }
}

/// Fetcher iterating the configured endpoints strictly in list order.
pub struct BulletinFetcher<T: Transport> {
    endpoints: Vec<EndpointInfo>,
    transport: T,
}

impl<T: Transport> BulletinFetcher<T> {
    pub fn new(endpoints: Vec<EndpointInfo>, transport: T) -> Self {
        Self {
            endpoints,
            transport,
        }
    }

    /// Fetch the bulletin, trying each endpoint until one yields a non-empty
    /// payload. Returns [`AppError::AllEndpointsFailed`] with the ordered
    /// failure log when every endpoint fails.
    pub async fn fetch(&self, target: &str) -> Result<FetchedBulletin> {
        let mut failures = Vec::new();

        for endpoint in &self.endpoints {
            log::info!("Mencoba jalur {}...", endpoint.id);

            let url = match proxied_url(endpoint, target) {
                Ok(url) => url,
                Err(error) => {
                    log::warn!("Jalur {} URL tidak valid: {}", endpoint.id, error);
                    failures.push(EndpointFailure {
                        endpoint: endpoint.id.clone(),
                        reason: FailureReason::Error,
                    });
                    continue;
                }
            };

            let response = match self.transport.get(&url).await {
                Ok(response) => response,
                Err(error) => {
                    log::warn!("Jalur {} gagal: {}", endpoint.id, error);
                    failures.push(EndpointFailure {
                        endpoint: endpoint.id.clone(),
                        reason: FailureReason::Error,
                    });
                    continue;
                }
            };

            if !(200..300).contains(&response.status) {
                failures.push(EndpointFailure {
                    endpoint: endpoint.id.clone(),
                    reason: FailureReason::Status(response.status),
                });
                continue;
            }

            let payload = match endpoint.envelope {
                Envelope::RawText => response.body,
                Envelope::JsonWrapped => match unwrap_contents(&response.body) {
                    Some(contents) => contents,
                    None => {
                        failures.push(EndpointFailure {
                            endpoint: endpoint.id.clone(),
                            reason: FailureReason::Envelope,
                        });
                        continue;
                    }
                },
            };

            if payload.trim().is_empty() {
                failures.push(EndpointFailure {
                    endpoint: endpoint.id.clone(),
                    reason: FailureReason::Empty,
                });
                continue;
            }

            return Ok(FetchedBulletin {
                endpoint: endpoint.id.clone(),
                body: payload,
                failures,
            });
        }

        Err(AppError::AllEndpointsFailed(FailureLog(failures)))
    }
}

/// Build the proxied URL with the target percent-encoded into the endpoint's
/// query parameter.
fn proxied_url(endpoint: &EndpointInfo, target: &str) -> Result<String> {
    let mut url = Url::parse(&endpoint.base)?;
    url.query_pairs_mut().append_pair(&endpoint.param, target);
    Ok(url.to_string())
}

/// Extract the `contents` field of a JSON-wrapped proxy response.
fn unwrap_contents(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("contents")?.as_str().map(str::to_string)
}

/// Scripted transport for tests, shared with the pipeline tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    pub(crate) struct StubTransport {
        responses: Mutex<VecDeque<std::result::Result<TransportResponse, String>>>,
    }

    impl StubTransport {
        pub(crate) fn new(
            responses: impl IntoIterator<Item = std::result::Result<TransportResponse, String>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, _url: &str) -> std::result::Result<TransportResponse, String> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra request")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubTransport;
    use super::*;

    fn endpoint(id: &str, envelope: Envelope) -> EndpointInfo {
        EndpointInfo {
            id: id.to_string(),
            base: format!("https://proxy.example/{}", id.to_lowercase()),
            param: "url".to_string(),
            envelope,
        }
    }

    fn ok(status: u16, body: &str) -> std::result::Result<TransportResponse, String> {
        Ok(TransportResponse {
            status,
            body: body.to_string(),
        })
    }

    const TARGET: &str = "https://www.bmkg.go.id/cuaca/peringatan-dini-cuaca/61";

    #[tokio::test]
    async fn first_success_wins_and_records_prior_failures() {
        let fetcher = BulletinFetcher::new(
            vec![
                endpoint("A", Envelope::RawText),
                endpoint("B", Envelope::RawText),
            ],
            StubTransport::new([ok(403, "forbidden"), ok(200, "<html>bulletin</html>")]),
        );

        let bulletin = fetcher.fetch(TARGET).await.unwrap();
        assert_eq!(bulletin.endpoint, "B");
        assert_eq!(bulletin.body, "<html>bulletin</html>");
        assert_eq!(
            bulletin.failures,
            [EndpointFailure {
                endpoint: "A".to_string(),
                reason: FailureReason::Status(403),
            }]
        );
    }

    #[tokio::test]
    async fn all_failures_are_logged_in_configured_order() {
        let fetcher = BulletinFetcher::new(
            vec![
                endpoint("A", Envelope::RawText),
                endpoint("B", Envelope::JsonWrapped),
                endpoint("C", Envelope::RawText),
            ],
            StubTransport::new([
                Err("connection refused".to_string()),
                ok(200, "not json"),
                ok(200, "   \n "),
            ]),
        );

        let error = fetcher.fetch(TARGET).await.unwrap_err();
        let AppError::AllEndpointsFailed(log) = error else {
            panic!("expected AllEndpointsFailed, got {error:?}");
        };

        let entries: Vec<(&str, &FailureReason)> = log
            .0
            .iter()
            .map(|f| (f.endpoint.as_str(), &f.reason))
            .collect();
        assert_eq!(
            entries,
            [
                ("A", &FailureReason::Error),
                ("B", &FailureReason::Envelope),
                ("C", &FailureReason::Empty),
            ]
        );
        assert_eq!(log.to_string(), "[A: Error] [B: Envelope] [C: Empty] ");
    }

    #[tokio::test]
    async fn json_envelope_is_unwrapped() {
        let fetcher = BulletinFetcher::new(
            vec![endpoint("AllOriginsJson", Envelope::JsonWrapped)],
            StubTransport::new([ok(200, r#"{"contents": "<p class=\"prose\">isi</p>"}"#)]),
        );

        let bulletin = fetcher.fetch(TARGET).await.unwrap();
        assert_eq!(bulletin.body, r#"<p class="prose">isi</p>"#);
        assert!(bulletin.failures.is_empty());
    }

    #[tokio::test]
    async fn empty_unwrapped_contents_is_an_empty_failure() {
        let fetcher = BulletinFetcher::new(
            vec![endpoint("A", Envelope::JsonWrapped)],
            StubTransport::new([ok(200, r#"{"contents": ""}"#)]),
        );

        let error = fetcher.fetch(TARGET).await.unwrap_err();
        let AppError::AllEndpointsFailed(log) = error else {
            panic!("expected AllEndpointsFailed");
        };
        assert_eq!(log.0[0].reason, FailureReason::Empty);
    }

    #[test]
    fn proxied_url_percent_encodes_target() {
        let url = proxied_url(&endpoint("A", Envelope::RawText), TARGET).unwrap();
        assert_eq!(
            url,
            "https://proxy.example/a?url=https%3A%2F%2Fwww.bmkg.go.id%2Fcuaca%2Fperingatan-dini-cuaca%2F61"
        );
    }
}

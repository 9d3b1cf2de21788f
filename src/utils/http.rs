// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::MonitorConfig;

/// Create a configured asynchronous HTTP client.
///
/// Referrer propagation is disabled; some proxies reject requests carrying
/// one, and the bulletin source does not need it.
pub fn create_client(config: &MonitorConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .referer(false)
        .build()?;
    Ok(client)
}

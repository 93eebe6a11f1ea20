use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{config::ProviderConfig, model::RawObservation};

use super::{MetarProvider, StationId};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Client for the aviationweather.gov data API (`/api/data/metar`).
#[derive(Debug, Clone)]
pub struct AviationWeatherProvider {
    base_url: String,
    hours: f64,
    max_retries: u32,
    http: Client,
}

impl AviationWeatherProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("metar-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            hours: config.hours,
            max_retries: config.max_retries,
            http,
        })
    }

    fn metar_url(&self) -> String {
        format!("{}/api/data/metar", self.base_url)
    }

    /// GET the METAR JSON for one station, retrying transport failures and 5xx.
    async fn fetch_body(&self, station: &StationId) -> Result<String> {
        let url = self.metar_url();
        let hours = self.hours.to_string();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(%station, attempt, %url, "requesting METAR");

            let sent = self
                .http
                .get(&url)
                .query(&[
                    ("ids", station.as_str()),
                    ("format", "json"),
                    ("taf", "false"),
                    ("hours", hours.as_str()),
                ])
                .send()
                .await;

            let err = match sent {
                Ok(res) => {
                    let status = res.status();
                    let body = res
                        .text()
                        .await
                        .context("Failed to read aviationweather.gov response body")?;

                    if status.is_success() {
                        return Ok(body);
                    }

                    let err = anyhow!(
                        "aviationweather.gov request failed with status {}: {}",
                        status,
                        truncate_body(&body),
                    );
                    if !status.is_server_error() {
                        return Err(err);
                    }
                    err
                }
                Err(e) => anyhow::Error::new(e).context("Failed to send request to aviationweather.gov"),
            };

            if attempt > self.max_retries {
                return Err(err);
            }

            warn!(%station, attempt, error = %err, "METAR request failed, retrying");
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        }
    }
}

#[async_trait]
impl MetarProvider for AviationWeatherProvider {
    async fn latest(&self, station: &StationId) -> Result<RawObservation> {
        let body = self.fetch_body(station).await?;
        parse_response(station, &body)
    }
}

/// The API answers with a JSON array, newest report first. Unknown stations yield an
/// empty array (or an empty body).
///
/// Only the newest report is decoded; older ones in the lookback window may be malformed
/// without affecting it.
fn parse_response(station: &StationId, body: &str) -> Result<RawObservation> {
    let not_found = || anyhow!("Airport '{station}' not found or reported no METAR");

    if body.trim().is_empty() {
        return Err(not_found());
    }

    let reports: Vec<serde_json::Value> =
        serde_json::from_str(body).context("Failed to parse aviationweather.gov METAR JSON")?;
    let newest = reports.into_iter().next().ok_or_else(not_found)?;

    serde_json::from_value(newest)
        .with_context(|| format!("Failed to parse latest METAR report for {station}"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

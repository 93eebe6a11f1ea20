use crate::{
    Config, DecodedSnapshot, RawObservation, normalize,
    provider::aviationweather::AviationWeatherProvider,
};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

pub mod aviationweather;

/// ICAO station identifier, e.g. `KSLC`. Always stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for StationId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let valid = (3..=4).contains(&trimmed.len())
            && trimmed.chars().all(|c| c.is_ascii_alphanumeric());

        if !valid {
            return Err(anyhow::anyhow!(
                "Invalid station id '{value}'. Expected a 3-4 character ICAO code such as KSLC."
            ));
        }

        Ok(StationId(trimmed.to_ascii_uppercase()))
    }
}

/// Source of raw observations. Implementations own retries and timeouts.
#[async_trait]
pub trait MetarProvider: Send + Sync + Debug {
    async fn latest(&self, station: &StationId) -> anyhow::Result<RawObservation>;
}

/// Construct the configured provider.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn MetarProvider>> {
    let provider = AviationWeatherProvider::new(&config.provider)?;
    Ok(Box::new(provider))
}

/// Fetch the latest report for `station` and decode it.
pub async fn decode_latest(
    provider: &dyn MetarProvider,
    station: &StationId,
) -> anyhow::Result<(RawObservation, DecodedSnapshot)> {
    let raw = provider.latest(station).await?;
    let snapshot =
        normalize(&raw).with_context(|| format!("Failed to decode METAR for {station}"))?;

    info!(%station, category = %snapshot.flight_category, "decoded observation");
    Ok((raw, snapshot))
}

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use inquire::Text;
use metar_core::{
    Config, DecodedSnapshot, MetarProvider, StationId, decode_clouds, decode_latest,
    decode_weather, derive, provider_from_config,
};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::{render, sky};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "metar", version, about = "Decode aviation weather reports (METAR)")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set, e.g. "info" or "metar_core=debug".
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and decode the latest METAR for one or more stations.
    Show {
        /// ICAO station ids; the configured default stations are used when omitted.
        stations: Vec<String>,

        /// Print decoded snapshots as JSON.
        #[arg(long)]
        json: bool,

        /// Keep refreshing every SECS seconds until interrupted with Ctrl-C.
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        watch: Option<u64>,
    },

    /// Decode a present-weather group such as "+SHRA" or "VCFG".
    DecodeWeather {
        #[arg(allow_hyphen_values = true)]
        code: String,
    },

    /// Decode sky-cover groups such as "FEW080 BKN250".
    DecodeClouds {
        #[arg(required = true)]
        layers: Vec<String>,
    },

    /// Compute altimeter, pressure altitude and density altitude.
    Altitude {
        /// Outside air temperature, °C.
        #[arg(long, allow_hyphen_values = true)]
        temp: f64,

        /// Altimeter setting, hPa.
        #[arg(long)]
        pressure: f64,

        /// Field elevation, meters.
        #[arg(long, allow_hyphen_values = true)]
        elevation: f64,
    },

    /// Interactively set default stations and the data API URL.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { stations, json, watch } => show(&stations, json, watch).await?,
            Command::DecodeWeather { code } => println!("{}", decode_weather(&code)),
            Command::DecodeClouds { layers } => {
                let layers = layers.iter().map(|l| sky::parse_layer(l)).collect::<Result<Vec<_>>>()?;
                println!("{}", decode_clouds(&layers));
            }
            Command::Altitude { temp, pressure, elevation } => {
                println!("{}", render::metrics(&derive(temp, pressure, elevation)));
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn parse_stations<'a>(items: impl IntoIterator<Item = &'a str>) -> Result<Vec<StationId>> {
    items.into_iter().map(StationId::try_from).collect()
}

async fn show(stations: &[String], json: bool, watch: Option<u64>) -> Result<()> {
    let config = Config::load()?;
    let ids = if stations.is_empty() {
        config.default_stations()?
    } else {
        parse_stations(stations.iter().map(String::as_str))?
    };

    let provider = provider_from_config(&config)?;

    let Some(secs) = watch else {
        return show_once(provider.as_ref(), &ids, json).await;
    };

    let mut ticker = interval(Duration::from_secs(secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A refresh where every station fails is reported, not fatal.
                if let Err(err) = show_once(provider.as_ref(), &ids, json).await {
                    eprintln!("{err:#}");
                }
            }
            _ = &mut ctrl_c => {
                info!("watch interrupted");
                return Ok(());
            }
        }
    }
}

async fn show_once(provider: &dyn MetarProvider, ids: &[StationId], json: bool) -> Result<()> {
    let mut decoded: Vec<DecodedSnapshot> = Vec::with_capacity(ids.len());
    let mut failures = 0usize;

    for id in ids {
        match decode_latest(provider, id).await {
            Ok((raw, snapshot)) => {
                if !json {
                    println!("{}\n", render::snapshot(&snapshot, raw.raw_text.as_deref()));
                }
                decoded.push(snapshot);
            }
            Err(err) => {
                failures += 1;
                eprintln!("{id}: {err:#}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    }

    debug!(decoded = decoded.len(), failures, "show finished");

    if decoded.is_empty() && failures > 0 {
        return Err(anyhow!("No observations could be decoded"));
    }
    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let current = config.default_stations.join(" ");
    let answer = Text::new("Default stations (space separated ICAO ids):")
        .with_default(&current)
        .prompt()?;
    let ids = parse_stations(answer.split_whitespace())?;

    config.default_stations.clear();
    for id in &ids {
        config.add_station(id);
    }

    let current_url = config.provider.base_url.clone();
    let url = Text::new("Data API base URL:").with_default(&current_url).prompt()?;
    config.set_base_url(&url)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_stations() {
        let cli = Cli::try_parse_from(["metar", "show", "kslc", "KTVY", "--json"]).unwrap();
        match cli.command {
            Command::Show { stations, json, watch } => {
                assert_eq!(stations, ["kslc", "KTVY"]);
                assert!(json);
                assert_eq!(watch, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn watch_interval_must_be_positive() {
        let cli = Cli::try_parse_from(["metar", "show", "--watch", "5"]).unwrap();
        assert!(matches!(cli.command, Command::Show { watch: Some(5), .. }));

        assert!(Cli::try_parse_from(["metar", "show", "--watch", "0"]).is_err());
    }

    #[test]
    fn weather_code_may_start_with_minus() {
        let cli = Cli::try_parse_from(["metar", "decode-weather", "-DZ"]).unwrap();
        assert!(matches!(cli.command, Command::DecodeWeather { code } if code == "-DZ"));
    }

    #[test]
    fn altitude_accepts_negative_temperature() {
        let cli = Cli::try_parse_from([
            "metar", "altitude", "--temp", "-10", "--pressure", "1030", "--elevation", "100",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Altitude { temp, pressure, elevation }
                if temp == -10.0 && pressure == 1030.0 && elevation == 100.0
        ));
    }

    #[test]
    fn decode_clouds_requires_a_layer() {
        assert!(Cli::try_parse_from(["metar", "decode-clouds"]).is_err());
    }

    #[test]
    fn station_list_is_validated() {
        let ids = parse_stations(["kslc", "u42"]).unwrap();
        assert_eq!(ids[0].as_str(), "KSLC");
        assert!(parse_stations(["KSLC", "nope!"]).is_err());
    }
}

use chrono::DateTime;

use crate::{
    clouds::{NO_CLOUD_DATA, decode_clouds},
    error::{DecodeError, DecodeResult},
    metrics::{celsius_to_fahrenheit, derive},
    model::{DecodedSnapshot, RawObservation},
    weather::decode_weather,
};

pub const NO_SIGNIFICANT_WEATHER: &str = "No significant weather";

const OBSERVATION_TIME_FORMAT: &str = "%B %d, %Y %H:%M UTC";

/// Build a [`DecodedSnapshot`] from one raw station report.
///
/// Temperature, dewpoint, altimeter and elevation are mandatory; the first one found
/// missing (in that order) is reported.
pub fn normalize(raw: &RawObservation) -> DecodeResult<DecodedSnapshot> {
    let temperature_c = required(raw.temperature_c, "temp")?;
    let dewpoint_c = required(raw.dewpoint_c, "dewp")?;
    let altimeter_hpa = required(raw.altimeter_hpa, "altim")?;
    let elevation_m = required(raw.elevation_m, "elev")?;

    let observation_time = format_observation_time(raw.observation_time)?;
    let derived = derive(temperature_c, altimeter_hpa, elevation_m);

    let clouds = match raw.clouds.as_deref() {
        Some(layers) => decode_clouds(layers),
        None => NO_CLOUD_DATA.to_string(),
    };

    let weather = match raw.weather.as_deref() {
        Some(code) => decode_weather(code),
        None => NO_SIGNIFICANT_WEATHER.to_string(),
    };

    Ok(DecodedSnapshot {
        airport: raw.station_id.clone(),
        observation_time,
        temperature: celsius_to_fahrenheit(temperature_c),
        dewpoint: celsius_to_fahrenheit(dewpoint_c),
        altimeter: derived.altimeter_inhg,
        pressure_altitude: derived.pressure_altitude_ft,
        density_altitude: derived.density_altitude_ft,
        wind_speed: raw.wind_speed_kts,
        wind_direction: raw.wind_direction,
        wind_gust: raw.wind_gust_kts.unwrap_or(0.0),
        visibility: raw.visibility_sm,
        clouds,
        weather,
        flight_category: raw.flight_category.clone(),
    })
}

/// Format epoch seconds as e.g. `"June 15, 2024 16:00 UTC"`.
pub fn format_observation_time(epoch_secs: i64) -> DecodeResult<String> {
    let dt = DateTime::from_timestamp(epoch_secs, 0)
        .ok_or(DecodeError::InvalidTimestamp(epoch_secs))?;

    Ok(dt.format(OBSERVATION_TIME_FORMAT).to_string())
}

fn required(value: Option<f64>, field: &'static str) -> DecodeResult<f64> {
    value.ok_or(DecodeError::MissingField { field })
}

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One station report as published by the aviationweather.gov JSON API.
///
/// Temperature, dewpoint, altimeter and elevation are kept optional here so that a
/// report with gaps still deserializes; `normalize` rejects it instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "icaoId")]
    pub station_id: String,

    /// Seconds since the Unix epoch, UTC.
    #[serde(rename = "obsTime")]
    pub observation_time: i64,

    #[serde(rename = "temp", default)]
    pub temperature_c: Option<f64>,

    #[serde(rename = "dewp", default)]
    pub dewpoint_c: Option<f64>,

    /// Altimeter setting in hectopascals.
    #[serde(rename = "altim", default)]
    pub altimeter_hpa: Option<f64>,

    #[serde(rename = "elev", default)]
    pub elevation_m: Option<f64>,

    #[serde(rename = "wspd", default, deserialize_with = "null_as_default")]
    pub wind_speed_kts: f64,

    #[serde(rename = "wdir", default, deserialize_with = "null_as_default")]
    pub wind_direction: WindDirection,

    #[serde(rename = "wgst", default)]
    pub wind_gust_kts: Option<f64>,

    #[serde(rename = "visib", default, deserialize_with = "de_visibility")]
    pub visibility_sm: f64,

    #[serde(rename = "fltCat", default, deserialize_with = "null_as_default")]
    pub flight_category: String,

    #[serde(default)]
    pub clouds: Option<Vec<CloudLayer>>,

    #[serde(rename = "wxString", default)]
    pub weather: Option<String>,

    #[serde(rename = "rawOb", default)]
    pub raw_text: Option<String>,
}

/// A single reported sky layer. Heights are in feet above ground level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub cover: Coverage,
    #[serde(default)]
    pub base: Option<u32>,
    #[serde(default)]
    pub top: Option<u32>,
}

impl CloudLayer {
    pub fn new(cover: Coverage, base: Option<u32>) -> Self {
        Self { cover, base, top: None }
    }
}

/// Sky coverage code. Codes outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Coverage {
    Clr,
    Cavok,
    Few,
    Sct,
    Bkn,
    Ovc,
    Ovx,
    Other(String),
}

impl Coverage {
    pub fn as_code(&self) -> &str {
        match self {
            Coverage::Clr => "CLR",
            Coverage::Cavok => "CAVOK",
            Coverage::Few => "FEW",
            Coverage::Sct => "SCT",
            Coverage::Bkn => "BKN",
            Coverage::Ovc => "OVC",
            Coverage::Ovx => "OVX",
            Coverage::Other(code) => code,
        }
    }

    /// CLR and CAVOK describe the whole sky, not a layer.
    pub fn is_clear(&self) -> bool {
        matches!(self, Coverage::Clr | Coverage::Cavok)
    }
}

impl From<&str> for Coverage {
    fn from(value: &str) -> Self {
        match value {
            "CLR" => Coverage::Clr,
            "CAVOK" => Coverage::Cavok,
            "FEW" => Coverage::Few,
            "SCT" => Coverage::Sct,
            "BKN" => Coverage::Bkn,
            "OVC" => Coverage::Ovc,
            "OVX" => Coverage::Ovx,
            other => Coverage::Other(other.to_string()),
        }
    }
}

impl From<String> for Coverage {
    fn from(value: String) -> Self {
        match Coverage::from(value.as_str()) {
            Coverage::Other(_) => Coverage::Other(value),
            known => known,
        }
    }
}

impl From<Coverage> for String {
    fn from(value: Coverage) -> Self {
        match value {
            Coverage::Other(code) => code,
            known => known.as_code().to_string(),
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Wind direction in degrees true, or variable (`VRB` in the feed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindDirectionRepr", into = "WindDirectionRepr")]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

impl Default for WindDirection {
    fn default() -> Self {
        WindDirection::Degrees(0)
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindDirection::Degrees(deg) => write!(f, "{deg}°"),
            WindDirection::Variable => f.write_str("variable"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WindDirectionRepr {
    Degrees(f64),
    Text(String),
}

impl TryFrom<WindDirectionRepr> for WindDirection {
    type Error = String;

    fn try_from(value: WindDirectionRepr) -> Result<Self, Self::Error> {
        match value {
            WindDirectionRepr::Degrees(deg) if (0.0..=360.0).contains(&deg) => {
                Ok(WindDirection::Degrees(deg.round() as u16))
            }
            WindDirectionRepr::Degrees(deg) => Err(format!("wind direction {deg} is outside 0-360")),
            WindDirectionRepr::Text(text) if text.eq_ignore_ascii_case("VRB") => {
                Ok(WindDirection::Variable)
            }
            WindDirectionRepr::Text(text) => Err(format!("unrecognized wind direction '{text}'")),
        }
    }
}

impl From<WindDirection> for WindDirectionRepr {
    fn from(value: WindDirection) -> Self {
        match value {
            WindDirection::Degrees(deg) => WindDirectionRepr::Degrees(f64::from(deg)),
            WindDirection::Variable => WindDirectionRepr::Text("VRB".to_string()),
        }
    }
}

/// The feed sends `null` for fields a station did not report; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Visibility arrives either as a number or as text such as `"10+"`, or as `null`.
fn de_visibility<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .trim_end_matches('+')
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid visibility '{text}'"))),
    }
}

/// Fully decoded observation, ready for display.
///
/// Field names serialize to the same camelCase keys the web front-end consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedSnapshot {
    pub airport: String,
    pub observation_time: String,
    /// Degrees Fahrenheit.
    pub temperature: i64,
    /// Degrees Fahrenheit.
    pub dewpoint: i64,
    /// Inches of mercury.
    pub altimeter: f64,
    pub pressure_altitude: i64,
    pub density_altitude: i64,
    pub wind_speed: f64,
    pub wind_direction: WindDirection,
    pub wind_gust: f64,
    pub visibility: f64,
    pub clouds: String,
    pub weather: String,
    pub flight_category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const KSLC: &str = r#"{
        "icaoId": "KSLC",
        "obsTime": 1718467200,
        "temp": 20.0,
        "dewp": 5.0,
        "altim": 1013.0,
        "elev": 1288,
        "wdir": 320,
        "wspd": 12,
        "wgst": 20,
        "visib": "10+",
        "fltCat": "VFR",
        "clouds": [{"cover": "FEW", "base": 8000}, {"cover": "BKN", "base": 25000}],
        "rawOb": "METAR KSLC 151600Z 32012G20KT 10SM FEW080 BKN250 20/05 A2991"
    }"#;

    #[test]
    fn parses_aviationweather_json() {
        let obs: RawObservation = serde_json::from_str(KSLC).expect("fixture should parse");

        assert_eq!(obs.station_id, "KSLC");
        assert_eq!(obs.temperature_c, Some(20.0));
        assert_eq!(obs.elevation_m, Some(1288.0));
        assert_eq!(obs.wind_direction, WindDirection::Degrees(320));
        assert_eq!(obs.wind_gust_kts, Some(20.0));
        assert_eq!(obs.visibility_sm, 10.0);
        assert_eq!(obs.weather, None);

        let clouds = obs.clouds.expect("clouds present");
        assert_eq!(clouds[0], CloudLayer::new(Coverage::Few, Some(8000)));
        assert_eq!(clouds[1].cover, Coverage::Bkn);
    }

    #[test]
    fn variable_wind_and_missing_fields() {
        let json = r#"{"icaoId": "KU42", "obsTime": 0, "wdir": "VRB", "visib": 6.0}"#;
        let obs: RawObservation = serde_json::from_str(json).expect("should parse");

        assert_eq!(obs.wind_direction, WindDirection::Variable);
        assert_eq!(obs.temperature_c, None);
        assert_eq!(obs.wind_speed_kts, 0.0);
        assert_eq!(obs.flight_category, "");
        assert!(obs.clouds.is_none());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let json = r#"{
            "icaoId": "KU42",
            "obsTime": 0,
            "temp": null,
            "wdir": null,
            "wspd": null,
            "wgst": null,
            "visib": null,
            "fltCat": null,
            "clouds": null,
            "wxString": null
        }"#;
        let obs: RawObservation = serde_json::from_str(json).expect("nulls should parse");

        assert_eq!(obs.temperature_c, None);
        assert_eq!(obs.wind_direction, WindDirection::Degrees(0));
        assert_eq!(obs.wind_speed_kts, 0.0);
        assert_eq!(obs.wind_gust_kts, None);
        assert_eq!(obs.visibility_sm, 0.0);
        assert_eq!(obs.flight_category, "");
        assert!(obs.clouds.is_none());
        assert!(obs.weather.is_none());
    }

    #[test]
    fn rejects_out_of_range_wind_direction() {
        let json = r#"{"icaoId": "KU42", "obsTime": 0, "wdir": 400}"#;
        assert!(serde_json::from_str::<RawObservation>(json).is_err());
    }

    #[test]
    fn unknown_coverage_kept_verbatim() {
        let layer: CloudLayer = serde_json::from_str(r#"{"cover": "VV", "base": 200}"#).unwrap();
        assert_eq!(layer.cover, Coverage::Other("VV".to_string()));
        assert_eq!(layer.cover.to_string(), "VV");
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = DecodedSnapshot {
            airport: "KSLC".into(),
            observation_time: "June 15, 2024 16:00 UTC".into(),
            temperature: 68,
            dewpoint: 41,
            altimeter: 29.91,
            pressure_altitude: 4236,
            density_altitude: 5850,
            wind_speed: 12.0,
            wind_direction: WindDirection::Variable,
            wind_gust: 0.0,
            visibility: 10.0,
            clouds: "Clear".into(),
            weather: "No significant weather".into(),
            flight_category: "VFR".into(),
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["pressureAltitude"], 4236);
        assert_eq!(value["windDirection"], "VRB");
        assert_eq!(value["flightCategory"], "VFR");
    }
}

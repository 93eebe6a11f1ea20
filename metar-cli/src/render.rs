use metar_core::{DecodedSnapshot, DerivedMetrics, WindDirection};
use std::fmt;

/// Multi-line text block for one decoded station.
pub fn snapshot(s: &DecodedSnapshot, raw_text: Option<&str>) -> String {
    SnapshotView { snapshot: s, raw_text }.to_string()
}

pub fn metrics(m: &DerivedMetrics) -> String {
    format!(
        "Altimeter:         {:.2} inHg\nPressure altitude: {} ft\nDensity altitude:  {} ft",
        m.altimeter_inhg, m.pressure_altitude_ft, m.density_altitude_ft
    )
}

struct SnapshotView<'a> {
    snapshot: &'a DecodedSnapshot,
    raw_text: Option<&'a str>,
}

impl fmt::Display for SnapshotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;

        let category = if s.flight_category.is_empty() { "-" } else { s.flight_category.as_str() };
        writeln!(f, "{}  {}  [{}]", s.airport, s.observation_time, category)?;
        if let Some(raw) = self.raw_text {
            writeln!(f, "  {raw}")?;
        }

        writeln!(f, "  {:<19}{}°F (dewpoint {}°F)", "Temperature:", s.temperature, s.dewpoint)?;
        writeln!(f, "  {:<19}{}", "Wind:", Wind(s))?;
        writeln!(f, "  {:<19}{} SM", "Visibility:", s.visibility)?;
        writeln!(f, "  {:<19}{}", "Sky:", s.clouds)?;
        writeln!(f, "  {:<19}{}", "Weather:", s.weather)?;
        writeln!(f, "  {:<19}{:.2} inHg", "Altimeter:", s.altimeter)?;
        writeln!(f, "  {:<19}{} ft", "Pressure altitude:", s.pressure_altitude)?;
        write!(f, "  {:<19}{} ft", "Density altitude:", s.density_altitude)
    }
}

/// Wind summary, e.g. "320° at 12 kt, gusting 20 kt".
struct Wind<'a>(&'a DecodedSnapshot);

impl fmt::Display for Wind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        if s.wind_speed == 0.0 {
            return f.write_str("calm");
        }

        match s.wind_direction {
            WindDirection::Variable => write!(f, "variable at {} kt", s.wind_speed)?,
            dir => write!(f, "{dir} at {} kt", s.wind_speed)?,
        }
        if s.wind_gust > 0.0 {
            write!(f, ", gusting {} kt", s.wind_gust)?;
        }
        Ok(())
    }
}

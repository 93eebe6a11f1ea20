//! Standard-atmosphere approximations used for performance planning.
//!
//! Every intermediate value is rounded half-to-even before it feeds the next step,
//! so the outputs match the published reference values exactly.

const HPA_TO_INHG: f64 = 0.02953;
const METERS_TO_FEET: f64 = 3.28084;
const STANDARD_ALTIMETER_INHG: f64 = 29.92;

/// Altimeter and altitude figures derived from one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    pub altimeter_inhg: f64,
    pub pressure_altitude_ft: i64,
    pub density_altitude_ft: i64,
}

pub fn derive(temperature_c: f64, pressure_hpa: f64, elevation_m: f64) -> DerivedMetrics {
    let altimeter_inhg = round_to(pressure_hpa * HPA_TO_INHG, 2);
    let elevation_ft = round_even(elevation_m * METERS_TO_FEET);

    let pressure_altitude =
        round_even(elevation_ft + (STANDARD_ALTIMETER_INHG - altimeter_inhg) * 1000.0);

    // ISA lapse: 15 °C at sea level, minus 2 °C per thousand feet.
    let isa_temperature = 15.0 - (elevation_ft / 1000.0) * 2.0;
    let density_altitude = round_even(pressure_altitude + 120.0 * (temperature_c - isa_temperature));

    DerivedMetrics {
        altimeter_inhg,
        pressure_altitude_ft: pressure_altitude as i64,
        density_altitude_ft: density_altitude as i64,
    }
}

/// Celsius to whole degrees Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> i64 {
    round_even(celsius * 9.0 / 5.0 + 32.0) as i64
}

/// Round half to even, the way the reference calculations do.
pub fn round_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to `places` decimal places on the exact binary value of `value`.
///
/// Precision formatting works on the exact value and breaks true ties to even, so
/// `500.0 * 0.02953` (just above 14.765) becomes 14.77 where scaling by 100 first
/// would give 14.76.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // (temperature_c, pressure_hpa, elevation_m) -> (inHg, pressure alt, density alt)
    const FIXTURES: &[((f64, f64, f64), (f64, i64, i64))] = &[
        ((20.0, 1013.0, 1288.0), (29.91, 4236, 5850)),
        ((15.0, 1013.25, 0.0), (29.92, 0, 0)),
        ((-10.0, 1030.0, 100.0), (30.42, -172, -3093)),
        ((15.0, 500.0, 0.0), (14.77, 15150, 15150)),
        ((15.0, 7500.0, 0.0), (221.47, -191550, -191550)),
    ];

    #[test]
    fn reference_fixtures_match_exactly() {
        for &((temp, pressure, elevation), (inhg, pa, da)) in FIXTURES {
            let derived = derive(temp, pressure, elevation);
            assert_eq!(derived.altimeter_inhg, inhg, "altimeter for {pressure} hPa");
            assert_eq!(derived.pressure_altitude_ft, pa, "pressure altitude for {pressure} hPa");
            assert_eq!(derived.density_altitude_ft, da, "density altitude at {temp} C");
        }
    }

    #[test]
    fn hot_day_raises_density_altitude() {
        let standard = derive(15.0, 1013.25, 0.0);
        let hot = derive(35.0, 1013.25, 0.0);
        assert_eq!(hot.pressure_altitude_ft, standard.pressure_altitude_ft);
        assert_eq!(hot.density_altitude_ft, 2400);
    }

    #[test]
    fn fahrenheit_conversion_rounds_half_to_even() {
        assert_eq!(celsius_to_fahrenheit(20.0), 68);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40);
        assert_eq!(celsius_to_fahrenheit(2.5), 36);
        assert_eq!(celsius_to_fahrenheit(0.3), 33);
    }

    #[test]
    fn round_helpers() {
        assert_eq!(round_even(0.5), 0.0);
        assert_eq!(round_even(1.5), 2.0);
        assert_eq!(round_even(-2.5), -2.0);
        assert_eq!(round_to(29.91389, 2), 29.91);
        assert_eq!(round_to(500.0 * 0.02953, 2), 14.77);
        assert_eq!(round_to(7500.0 * 0.02953, 2), 221.47);
        assert_eq!(round_to(0.125, 2), 0.12);
    }

    #[test]
    fn derive_is_repeatable() {
        assert_eq!(derive(20.0, 1013.0, 1288.0), derive(20.0, 1013.0, 1288.0));
    }
}

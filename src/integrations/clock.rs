//! Clock source: civil time next to mean solar time at a location.

use chrono::{DateTime, Local, TimeDelta, Utc};

/// Seconds of solar time per degree of longitude (24h / 360°).
const SECONDS_PER_DEGREE: f64 = 240.0;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single clock value ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    civil: String,
    solar: String,
}

impl Reading {
    pub fn new(civil: impl Into<String>, solar: impl Into<String>) -> Self {
        Self {
            civil: civil.into(),
            solar: solar.into(),
        }
    }

    /// Display form: civil time on the first line, solar time below it.
    pub fn render(&self) -> String {
        format!("{}\nsolar {}", self.civil, self.solar)
    }
}

/// Produces readings for a place and instant.
///
/// Implementations must not fail: coordinates are validated when the
/// configuration is loaded, before any reading is requested.
pub trait ClockSource: Send + Sync + 'static {
    fn reading(&self, coords: Coordinates, at: DateTime<Utc>) -> Reading;
}

/// Local wall-clock time plus mean solar time derived from longitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarClock;

impl SolarClock {
    fn solar_time(coords: Coordinates, at: DateTime<Utc>) -> DateTime<Utc> {
        let offset = (coords.longitude * SECONDS_PER_DEGREE).round() as i64;
        at + TimeDelta::seconds(offset)
    }
}

impl ClockSource for SolarClock {
    fn reading(&self, coords: Coordinates, at: DateTime<Utc>) -> Reading {
        let civil = at.with_timezone(&Local).format("%H:%M:%S").to_string();
        let solar = Self::solar_time(coords, at).format("%H:%M:%S").to_string();
        Reading::new(civil, solar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn solar_time_matches_utc_on_prime_meridian() {
        let solar = SolarClock::solar_time(Coordinates::new(51.48, 0.0), noon_utc());
        assert_eq!(solar, noon_utc());
    }

    #[test]
    fn solar_time_shifts_four_minutes_per_degree() {
        let east = SolarClock::solar_time(Coordinates::new(0.0, 15.0), noon_utc());
        assert_eq!(east.format("%H:%M:%S").to_string(), "13:00:00");

        let brooklyn = SolarClock::solar_time(Coordinates::new(40.688265, -73.9184594), noon_utc());
        assert_eq!(brooklyn.format("%H:%M:%S").to_string(), "07:04:20");
    }

    #[test]
    fn reading_renders_two_lines() {
        let reading = SolarClock.reading(Coordinates::new(0.0, 0.0), noon_utc());
        let rendered = reading.render();

        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(rendered.lines().nth(1), Some("solar 12:00:00"));
    }
}

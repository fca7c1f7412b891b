//! Typed view of position telegrams

use crate::core::DecodedTelegram;

/// A GPS fix reported by a position telegram
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Heading in degrees
    pub heading: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Battery voltage as reported by the port
    pub battery: f64,
    pub in_trip: bool,
    /// The tracker could not get a fix; coordinates are stale
    pub fix_failed: bool,
    /// Only reported by condensed position telegrams
    pub man_down: Option<bool>,
}

impl Position {
    /// Extract the fix from a decoded `position` telegram
    pub fn from_telegram(decoded: &DecodedTelegram) -> Option<Self> {
        if decoded.message_type() != "position" {
            return None;
        }

        let flag = |name: &str| decoded.get_i64(name).map(|value| value != 0);

        Some(Position {
            latitude: decoded.get_f64("latitude_in_deg")?,
            longitude: decoded.get_f64("longitude_in_deg")?,
            heading: decoded.get_f64("heading_in_deg")?,
            speed: decoded.get_f64("speed_in_kmh")?,
            battery: decoded
                .get_f64("battery_voltage_in_V")
                .or_else(|| decoded.get_f64("battery_voltage"))?,
            in_trip: flag("in_trip")?,
            fix_failed: flag("fix_failed")?,
            man_down: flag("man_down"),
        })
    }

    /// `[longitude, latitude]`, the GeoJSON coordinate order
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Check if the coordinates come from a fresh fix
    pub fn has_fix(&self) -> bool {
        !self.fix_failed
    }
}

impl DecodedTelegram {
    /// The GPS fix, for position telegrams
    pub fn position(&self) -> Option<Position> {
        Position::from_telegram(self)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fix_failed {
            write!(f, "no fix")
        } else {
            write!(
                f,
                "{:.6}, {:.6} heading {} speed {} km/h",
                self.latitude, self.longitude, self.heading, self.speed
            )
        }
    }
}

//! Comfort zone classification.
//!
//! A [`ComfortProfile`] bounds the comfortable region of the humidity (x) /
//! temperature (y) plane with four straight lines.

use core::ops::BitOr;

use libm::fabsf;

use crate::metrics::TemperatureUnit;

/// Comfort classification, a bitmask of the violated boundaries.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComfortState(u8);

impl ComfortState {
    /// Inside the comfort zone.
    pub const OK: ComfortState = ComfortState(0);
    /// Above the hot line.
    pub const TOO_HOT: ComfortState = ComfortState(1);
    /// Below the cold line.
    pub const TOO_COLD: ComfortState = ComfortState(2);
    /// Below the dry line.
    pub const TOO_DRY: ComfortState = ComfortState(4);
    /// Above the humid line.
    pub const TOO_HUMID: ComfortState = ComfortState(8);
    /// Hot and humid at once.
    pub const HOT_AND_HUMID: ComfortState = ComfortState(9);
    /// Hot and dry at once.
    pub const HOT_AND_DRY: ComfortState = ComfortState(5);
    /// Cold and humid at once.
    pub const COLD_AND_HUMID: ComfortState = ComfortState(10);
    /// Cold and dry at once.
    pub const COLD_AND_DRY: ComfortState = ComfortState(6);

    /// Raw bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if no boundary is violated.
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Whether every boundary violated in `other` is also violated in `self`.
    pub const fn contains(self, other: ComfortState) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ComfortState {
    type Output = ComfortState;

    fn bitor(self, rhs: ComfortState) -> ComfortState {
        ComfortState(self.0 | rhs.0)
    }
}

/// A boundary line: `temperature = slope * humidity + intercept`, in °C and %.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComfortLine {
    /// Change of temperature (°C) per percent of humidity.
    pub slope: f32,
    /// Temperature (°C) at 0 % humidity.
    pub intercept: f32,
}

impl ComfortLine {
    /// Creates a line from its slope and intercept.
    pub const fn new(slope: f32, intercept: f32) -> Self {
        ComfortLine { slope, intercept }
    }

    /// Temperature on the line at `humidity`.
    pub fn at(&self, humidity: f32) -> f32 {
        humidity * self.slope + self.intercept
    }
}

/// Four lines bounding the comfortable zone.
///
/// Hot and humid are violated above their line, cold and dry below theirs.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComfortProfile {
    /// Upper temperature bound.
    pub too_hot: ComfortLine,
    /// Lower temperature bound.
    pub too_cold: ComfortLine,
    /// Lower bound on the dry side.
    pub too_dry: ComfortLine,
    /// Upper bound on the humid side.
    pub too_humid: ComfortLine,
}

impl Default for ComfortProfile {
    /// Simplified from the ASHRAE summer/winter comfort zones through the
    /// corner points A(30 %, 30 °C), B(70 %, 26.2 °C), C(70.1 %, 20.55 °C)
    /// and D(30.1 %, 22.22 °C).
    fn default() -> Self {
        ComfortProfile {
            too_hot: ComfortLine::new(-0.095, 32.85),
            too_cold: ComfortLine::new(-0.041_75, 23.476_675),
            too_dry: ComfortLine::new(-1.85, 59.0),
            too_humid: ComfortLine::new(-56.5, 3981.2),
        }
    }
}

/// Weight of temperature line violations in [`ComfortProfile::comfort_score`].
const TEMPERATURE_FACTOR: f32 = 3.0;
/// Weight of humidity line violations; these lines are much steeper.
const HUMIDITY_FACTOR: f32 = 0.1;

impl ComfortProfile {
    /// Whether the reading (°C, %) lies above the hot line.
    pub fn is_too_hot(&self, temperature: f32, humidity: f32) -> bool {
        temperature > self.too_hot.at(humidity)
    }

    /// Whether the reading (°C, %) lies above the humid line.
    pub fn is_too_humid(&self, temperature: f32, humidity: f32) -> bool {
        temperature > self.too_humid.at(humidity)
    }

    /// Whether the reading (°C, %) lies below the cold line.
    pub fn is_too_cold(&self, temperature: f32, humidity: f32) -> bool {
        temperature < self.too_cold.at(humidity)
    }

    /// Whether the reading (°C, %) lies below the dry line.
    pub fn is_too_dry(&self, temperature: f32, humidity: f32) -> bool {
        temperature < self.too_dry.at(humidity)
    }

    /// Positive when above the hot line.
    pub fn distance_too_hot(&self, temperature: f32, humidity: f32) -> f32 {
        temperature - self.too_hot.at(humidity)
    }

    /// Positive when above the humid line.
    pub fn distance_too_humid(&self, temperature: f32, humidity: f32) -> f32 {
        temperature - self.too_humid.at(humidity)
    }

    /// Positive when below the cold line.
    pub fn distance_too_cold(&self, temperature: f32, humidity: f32) -> f32 {
        self.too_cold.at(humidity) - temperature
    }

    /// Positive when below the dry line.
    pub fn distance_too_dry(&self, temperature: f32, humidity: f32) -> f32 {
        self.too_dry.at(humidity) - temperature
    }

    /// Classifies a reading and measures how far it is from comfortable.
    ///
    /// Returns the violated boundaries and the signed distance (in °C along
    /// the temperature axis) to the nearest violated line: positive for hot
    /// or humid, negative for cold or dry. Comfortable readings return
    /// `(ComfortState::OK, 0.0)`.
    pub fn comfort_ratio(
        &self,
        temperature: f32,
        humidity: f32,
        unit: TemperatureUnit,
    ) -> (ComfortState, f32) {
        let t = unit.to_celsius(temperature);

        let checks = [
            (
                self.is_too_hot(t, humidity),
                ComfortState::TOO_HOT,
                self.distance_too_hot(t, humidity),
            ),
            (
                self.is_too_humid(t, humidity),
                ComfortState::TOO_HUMID,
                self.distance_too_humid(t, humidity),
            ),
            (
                self.is_too_cold(t, humidity),
                ComfortState::TOO_COLD,
                -self.distance_too_cold(t, humidity),
            ),
            (
                self.is_too_dry(t, humidity),
                ComfortState::TOO_DRY,
                -self.distance_too_dry(t, humidity),
            ),
        ];

        let mut state = ComfortState::OK;
        let mut nearest = 0.0f32;
        for (violated, flag, distance) in checks {
            if !violated {
                continue;
            }
            if state.is_ok() || fabsf(distance) < fabsf(nearest) {
                nearest = distance;
            }
            state = state | flag;
        }

        (state, nearest)
    }

    /// Comfort as a percentage: 100 inside the zone, decreasing with the
    /// weighted distance to every violated line, never below 0.
    pub fn comfort_score(&self, temperature: f32, humidity: f32, unit: TemperatureUnit) -> f32 {
        let t = unit.to_celsius(temperature);

        let penalties = [
            (self.distance_too_hot(t, humidity), TEMPERATURE_FACTOR),
            (self.distance_too_humid(t, humidity), HUMIDITY_FACTOR),
            (self.distance_too_cold(t, humidity), TEMPERATURE_FACTOR),
            (self.distance_too_dry(t, humidity), HUMIDITY_FACTOR),
        ];

        let score = penalties
            .iter()
            .filter(|(distance, _)| *distance > 0.0)
            .fold(100.0f32, |score, (distance, factor)| score - distance * factor);

        score.max(0.0)
    }
}

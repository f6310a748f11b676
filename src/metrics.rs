//! Derived metrics computed from a temperature/humidity pair.
//!
//! All functions are pure. Humidity is relative humidity in percent.

use libm::{expf, fabsf, logf, sqrtf};

/// Unit of a temperature passed to or returned from the metric functions.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Converts `temperature` in this unit to °C.
    pub fn to_celsius(self, temperature: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => temperature,
            TemperatureUnit::Fahrenheit => to_celsius(temperature),
        }
    }

    /// Converts `temperature` in this unit to °F.
    pub fn to_fahrenheit(self, temperature: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => to_fahrenheit(temperature),
            TemperatureUnit::Fahrenheit => temperature,
        }
    }

    /// Converts a temperature in °C into this unit.
    pub fn convert_celsius(self, celsius: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => to_fahrenheit(celsius),
        }
    }

    /// Converts a temperature in °F into this unit.
    pub fn convert_fahrenheit(self, fahrenheit: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => to_celsius(fahrenheit),
            TemperatureUnit::Fahrenheit => fahrenheit,
        }
    }
}

/// Converts °C to °F.
pub fn to_fahrenheit(celsius: f32) -> f32 {
    1.8 * celsius + 32.0
}

/// Converts °F to °C.
pub fn to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) / 1.8
}

/// Apparent temperature, in the unit of `temperature`.
///
/// Uses Steadman's simple formula and switches to the Rothfusz regression
/// (with the NWS low- and high-humidity adjustments) once the simple result
/// exceeds 79 °F. See <https://www.wpc.ncep.noaa.gov/html/heatindex_equation.shtml>.
pub fn heat_index(temperature: f32, humidity: f32, unit: TemperatureUnit) -> f32 {
    let t = unit.to_fahrenheit(temperature);
    let rh = humidity;

    let mut hi = 0.5 * (t + 61.0 + ((t - 68.0) * 1.2) + (rh * 0.094));

    if hi > 79.0 {
        hi = -42.379 + 2.049_015_2 * t + 10.143_331 * rh
            - 0.224_755_41 * t * rh
            - 0.006_837_83 * t * t
            - 0.054_817_17 * rh * rh
            + 0.001_228_74 * t * t * rh
            + 0.000_852_82 * t * rh * rh
            - 0.000_001_99 * t * t * rh * rh;

        if rh < 13.0 && (80.0..=112.0).contains(&t) {
            hi -= ((13.0 - rh) * 0.25) * sqrtf((17.0 - fabsf(t - 95.0)) * 0.058_82);
        } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((rh - 85.0) * 0.1) * ((87.0 - t) * 0.2);
        }
    }

    unit.convert_fahrenheit(hi)
}

/// Dew point, in the unit of `temperature`.
///
/// Magnus approximation with b = 17.62 and c = 243.5 °C.
pub fn dew_point(temperature: f32, humidity: f32, unit: TemperatureUnit) -> f32 {
    const B: f32 = 17.62;
    const C: f32 = 243.5;

    let t = unit.to_celsius(temperature);
    let gamma = logf(humidity / 100.0) + B * t / (C + t);
    unit.convert_celsius(C * gamma / (B - gamma))
}

/// Absolute humidity in g/m³.
pub fn absolute_humidity(temperature: f32, humidity: f32, unit: TemperatureUnit) -> f32 {
    let t = unit.to_celsius(temperature);
    // Saturation vapor pressure in hPa
    let saturation = 6.112 * expf((17.67 * t) / (243.5 + t));
    saturation * humidity * 2.1674 / (t + 273.15)
}

/// How humans perceive the humidity, derived from the dew point.
///
/// Ordered from driest to most oppressive.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PerceptionState {
    /// Dew point at or below 10 °C: a bit dry for some.
    Dry = 0,
    VeryComfy = 1,
    Comfy = 2,
    /// OK for most, but all perceive the humidity at the upper edge.
    Ok = 3,
    UnComfy = 4,
    QuiteUnComfy = 5,
    /// Extremely uncomfortable, oppressive.
    VeryUnComfy = 6,
    /// Dew point above 26.7 °C.
    SevereUncomfy = 7,
}

/// Upper dew point bound (inclusive, °C) of every band but the last.
const PERCEPTION_BANDS: [(f32, PerceptionState); 7] = [
    (10.0, PerceptionState::Dry),
    (12.8, PerceptionState::VeryComfy),
    (15.5, PerceptionState::Comfy),
    (18.3, PerceptionState::Ok),
    (21.1, PerceptionState::UnComfy),
    (23.9, PerceptionState::QuiteUnComfy),
    (26.7, PerceptionState::VeryUnComfy),
];

/// Classifies a dew point given in °C.
pub fn perception_for_dew_point(dew_point_celsius: f32) -> PerceptionState {
    PERCEPTION_BANDS
        .iter()
        .find(|(upper, _)| dew_point_celsius <= *upper)
        .map_or(PerceptionState::SevereUncomfy, |(_, state)| *state)
}

/// Human perception of a temperature/humidity pair.
pub fn perception(temperature: f32, humidity: f32, unit: TemperatureUnit) -> PerceptionState {
    let t = unit.to_celsius(temperature);
    perception_for_dew_point(dew_point(t, humidity, TemperatureUnit::Celsius))
}

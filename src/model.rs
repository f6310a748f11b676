use crate::driver::Reading;

/// Supported sensor models.
///
/// The model determines the wake pulse length, the minimum sampling period,
/// how a frame is scaled into a [`Reading`] and the valid measurement ranges.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SensorModel {
    /// Infer the model from the first plausible frame, then lock to it.
    #[default]
    AutoDetect,
    /// DHT11: integer humidity, 1 °C resolution on most batches.
    Dht11,
    /// DHT22 family: DHT22, AM2302 and RHT03. 0.1 resolution for both values.
    Dht22,
}

impl SensorModel {
    /// Packaged DHT22.
    pub const AM2302: SensorModel = SensorModel::Dht22;
    /// Equivalent to DHT22.
    pub const RHT03: SensorModel = SensorModel::Dht22;

    /// Shortest allowed interval between two bus transactions.
    pub const fn minimum_sampling_period_ms(self) -> u64 {
        match self {
            SensorModel::Dht11 => 1000,
            _ => 2000,
        }
    }

    /// How long the host holds the line low to wake the sensor.
    ///
    /// Auto-detection uses the DHT11 pulse, which a DHT22 also accepts.
    pub const fn wake_pulse_ms(self) -> u32 {
        match self {
            SensorModel::Dht22 => 1,
            _ => 18,
        }
    }

    /// High pulses longer than this many microseconds encode a `1` bit.
    ///
    /// A `0` is 26-28 µs on both models and a `1` is about 70 µs.
    pub const fn bit_threshold_us(self) -> u8 {
        30
    }

    /// Decimal places of the reported temperature.
    pub const fn number_of_decimals_temperature(self) -> u8 {
        match self {
            SensorModel::Dht11 => 0,
            _ => 1,
        }
    }

    /// Decimal places of the reported humidity.
    pub const fn number_of_decimals_humidity(self) -> u8 {
        match self {
            SensorModel::Dht11 => 0,
            _ => 1,
        }
    }

    /// Lowest temperature the sensor can measure, in °C.
    pub const fn lower_bound_temperature(self) -> i8 {
        match self {
            SensorModel::Dht11 => 0,
            _ => -40,
        }
    }

    /// Highest temperature the sensor can measure, in °C.
    pub const fn upper_bound_temperature(self) -> i8 {
        match self {
            SensorModel::Dht11 => 50,
            _ => 125,
        }
    }

    /// Lowest humidity the sensor can measure, in percent.
    pub const fn lower_bound_humidity(self) -> i8 {
        match self {
            SensorModel::Dht11 => 20,
            _ => 0,
        }
    }

    /// Highest humidity the sensor can measure, in percent.
    pub const fn upper_bound_humidity(self) -> i8 {
        match self {
            SensorModel::Dht11 => 90,
            _ => 100,
        }
    }

    /// Whether `reading` could have come from this model.
    ///
    /// Humidity only has to be a valid percentage; the temperature must lie
    /// inside the model's bounds.
    pub fn is_plausible(self, reading: &Reading) -> bool {
        let Reading {
            temperature,
            humidity,
        } = *reading;
        (0.0..=100.0).contains(&humidity)
            && (f32::from(self.lower_bound_temperature())..=f32::from(self.upper_bound_temperature()))
                .contains(&temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(SensorModel::AM2302, SensorModel::Dht22);
        assert_eq!(SensorModel::RHT03, SensorModel::Dht22);
        assert_eq!(SensorModel::default(), SensorModel::AutoDetect);
    }

    #[test]
    fn test_timing_per_model() {
        assert_eq!(SensorModel::Dht11.minimum_sampling_period_ms(), 1000);
        assert_eq!(SensorModel::Dht22.minimum_sampling_period_ms(), 2000);
        assert_eq!(SensorModel::AutoDetect.minimum_sampling_period_ms(), 2000);

        assert_eq!(SensorModel::Dht11.wake_pulse_ms(), 18);
        assert_eq!(SensorModel::Dht22.wake_pulse_ms(), 1);
        assert_eq!(SensorModel::AutoDetect.wake_pulse_ms(), 18);
    }

    #[test]
    fn test_bounds() {
        let dht11 = SensorModel::Dht11;
        assert_eq!(dht11.lower_bound_temperature(), 0);
        assert_eq!(dht11.upper_bound_temperature(), 50);
        assert_eq!(dht11.lower_bound_humidity(), 20);
        assert_eq!(dht11.upper_bound_humidity(), 90);
        assert_eq!(dht11.number_of_decimals_temperature(), 0);

        let dht22 = SensorModel::Dht22;
        assert_eq!(dht22.lower_bound_temperature(), -40);
        assert_eq!(dht22.upper_bound_temperature(), 125);
        assert_eq!(dht22.lower_bound_humidity(), 0);
        assert_eq!(dht22.upper_bound_humidity(), 100);
        assert_eq!(dht22.number_of_decimals_temperature(), 1);
    }

    #[test]
    fn test_plausibility() {
        let room = Reading {
            temperature: 24.5,
            humidity: 55.0,
        };
        assert!(SensorModel::Dht11.is_plausible(&room));
        assert!(SensorModel::Dht22.is_plausible(&room));

        let freezing = Reading {
            temperature: -10.0,
            humidity: 40.0,
        };
        assert!(!SensorModel::Dht11.is_plausible(&freezing));
        assert!(SensorModel::Dht22.is_plausible(&freezing));

        let soaked = Reading {
            temperature: 20.0,
            humidity: 1408.0,
        };
        assert!(!SensorModel::Dht22.is_plausible(&soaked));
    }
}

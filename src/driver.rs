use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::comfort::{ComfortProfile, ComfortState};
use crate::decoder::ProtocolDecoder;
use crate::error::{DhtError, ReadStatus};
use crate::frame::Dht11Decimals;
use crate::metrics::TemperatureUnit;
use crate::model::SensorModel;
use crate::platform::{InterruptControl, MonotonicClock};

/// Reading returned by the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

impl Reading {
    /// Placeholder held until the first successful read.
    pub const UNKNOWN: Reading = Reading {
        temperature: f32::NAN,
        humidity: f32::NAN,
    };

    /// Temperature converted to °F.
    pub fn temperature_fahrenheit(&self) -> f32 {
        crate::metrics::to_fahrenheit(self.temperature)
    }

    /// Returns `false` for [`Reading::UNKNOWN`].
    pub fn is_known(&self) -> bool {
        !self.temperature.is_nan() && !self.humidity.is_nan()
    }
}

/// Driver settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    /// Sensor model, or [`SensorModel::AutoDetect`].
    pub model: SensorModel,
    /// How DHT11 decimal bytes are interpreted.
    pub dht11_decimals: Dht11Decimals,
    /// Boundaries used by the comfort helpers.
    pub comfort: ComfortProfile,
}

/// Driver for DHT11 and DHT22-family sensors.
///
/// Owns the data pin for its whole lifetime. Reads are rate limited to the
/// model's minimum sampling period; a read issued too early returns the
/// cached [`Reading`] without touching the bus.
pub struct Dht<PIN, DELAY, CLOCK, IRQ> {
    decoder: ProtocolDecoder<PIN, DELAY>,
    clock: CLOCK,
    interrupts: IRQ,
    model: SensorModel,
    dht11_decimals: Dht11Decimals,
    comfort: ComfortProfile,
    reading: Reading,
    status: ReadStatus,
    last_read_ms: Option<u64>,
}

impl<PIN, DELAY, CLOCK, IRQ, E> Dht<PIN, DELAY, CLOCK, IRQ>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
    CLOCK: MonotonicClock,
    IRQ: InterruptControl,
{
    /// Creates a driver with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `pin` - Open-drain GPIO connected to the data line. Must support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `clock` - Millisecond clock used for rate limiting.
    /// * `interrupts` - Masks interrupts while the response is sampled.
    /// * `config` - Model, DHT11 decimal handling and comfort profile.
    pub fn new(pin: PIN, delay: DELAY, clock: CLOCK, interrupts: IRQ, config: Config) -> Self {
        Dht {
            decoder: ProtocolDecoder::new(pin, delay),
            clock,
            interrupts,
            model: config.model,
            dht11_decimals: config.dht11_decimals,
            comfort: config.comfort,
            reading: Reading::UNKNOWN,
            status: ReadStatus::None,
            last_read_ms: None,
        }
    }

    /// Creates a driver for `model` with default settings otherwise.
    ///
    /// The first read may happen immediately.
    pub fn setup(pin: PIN, delay: DELAY, clock: CLOCK, interrupts: IRQ, model: SensorModel) -> Self {
        Self::new(
            pin,
            delay,
            clock,
            interrupts,
            Config {
                model,
                ..Config::default()
            },
        )
    }

    /// Switches to another sensor model and allows an immediate read.
    pub fn reconfigure(&mut self, model: SensorModel) {
        self.model = model;
        self.reset_timer();
    }

    /// Forgets when the sensor was last read, so that the next read hits the bus.
    pub fn reset_timer(&mut self) {
        self.last_read_ms = None;
    }

    /// Reads the sensor, subject to the minimum sampling period.
    ///
    /// Within the sampling period this returns the cached reading and leaves
    /// [`Dht::status`] untouched. Otherwise a full exchange is performed; on
    /// failure the cached reading is kept and the status records the error.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` with the new or the cached reading.
    /// * `Err(DhtError)` if a communication, checksum or detection error occurs.
    pub fn read(&mut self) -> Result<Reading, DhtError<E>> {
        let now = self.clock.now_ms();
        if let Some(last) = self.last_read_ms {
            let elapsed = now.wrapping_sub(last);
            if elapsed < self.model.minimum_sampling_period_ms() {
                trace!("read throttled, {=u64} ms since last read", elapsed);
                return Ok(self.reading);
            }
        }
        // Counted from the attempt, so a failing sensor is not hammered either.
        self.last_read_ms = Some(now);

        match self.sample() {
            Ok(reading) => {
                self.reading = reading;
                self.status = ReadStatus::None;
                Ok(reading)
            }
            Err(err) => {
                self.status = ReadStatus::from(&err);
                warn!("read failed: {}", self.status);
                Err(err)
            }
        }
    }

    fn sample(&mut self) -> Result<Reading, DhtError<E>> {
        let frame = self.decoder.decode(self.model, &mut self.interrupts)?;

        if self.model != SensorModel::AutoDetect {
            return Ok(frame.to_reading(self.model, self.dht11_decimals));
        }

        let (model, reading) = frame
            .detect_model(self.dht11_decimals)
            .ok_or(DhtError::UndetectedModel)?;
        debug!("detected sensor model {}", model);
        self.model = model;
        Ok(reading)
    }

    /// Temperature in °C from a fresh or cached reading.
    pub fn get_temperature(&mut self) -> f32 {
        self.get_temp_and_humidity().temperature
    }

    /// Relative humidity in percent from a fresh or cached reading.
    pub fn get_humidity(&mut self) -> f32 {
        self.get_temp_and_humidity().humidity
    }

    /// Reads the sensor if allowed and returns the latest good values.
    ///
    /// Errors are only reported through [`Dht::status`]. Before the first
    /// successful read both values are NaN.
    pub fn get_temp_and_humidity(&mut self) -> Reading {
        self.read().unwrap_or(self.reading)
    }

    /// Last good reading, without touching the bus.
    pub fn reading(&self) -> Reading {
        self.reading
    }

    /// Outcome of the last bus transaction.
    pub fn status(&self) -> ReadStatus {
        self.status
    }

    /// Outcome of the last bus transaction as text, e.g. `"TIMEOUT"`.
    pub fn status_str(&self) -> &'static str {
        self.status.as_str()
    }

    /// Configured model, or the detected one once auto-detection succeeded.
    pub fn model(&self) -> SensorModel {
        self.model
    }

    /// Shortest interval between two bus transactions for the current model.
    pub fn minimum_sampling_period_ms(&self) -> u64 {
        self.model.minimum_sampling_period_ms()
    }

    /// Decimal places of the temperature for the current model.
    pub fn number_of_decimals_temperature(&self) -> u8 {
        self.model.number_of_decimals_temperature()
    }

    /// Decimal places of the humidity for the current model.
    pub fn number_of_decimals_humidity(&self) -> u8 {
        self.model.number_of_decimals_humidity()
    }

    /// Lowest measurable temperature (°C) of the current model.
    pub fn lower_bound_temperature(&self) -> i8 {
        self.model.lower_bound_temperature()
    }

    /// Highest measurable temperature (°C) of the current model.
    pub fn upper_bound_temperature(&self) -> i8 {
        self.model.upper_bound_temperature()
    }

    /// Lowest measurable humidity (%) of the current model.
    pub fn lower_bound_humidity(&self) -> i8 {
        self.model.lower_bound_humidity()
    }

    /// Highest measurable humidity (%) of the current model.
    pub fn upper_bound_humidity(&self) -> i8 {
        self.model.upper_bound_humidity()
    }

    /// Profile used by the comfort helpers.
    pub fn comfort_profile(&self) -> ComfortProfile {
        self.comfort
    }

    /// Replaces the comfort profile.
    pub fn set_comfort_profile(&mut self, profile: ComfortProfile) {
        self.comfort = profile;
    }

    /// See [`ComfortProfile::is_too_hot`].
    pub fn is_too_hot(&self, temperature: f32, humidity: f32) -> bool {
        self.comfort.is_too_hot(temperature, humidity)
    }

    /// See [`ComfortProfile::is_too_cold`].
    pub fn is_too_cold(&self, temperature: f32, humidity: f32) -> bool {
        self.comfort.is_too_cold(temperature, humidity)
    }

    /// See [`ComfortProfile::is_too_dry`].
    pub fn is_too_dry(&self, temperature: f32, humidity: f32) -> bool {
        self.comfort.is_too_dry(temperature, humidity)
    }

    /// See [`ComfortProfile::is_too_humid`].
    pub fn is_too_humid(&self, temperature: f32, humidity: f32) -> bool {
        self.comfort.is_too_humid(temperature, humidity)
    }

    /// Classifies a reading against the driver's comfort profile.
    ///
    /// See [`ComfortProfile::comfort_ratio`].
    pub fn comfort_ratio(
        &self,
        temperature: f32,
        humidity: f32,
        unit: TemperatureUnit,
    ) -> (ComfortState, f32) {
        self.comfort.comfort_ratio(temperature, humidity, unit)
    }

    /// Tears the driver down and returns its resources.
    pub fn release(self) -> (PIN, DELAY, CLOCK, IRQ) {
        let (pin, delay) = self.decoder.release();
        (pin, delay, self.clock, self.interrupts)
    }
}

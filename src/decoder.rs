use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::error::DhtError;
use crate::frame::RawFrame;
use crate::model::SensorModel;
use crate::platform::{InterruptControl, UninterruptibleWindow};

/// Maximum time to wait (in microseconds) for the pin to change state.
///
/// Every phase of the protocol is shorter than this; a line that does not
/// change within it is reported as [`DhtError::Timeout`].
pub const TIMEOUT_US: u8 = 100;

/// Bit-banging decoder for the single-wire DHT protocol.
///
/// The pin must be open-drain with a pull-up: driving it high releases the
/// line so that the sensor can pull it low.
pub struct ProtocolDecoder<PIN, DELAY> {
    pin: PIN,
    delay: DELAY,
}

impl<PIN, DELAY, E> ProtocolDecoder<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a decoder on an open-drain pin.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        ProtocolDecoder { pin, delay }
    }

    /// Runs one complete exchange with the sensor and returns the validated frame.
    ///
    /// Interrupts are disabled through `interrupts` from the moment the line is
    /// released until the 40th bit is measured. Any error invalidates the whole
    /// frame; nothing is retried.
    ///
    /// # Errors
    ///
    /// * [`DhtError::Timeout`] if a phase exceeds [`TIMEOUT_US`]
    /// * [`DhtError::ChecksumMismatch`] if the frame is corrupted
    /// * [`DhtError::PinError`] if the GPIO fails
    pub fn decode<I: InterruptControl>(
        &mut self,
        model: SensorModel,
        interrupts: &mut I,
    ) -> Result<RawFrame, DhtError<E>> {
        self.wake(model)?;

        let bytes = {
            let _window = UninterruptibleWindow::open(interrupts);
            self.await_response()?;

            let mut bytes = [0u8; 5];
            for b in bytes.iter_mut() {
                *b = self.read_byte(model)?;
            }
            bytes
        };

        RawFrame::new(bytes).validate()
    }

    /// Gives back the pin and delay.
    pub fn release(self) -> (PIN, DELAY) {
        (self.pin, self.delay)
    }

    /// Holds the line low long enough to wake the sensor, then releases it.
    fn wake(&mut self, model: SensorModel) -> Result<(), DhtError<E>> {
        self.pin.set_low()?;
        self.delay.delay_ms(model.wake_pulse_ms());
        self.pin.set_high()?;
        Ok(())
    }

    /// Waits for the pull-up to raise the released line, then for the sensor's
    /// 80us low and 80us high acknowledge.
    fn await_response(&mut self) -> Result<(), DhtError<E>> {
        self.wait_for_high()?; // host low may still be visible
        self.wait_for_low()?; // sensor takes the line
        self.wait_for_high()?; // 80us
        self.wait_for_low()?; // 80us
        Ok(())
    }

    /// Reads one byte (8 bits, MSB first) from the sensor.
    fn read_byte(&mut self, model: SensorModel) -> Result<u8, DhtError<E>> {
        let mut byte: u8 = 0;

        for _ in 0..8 {
            byte <<= 1;
            if self.read_bit(model)? {
                byte |= 1;
            }
        }

        Ok(byte)
    }

    /// Reads a single bit from the sensor.
    ///
    /// Every bit starts with a ~50us low. The width of the high pulse that
    /// follows is the bit value.
    fn read_bit(&mut self, model: SensorModel) -> Result<bool, DhtError<E>> {
        self.wait_for_high()?;
        let high_us = self.wait_for_low()?;

        Ok(high_us > model.bit_threshold_us())
    }

    /// Waits until the data line goes high, returning the elapsed microseconds.
    fn wait_for_high(&mut self) -> Result<u8, DhtError<E>> {
        Self::wait_for_state(&mut self.delay, || self.pin.is_high())
    }

    /// Waits until the data line goes low, returning the elapsed microseconds.
    fn wait_for_low(&mut self) -> Result<u8, DhtError<E>> {
        Self::wait_for_state(&mut self.delay, || self.pin.is_low())
    }

    /// Polls `condition` once per microsecond until it holds or times out.
    ///
    /// The number of polls taken is the measured duration. It slightly
    /// underestimates real time on slow cores, which the bit threshold tolerates.
    ///
    /// # Errors
    ///
    /// Returns `DhtError::Timeout` if the timeout is exceeded
    fn wait_for_state<F>(delay: &mut DELAY, mut condition: F) -> Result<u8, DhtError<E>>
    where
        F: FnMut() -> Result<bool, E>,
    {
        for elapsed in 0..TIMEOUT_US {
            if condition()? {
                return Ok(elapsed);
            }
            delay.delay_us(1);
        }
        Err(DhtError::Timeout)
    }
}

use crate::driver::Reading;
use crate::error::DhtError;
use crate::model::SensorModel;

/// How the DHT11 decimal bytes are interpreted.
///
/// Most DHT11 batches send zero in both decimal bytes, some clones send
/// temperature tenths in byte 3. Neither behavior is documented consistently,
/// so decoding them is opt-out.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dht11Decimals {
    /// Byte 1 holds humidity tenths and the low 7 bits of byte 3 temperature tenths.
    #[default]
    Tenths,
    /// Decimal bytes are ignored; only the sign bit of byte 3 is used.
    Ignore,
}

/// The 40 bits sent by the sensor.
///
/// Layout: humidity high, humidity low, temperature high, temperature low, checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame([u8; 5]);

impl RawFrame {
    /// Wraps five bytes as received, checksum last.
    pub const fn new(bytes: [u8; 5]) -> Self {
        RawFrame(bytes)
    }

    /// The five bytes as received.
    pub const fn bytes(&self) -> [u8; 5] {
        self.0
    }

    /// The checksum byte sent by the sensor.
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Low 8 bits of the sum of the four data bytes.
    pub fn expected_checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Returns `true` if the checksum matches the data bytes.
    pub fn is_valid(&self) -> bool {
        self.expected_checksum() == self.checksum()
    }

    /// Checks the transmitted checksum against the data bytes.
    pub fn validate<E>(self) -> Result<Self, DhtError<E>> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(DhtError::ChecksumMismatch)
        }
    }

    /// Scales the frame into a [`Reading`] for `model`.
    ///
    /// [`SensorModel::AutoDetect`] uses the DHT22 scaling; see [`RawFrame::detect_model`].
    pub fn to_reading(&self, model: SensorModel, dht11_decimals: Dht11Decimals) -> Reading {
        match model {
            SensorModel::Dht11 => self.dht11_reading(dht11_decimals),
            SensorModel::Dht22 | SensorModel::AutoDetect => self.dht22_reading(),
        }
    }

    /// Infers the sensor model from which scaling gives plausible values.
    ///
    /// The DHT22 scaling is tried first: a DHT11 humidity byte of 4 or more
    /// scales to over 100 % under it, so real DHT11 frames never pass.
    /// Returns `None` if neither scaling is plausible.
    pub fn detect_model(&self, dht11_decimals: Dht11Decimals) -> Option<(SensorModel, Reading)> {
        [SensorModel::Dht22, SensorModel::Dht11]
            .into_iter()
            .map(|model| (model, self.to_reading(model, dht11_decimals)))
            .find(|(model, reading)| model.is_plausible(reading))
    }

    fn dht22_reading(&self) -> Reading {
        let [hum_hi, hum_lo, temp_hi, temp_lo, _] = self.0;

        let humidity = u16::from_be_bytes([hum_hi, hum_lo]) as f32 / 10.0;

        let is_temp_negative = (temp_hi >> 7) != 0;
        let joined_temp = u16::from_be_bytes([temp_hi & 0b0111_1111, temp_lo]);
        let mut temperature = joined_temp as f32 / 10.0;
        if is_temp_negative {
            temperature = -temperature;
        }

        Reading {
            temperature,
            humidity,
        }
    }

    fn dht11_reading(&self, decimals: Dht11Decimals) -> Reading {
        let [hum_int, hum_dec, temp_int, temp_dec, _] = self.0;

        let is_temp_negative = (temp_dec >> 7) != 0;
        let (hum_tenths, temp_tenths) = match decimals {
            Dht11Decimals::Tenths => (hum_dec, temp_dec & 0b0111_1111),
            Dht11Decimals::Ignore => (0, 0),
        };

        // Join in tenths first so that e.g. 24 + 0.5 is exactly 24.5.
        let humidity = (u16::from(hum_int) * 10 + u16::from(hum_tenths)) as f32 / 10.0;
        let mut temperature = (u16::from(temp_int) * 10 + u16::from(temp_tenths)) as f32 / 10.0;
        if is_temp_negative {
            temperature = -temperature;
        }

        Reading {
            temperature,
            humidity,
        }
    }
}

impl From<[u8; 5]> for RawFrame {
    fn from(bytes: [u8; 5]) -> Self {
        RawFrame(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_validation() {
        let data_sets = [
            [0x02, 0x8C, 0x01, 0x11],
            [0x01, 0x90, 0x00, 0xF6],
            [0xFF, 0xFF, 0xFF, 0xFF],
            [0x00, 0x00, 0x00, 0x00],
            [0x37, 0x00, 0x18, 0x05],
        ];

        for [b0, b1, b2, b3] in data_sets {
            let sum = (u16::from(b0) + u16::from(b1) + u16::from(b2) + u16::from(b3)) & 0xFF;
            for b4 in 0..=u8::MAX {
                let frame = RawFrame::new([b0, b1, b2, b3, b4]);
                assert_eq!(frame.is_valid(), u16::from(b4) == sum);
            }
        }
    }

    #[test]
    fn test_validate() {
        let good = RawFrame::new([0x02, 0x8C, 0x01, 0x11, 0xA0]);
        assert_eq!(good.validate::<()>(), Ok(good));

        let bad = RawFrame::new([0x02, 0x8C, 0x01, 0x11, 0xA1]);
        assert_eq!(bad.validate::<()>(), Err(DhtError::ChecksumMismatch));
    }

    #[test]
    fn test_dht22_positive_temp() {
        let frame = RawFrame::new([0x02, 0x8C, 0x01, 0x11, 0xA0]);
        assert_eq!(
            frame.to_reading(SensorModel::Dht22, Dht11Decimals::Tenths),
            Reading {
                temperature: 27.3,
                humidity: 65.2,
            }
        );
    }

    #[test]
    fn test_dht22_negative_temp() {
        // Bit 7 of temp_hi is the sign: [0x00, 0x0A] = 10 => -1.0
        let frame = RawFrame::new([0x01, 0x90, 0x80, 0x0A, 0x1B]);
        assert_eq!(
            frame.to_reading(SensorModel::Dht22, Dht11Decimals::Tenths),
            Reading {
                temperature: -1.0,
                humidity: 40.0,
            }
        );
    }

    #[test]
    fn test_dht11_decimals() {
        let frame = RawFrame::new([0x37, 0x00, 0x18, 0x05, 0x54]);
        assert_eq!(
            frame.to_reading(SensorModel::Dht11, Dht11Decimals::Tenths),
            Reading {
                temperature: 24.5,
                humidity: 55.0,
            }
        );
        assert_eq!(
            frame.to_reading(SensorModel::Dht11, Dht11Decimals::Ignore),
            Reading {
                temperature: 24.0,
                humidity: 55.0,
            }
        );
    }

    #[test]
    fn test_dht11_negative_temp() {
        // Sign lives in bit 7 of the decimal byte
        let frame = RawFrame::new([0x28, 0x00, 0x02, 0x83, 0xAD]);
        assert_eq!(
            frame.to_reading(SensorModel::Dht11, Dht11Decimals::Tenths),
            Reading {
                temperature: -2.3,
                humidity: 40.0,
            }
        );
        assert_eq!(
            frame.to_reading(SensorModel::Dht11, Dht11Decimals::Ignore).temperature,
            -2.0
        );
    }

    #[test]
    fn test_detect_dht22() {
        let frame = RawFrame::new([0x02, 0x8C, 0x01, 0x11, 0xA0]);
        let (model, reading) = frame.detect_model(Dht11Decimals::Tenths).unwrap();
        assert_eq!(model, SensorModel::Dht22);
        assert_eq!(reading.humidity, 65.2);
    }

    #[test]
    fn test_detect_dht22_low_humidity() {
        // 20.0 %, 25.0 °C: humidity high byte is zero
        let frame = RawFrame::new([0x00, 0xC8, 0x00, 0xFA, 0xC2]);
        let (model, _) = frame.detect_model(Dht11Decimals::Tenths).unwrap();
        assert_eq!(model, SensorModel::Dht22);
    }

    #[test]
    fn test_detect_dht11() {
        let frame = RawFrame::new([0x37, 0x00, 0x18, 0x05, 0x54]);
        let (model, reading) = frame.detect_model(Dht11Decimals::Tenths).unwrap();
        assert_eq!(model, SensorModel::Dht11);
        assert_eq!(
            reading,
            Reading {
                temperature: 24.5,
                humidity: 55.0,
            }
        );
    }

    #[test]
    fn test_detect_nothing_plausible() {
        let frame = RawFrame::new([0xFF, 0xFF, 0xFF, 0xFF, 0xFC]);
        assert_eq!(frame.detect_model(Dht11Decimals::Tenths), None);
    }
}

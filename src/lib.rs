//! DHT11 / DHT22 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 and DHT22-family
//! (DHT22, AM2302, RHT03) temperature and humidity sensors, built on top of the
//! [`embedded-hal`] traits, plus the comfort metrics usually derived from them.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Sensor model auto-detection
//! - Read-through cache honoring the sensor's minimum sampling period
//! - Heat index, dew point, absolute humidity, comfort zone and perception
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access (the pin must be open-drain)
//! - [`DelayNs`] for accurate timing
//!
//! and on two small traits of its own, because `embedded-hal` has none:
//! - [`MonotonicClock`] for rate limiting
//! - [`InterruptControl`] to mask interrupts while the response is sampled
//!
//! # Usage
//!
//! ```ignore
//! use dhtxx_sensor::{Dht, NoInterruptControl, SensorModel, TemperatureUnit, metrics};
//!
//! let mut dht = Dht::setup(pin, delay, clock, NoInterruptControl, SensorModel::Dht22);
//!
//! let reading = dht.get_temp_and_humidity();
//! if dht.status().is_ok() {
//!     let heat_index = metrics::heat_index(
//!         reading.temperature,
//!         reading.humidity,
//!         TemperatureUnit::Celsius,
//!     );
//! }
//! ```
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs read failures and model detection
//! - `critical-section`: Provides `CriticalSectionControl`, masking interrupts through the
//!   [`critical-section`](https://docs.rs/critical-section) crate
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod comfort;
pub mod decoder;
pub mod driver;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod model;
pub mod platform;

#[cfg(test)]
mod test_support;

pub use comfort::{ComfortLine, ComfortProfile, ComfortState};
pub use decoder::ProtocolDecoder;
pub use driver::{Config, Dht, Reading};
pub use error::{DhtError, ReadStatus};
pub use frame::{Dht11Decimals, RawFrame};
pub use metrics::{PerceptionState, TemperatureUnit};
pub use model::SensorModel;
#[cfg(feature = "critical-section")]
pub use platform::CriticalSectionControl;
pub use platform::{InterruptControl, MonotonicClock, NoInterruptControl, UninterruptibleWindow};

//! Fixtures shared by the unit tests.

use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_mock::eh1::digital::{State as PinState, Transaction as PinTx};

use crate::platform::{InterruptControl, MonotonicClock};

/// Polls the mocked line stays high for a `0` bit.
pub const ZERO_HIGH_POLLS: usize = 8;
/// Polls the mocked line stays high for a `1` bit.
pub const ONE_HIGH_POLLS: usize = 40;

/// Clock whose clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        ManualClock(Rc::new(Cell::new(start_ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&mut self) -> u64 {
        self.0.get()
    }
}

/// Records how often interrupts were masked and unmasked.
#[derive(Debug, Default)]
pub struct CountingInterrupts {
    pub disabled: usize,
    pub enabled: usize,
    pub masked: bool,
}

impl InterruptControl for CountingInterrupts {
    fn disable(&mut self) {
        assert!(!self.masked, "interrupts disabled twice");
        self.disabled += 1;
        self.masked = true;
    }

    fn enable(&mut self) {
        self.enabled += 1;
        self.masked = false;
    }
}

/// Host pulls the line low, then releases it.
pub fn wake_sequence() -> Vec<PinTx> {
    vec![PinTx::set(PinState::Low), PinTx::set(PinState::High)]
}

/// Line rises after release, then the sensor acknowledges: falling edge,
/// 80us low, 80us high.
pub fn response_sequence() -> Vec<PinTx> {
    vec![
        PinTx::get(PinState::High), // pull-up raised the line
        PinTx::get(PinState::Low),  // sensor pulls low
        PinTx::get(PinState::High), // end of 80us low
        PinTx::get(PinState::Low),  // end of 80us high, first bit starts
    ]
}

/// One bit: the ~50us low ends, then the line stays high for a bit-dependent
/// number of polls.
pub fn encode_bit(bit: bool) -> Vec<PinTx> {
    let polls = if bit { ONE_HIGH_POLLS } else { ZERO_HIGH_POLLS };
    let mut states = vec![PinTx::get(PinState::High)];
    states.extend(std::iter::repeat_n(PinTx::get(PinState::High), polls));
    states.push(PinTx::get(PinState::Low));
    states
}

// Helper to encode one byte into 8 bits (MSB first)
pub fn encode_byte(byte: u8) -> Vec<PinTx> {
    (0..8)
        .flat_map(|i| encode_bit((byte >> (7 - i)) & 1 == 1))
        .collect()
}

/// Complete exchange for one frame, wake pulse included.
pub fn frame_sequence(bytes: [u8; 5]) -> Vec<PinTx> {
    let mut states = wake_sequence();
    states.extend(response_sequence());
    for byte in bytes {
        states.extend(encode_byte(byte));
    }
    states
}

/// Exchange where the sensor never answers the wake pulse.
pub fn silent_sequence(timeout_polls: usize) -> Vec<PinTx> {
    let mut states = wake_sequence();
    states.push(PinTx::get(PinState::High)); // pull-up raised the line
    states.extend(std::iter::repeat_n(PinTx::get(PinState::High), timeout_polls));
    states
}

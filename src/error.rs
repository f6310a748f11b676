/// Possible errors from a single read attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// Timed out waiting for a pin state change.
    Timeout,
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Auto-detection found no sensor model whose scaling yields plausible values.
    UndetectedModel,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

/// Result of the most recent read attempt, as reported by [`Dht::status`].
///
/// [`Dht::status`]: crate::Dht::status
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadStatus {
    /// The last read succeeded, or no read has been attempted yet.
    #[default]
    None,
    /// The sensor did not respond within the protocol windows.
    Timeout,
    /// A frame was received but failed validation.
    ChecksumError,
    /// The GPIO implementation reported an error.
    PinError,
}

impl ReadStatus {
    /// Short human readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReadStatus::None => "OK",
            ReadStatus::Timeout => "TIMEOUT",
            ReadStatus::ChecksumError => "CHECKSUM",
            ReadStatus::PinError => "PIN",
        }
    }

    /// Returns `true` if the last read succeeded.
    pub const fn is_ok(self) -> bool {
        matches!(self, ReadStatus::None)
    }
}

impl<E> From<&DhtError<E>> for ReadStatus {
    fn from(error: &DhtError<E>) -> Self {
        match error {
            DhtError::Timeout => ReadStatus::Timeout,
            // An implausible frame is indistinguishable from a corrupted one.
            DhtError::ChecksumMismatch | DhtError::UndetectedModel => ReadStatus::ChecksumError,
            DhtError::PinError(_) => ReadStatus::PinError,
        }
    }
}

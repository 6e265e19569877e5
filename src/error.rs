//! Unified error type for airmouse.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No host is connected; the report was not sent.
    Disconnected,

    /// The SoftDevice refused to queue a notification.
    Notify,

    /// GATT table registration or attribute update failed.
    Gatt(GattError),

    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// Subset of GATT errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GattError {
    /// Raw NRF error code from the SoftDevice.
    Raw(u32),
    /// Adding a service, characteristic or descriptor failed.
    RegisterFailed,
    /// Writing a local attribute value failed.
    SetValueFailed,
}

impl GattError {
    /// Turn a raw SoftDevice return code into a `Result`.
    pub fn check(code: u32) -> core::result::Result<(), GattError> {
        match code {
            NRF_SUCCESS => Ok(()),
            code => Err(GattError::Raw(code)),
        }
    }
}

/// `NRF_SUCCESS` from `nrf_error.h`.
const NRF_SUCCESS: u32 = 0;

// Convenience conversions

impl From<GattError> for Error {
    fn from(e: GattError) -> Self {
        Error::Gatt(e)
    }
}

/// Shorthand used by the mouse handle and the link implementations.
pub type Result<T> = core::result::Result<T, Error>;

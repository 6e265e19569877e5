//! HID-over-GATT report types and the protocol-level values the HID
//! service exposes.

pub mod mouse;

#[cfg(test)]
mod tests;

pub use mouse::{MouseButtons, MouseReport};

/// HID Information characteristic (0x2A4A) value.
///
/// bcdHID 1.11, country code 0, flags RemoteWake | NormallyConnectable.
pub const HID_INFORMATION: [u8; 4] = [0x11, 0x01, 0x00, 0x03];

/// Report Reference descriptor (0x2908) report type for input reports.
pub const REPORT_TYPE_INPUT: u8 = 0x01;

/// Report Reference descriptor value for the mouse input report.
pub const MOUSE_INPUT_REPORT_REFERENCE: [u8; 2] = [mouse::MOUSE_REPORT_ID, REPORT_TYPE_INPUT];

/// Protocol Mode characteristic (0x2A4E) value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ProtocolMode {
    /// Fixed 3-byte boot mouse report (BIOS / pre-OS hosts).
    Boot = 0x00,
    /// Full report described by the Report Map. HOGP default after connect.
    #[default]
    Report = 0x01,
}

impl ProtocolMode {
    /// Decode a Protocol Mode write; anything other than 0/1 is rejected.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(ProtocolMode::Boot),
            0x01 => Some(ProtocolMode::Report),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// HOGP: every connection starts in Report protocol, whatever the
    /// previous host selected.
    pub const fn on_connect() -> Self {
        ProtocolMode::Report
    }

    /// Mode in effect after the host writes `data` to the Protocol Mode
    /// characteristic. Empty or out-of-range writes keep `current`.
    pub fn after_write(current: Self, data: &[u8]) -> Self {
        data.first()
            .copied()
            .and_then(Self::from_u8)
            .unwrap_or(current)
    }
}

/// HID Control Point characteristic (0x2A4C) commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlPoint {
    Suspend,
    ExitSuspend,
}

impl ControlPoint {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(ControlPoint::Suspend),
            0x01 => Some(ControlPoint::ExitSuspend),
            _ => None,
        }
    }
}

/// Encode a report for whichever protocol the host selected.
///
/// Returns the number of bytes written to `buf` (0 if it is too small).
pub fn encode_report(report: &MouseReport, mode: ProtocolMode, buf: &mut [u8]) -> usize {
    match mode {
        ProtocolMode::Report => report.serialize(buf),
        ProtocolMode::Boot => report.serialize_boot(buf),
    }
}

//! HID mouse input report (report protocol + boot protocol).
//!
//! Report-protocol layout (5 bytes, Report ID 1 carried by the GATT
//! Report Reference descriptor, not in the payload):
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle,
//!         Bit 3 = Back, Bit 4 = Forward
//! Byte 1: X displacement        (signed, -127..127)
//! Byte 2: Y displacement        (signed, -127..127)
//! Byte 3: Vertical wheel        (signed, -127..127)
//! Byte 4: Horizontal wheel/pan  (signed, -127..127)
//! ```
//!
//! Boot-protocol layout is the first three bytes only.

use core::ops::{BitOr, BitOrAssign};

/// Report-protocol mouse report size in bytes.
pub const MOUSE_REPORT_SIZE: usize = 5;

/// Boot-protocol mouse report size in bytes.
pub const BOOT_MOUSE_REPORT_SIZE: usize = 3;

/// Report ID advertised for the mouse input report.
pub const MOUSE_REPORT_ID: u8 = 1;

/// Mouse button bitfield.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: Self = Self(0x00);
    pub const LEFT: Self = Self(0x01);
    pub const RIGHT: Self = Self(0x02);
    pub const MIDDLE: Self = Self(0x04);
    pub const BACK: Self = Self(0x08);
    pub const FORWARD: Self = Self(0x10);

    /// Every button the report descriptor declares.
    pub const ALL: Self = Self(0x1F);

    /// Build from raw bits; bits above the five declared buttons are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if `other` is non-empty and all of its buttons are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for MouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// HID mouse input report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Held buttons.
    pub buttons: MouseButtons,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
    /// Vertical scroll wheel delta (signed).
    pub wheel: i8,
    /// Horizontal scroll (AC Pan) delta (signed).
    pub hwheel: i8,
}

impl MouseReport {
    /// Create an idle (no movement, no buttons) report.
    #[cfg(test)]
    pub const fn empty() -> Self {
        Self {
            buttons: MouseButtons::NONE,
            x: 0,
            y: 0,
            wheel: 0,
            hwheel: 0,
        }
    }

    /// A relative movement with the given buttons held.
    pub const fn movement(buttons: MouseButtons, x: i8, y: i8) -> Self {
        Self {
            buttons,
            x,
            y,
            wheel: 0,
            hwheel: 0,
        }
    }

    /// A button-state report with no motion.
    pub const fn buttons(buttons: MouseButtons) -> Self {
        Self::movement(buttons, 0, 0)
    }

    /// Serialise into a byte slice for the report-protocol Input Report.
    /// Returns the number of bytes written (5), or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons.bits();
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        buf[3] = self.wheel as u8;
        buf[4] = self.hwheel as u8;
        MOUSE_REPORT_SIZE
    }

    /// Serialise into the 3-byte Boot Mouse Input Report. Wheels are dropped.
    /// Returns the number of bytes written (3), or 0 if `buf` is too small.
    pub fn serialize_boot(&self, buf: &mut [u8]) -> usize {
        if buf.len() < BOOT_MOUSE_REPORT_SIZE {
            return 0;
        }
        // Boot hosts only understand the first three buttons.
        buf[0] = self.buttons.bits() & 0x07;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        BOOT_MOUSE_REPORT_SIZE
    }

    /// Report-protocol bytes as a fixed array.
    pub fn to_bytes(&self) -> [u8; MOUSE_REPORT_SIZE] {
        let mut buf = [0u8; MOUSE_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.buttons.is_empty() && self.x == 0 && self.y == 0 && self.wheel == 0 && self.hwheel == 0
    }
}

// HID report descriptor (served through the Report Map characteristic)

/// Report Map for a 5-button mouse with vertical and horizontal wheels.
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x85, MOUSE_REPORT_ID, // Report ID (1)
    //
    //   - Buttons (5 bits + 3 padding) -
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x05, //     Usage Maximum (Button 5)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x05, //     Report Count (5)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x03, //     Report Size (3)
    0x81, 0x03, //     Input (Constant, Variable) - padding
    //
    //   - X, Y displacement + wheel -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x03, //     Report Count (3)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    //   - Horizontal wheel -
    0x05, 0x0C, //     Usage Page (Consumer)
    0x0A, 0x38, 0x02, // Usage (AC Pan)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];

//! Legacy advertising payloads (31-byte AD structures).
//!
//! The builder produces the advertising and scan-response data the
//! SoftDevice broadcasts; the parser walks raw payloads and is used to
//! check what we put on air.

use heapless::{String, Vec};

use crate::error::{Error, Result};

/// Maximum legacy advertising / scan-response payload length.
pub const MAX_ADV_LEN: usize = 31;

/// A single legacy advertising payload.
pub type AdvPayload = Vec<u8, MAX_ADV_LEN>;

// AD types (Bluetooth Assigned Numbers, "Common Data Types")
pub const AD_FLAGS: u8 = 0x01;
pub const AD_INCOMPLETE_16: u8 = 0x02;
pub const AD_COMPLETE_16: u8 = 0x03;
pub const AD_SHORTENED_NAME: u8 = 0x08;
pub const AD_COMPLETE_NAME: u8 = 0x09;
pub const AD_APPEARANCE: u8 = 0x19;

/// LE General Discoverable | BR/EDR Not Supported.
pub const FLAGS_GENERAL_DISCOVERABLE_LE_ONLY: u8 = 0x06;

/// GAP appearance: HID Mouse.
pub const APPEARANCE_HID_MOUSE: u16 = 0x03C2;

pub const UUID_HID_SERVICE: u16 = 0x1812;
pub const UUID_BATTERY_SERVICE: u16 = 0x180F;
pub const UUID_DEVICE_INFORMATION: u16 = 0x180A;

/// Incrementally appends AD structures, remembering whether anything
/// failed to fit.
pub struct AdvertisementBuilder {
    buf: AdvPayload,
    overflow: bool,
}

impl AdvertisementBuilder {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflow: false,
        }
    }

    /// Bytes still free for further AD structures (including their
    /// length and type octets).
    pub fn remaining(&self) -> usize {
        MAX_ADV_LEN - self.buf.len()
    }

    fn push_structure(&mut self, ad_type: u8, value: &[u8]) {
        if self.overflow || value.len() + 2 > self.remaining() {
            self.overflow = true;
            return;
        }
        // Capacity was checked above, so these pushes cannot fail.
        let _ = self.buf.push(value.len() as u8 + 1);
        let _ = self.buf.push(ad_type);
        let _ = self.buf.extend_from_slice(value);
    }

    pub fn flags(mut self, flags: u8) -> Self {
        self.push_structure(AD_FLAGS, &[flags]);
        self
    }

    pub fn appearance(mut self, appearance: u16) -> Self {
        self.push_structure(AD_APPEARANCE, &appearance.to_le_bytes());
        self
    }

    /// Add a list of 16-bit service UUIDs (little-endian on air).
    pub fn services_16(mut self, complete: bool, uuids: &[u16]) -> Self {
        let mut value: Vec<u8, MAX_ADV_LEN> = Vec::new();
        for uuid in uuids {
            if value.extend_from_slice(&uuid.to_le_bytes()).is_err() {
                self.overflow = true;
                return self;
            }
        }
        let ad_type = if complete { AD_COMPLETE_16 } else { AD_INCOMPLETE_16 };
        self.push_structure(ad_type, &value);
        self
    }

    /// Add the local name, falling back to a shortened name when the
    /// full name does not fit. The cut never splits a UTF-8 character.
    pub fn name(mut self, name: &str) -> Self {
        let room = self.remaining().saturating_sub(2);
        if name.len() <= room {
            self.push_structure(AD_COMPLETE_NAME, name.as_bytes());
            return self;
        }

        let mut cut = room;
        while cut > 0 && !name.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            self.overflow = true;
            return self;
        }
        self.push_structure(AD_SHORTENED_NAME, &name.as_bytes()[..cut]);
        self
    }

    pub fn build(self) -> Result<AdvPayload> {
        if self.overflow {
            return Err(Error::BufferOverflow);
        }
        Ok(self.buf)
    }
}

impl Default for AdvertisementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Advertising data: discoverable flags, mouse appearance, and the HID +
/// Battery service UUIDs hosts filter on.
pub fn advertising_data() -> Result<AdvPayload> {
    AdvertisementBuilder::new()
        .flags(FLAGS_GENERAL_DISCOVERABLE_LE_ONLY)
        .appearance(APPEARANCE_HID_MOUSE)
        .services_16(true, &[UUID_HID_SERVICE, UUID_BATTERY_SERVICE])
        .build()
}

/// Scan-response data carrying the device name.
pub fn scan_response_data(name: &str) -> Result<AdvPayload> {
    AdvertisementBuilder::new().name(name).build()
}

// Parsing

/// Iterate `(ad_type, value)` pairs; stops at the first malformed length.
fn structures(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut i = 0;
    core::iter::from_fn(move || {
        let len = *data.get(i)? as usize;
        if len == 0 || i + len >= data.len() {
            return None;
        }
        let item = (data[i + 1], &data[i + 2..i + 1 + len]);
        i += len + 1;
        Some(item)
    })
}

/// Check if raw advertisement data lists the given 16-bit service UUID.
pub fn contains_service_uuid(data: &[u8], uuid: u16) -> bool {
    let uuid_le = uuid.to_le_bytes();
    structures(data)
        .filter(|(ad_type, _)| *ad_type == AD_INCOMPLETE_16 || *ad_type == AD_COMPLETE_16)
        .any(|(_, value)| value.chunks_exact(2).any(|chunk| chunk == uuid_le))
}

/// Check if raw advertisement data contains the HID Service UUID (0x1812).
pub fn contains_hid_service_uuid(data: &[u8]) -> bool {
    contains_service_uuid(data, UUID_HID_SERVICE)
}

/// Extract the appearance value, if advertised.
pub fn extract_appearance(data: &[u8]) -> Option<u16> {
    structures(data)
        .find(|(ad_type, value)| *ad_type == AD_APPEARANCE && value.len() == 2)
        .map(|(_, value)| u16::from_le_bytes([value[0], value[1]]))
}

/// Extract complete/shortened local name from advertisement data.
///
/// Names that are not valid UTF-8, or not present, come back as "Unknown".
pub fn extract_device_name(data: &[u8]) -> String<32> {
    let mut name = String::new();
    let found = structures(data)
        .find(|(ad_type, _)| *ad_type == AD_SHORTENED_NAME || *ad_type == AD_COMPLETE_NAME)
        .and_then(|(_, value)| core::str::from_utf8(value).ok());

    match found {
        Some(text) => {
            for c in text.chars() {
                if name.push(c).is_err() {
                    break;
                }
            }
        }
        None => {
            let _ = name.push_str("Unknown");
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertising_data_fits_and_lists_hid() {
        let adv = advertising_data().unwrap();
        assert!(adv.len() <= MAX_ADV_LEN);
        assert_eq!(&adv[..3], &[0x02, AD_FLAGS, 0x06]);
        assert!(contains_hid_service_uuid(&adv));
        assert!(contains_service_uuid(&adv, UUID_BATTERY_SERVICE));
        assert_eq!(extract_appearance(&adv), Some(APPEARANCE_HID_MOUSE));
    }

    #[test]
    fn scan_response_carries_complete_name() {
        let scan = scan_response_data("uMyo Airmouse").unwrap();
        assert_eq!(scan[1], AD_COMPLETE_NAME);
        assert_eq!(extract_device_name(&scan).as_str(), "uMyo Airmouse");
    }

    #[test]
    fn long_name_is_shortened_to_fit() {
        let long = "An Extremely Long Air Mouse Device Name";
        let scan = scan_response_data(long).unwrap();
        assert_eq!(scan.len(), MAX_ADV_LEN);
        assert_eq!(scan[1], AD_SHORTENED_NAME);
        assert_eq!(extract_device_name(&scan).as_str(), &long[..29]);
    }

    #[test]
    fn name_filling_the_payload_exactly_stays_complete() {
        // 2 header bytes + 29 name bytes = 31.
        let exact = "abcdefghijklmnopqrstuvwxyzABC";
        assert_eq!(exact.len(), 29);
        let scan = scan_response_data(exact).unwrap();
        assert_eq!(scan.len(), MAX_ADV_LEN);
        assert_eq!(scan[1], AD_COMPLETE_NAME);
        assert_eq!(extract_device_name(&scan).as_str(), exact);

        let one_over = "abcdefghijklmnopqrstuvwxyzABCD";
        let scan = scan_response_data(one_over).unwrap();
        assert_eq!(scan.len(), MAX_ADV_LEN);
        assert_eq!(scan[1], AD_SHORTENED_NAME);
        assert_eq!(extract_device_name(&scan).as_str(), exact);
    }

    #[test]
    fn shortened_name_respects_char_boundaries() {
        // 28 ASCII bytes then a 2-byte character straddling the 29-byte limit.
        let name = "abcdefghijklmnopqrstuvwxyzab\u{e9}xyz";
        let scan = scan_response_data(name).unwrap();
        let parsed = extract_device_name(&scan);
        assert_eq!(parsed.as_str(), "abcdefghijklmnopqrstuvwxyzab");
    }

    #[test]
    fn overflowing_structures_are_reported() {
        let uuids = [0x1812u16; 16];
        let result = AdvertisementBuilder::new().services_16(true, &uuids).build();
        assert_eq!(result, Err(Error::BufferOverflow));
    }

    #[test]
    fn parser_rejects_non_hid_uuid() {
        let ad_data = [0x03, 0x03, 0x0F, 0x18];
        assert!(!contains_hid_service_uuid(&ad_data));
    }

    #[test]
    fn parser_handles_malformed_lengths() {
        assert!(!contains_hid_service_uuid(&[0x00]));
        assert!(!contains_hid_service_uuid(&[0x05, 0x03, 0x12]));
        assert_eq!(extract_device_name(&[0x02, 0x01, 0x06]).as_str(), "Unknown");
    }
}

//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertising** - builds the connectable advertisement that presents
//!    the device as a HID mouse ([`adv`], host-testable).
//! 2. **GATT server** - registers the HID, Battery and Device Information
//!    services and tracks the host's protocol-mode choice ([`server`]).
//! 3. **Link** - advertises, accepts a host, runs the GATT server for the
//!    lifetime of the connection and exposes the connection to the mouse
//!    handle ([`link`]).
//! 4. **Bonding** - "just works" pairing with keys kept in RAM ([`bonding`]).

pub mod adv;

#[cfg(feature = "embedded")]
pub mod bonding;
#[cfg(feature = "embedded")]
pub mod link;
#[cfg(feature = "embedded")]
pub mod server;

/// Device Information Service PnP ID characteristic (0x2A50) value.
///
/// Layout: vendor-id source, vendor id, product id, product version
/// (multi-byte fields little-endian).
pub fn pnp_id(vendor_id_source: u8, vendor_id: u16, product_id: u16, version: u16) -> [u8; 7] {
    let vid = vendor_id.to_le_bytes();
    let pid = product_id.to_le_bytes();
    let ver = version.to_le_bytes();
    [vendor_id_source, vid[0], vid[1], pid[0], pid[1], ver[0], ver[1]]
}

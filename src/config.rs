//! Application-wide constants and compile-time configuration.
//!
//! Device identity, timing parameters, and BLE protocol constants live
//! here so they can be tuned in one place.

use crate::mouse::DeviceIdentity;

// Identity

/// Advertised GAP name.
pub const DEVICE_NAME: &str = "uMyo Airmouse";

/// Manufacturer Name String exposed through the Device Information Service.
pub const MANUFACTURER: &str = "YourCompany";

/// Battery percentage reported at startup.
pub const INITIAL_BATTERY_LEVEL: u8 = 100;

/// The one identity this firmware advertises with.
pub const IDENTITY: DeviceIdentity =
    DeviceIdentity::new(DEVICE_NAME, MANUFACTURER, INITIAL_BATTERY_LEVEL);

// Control loop

/// Cursor displacement applied on every connected iteration.
pub const MOVE_DX: i8 = 5;
pub const MOVE_DY: i8 = 0;

/// Pause after a movement while a host is connected (ms).
pub const CONNECTED_PAUSE_MS: u64 = 500;

/// Pause between "waiting" log lines while no host is connected (ms).
pub const DISCONNECTED_PAUSE_MS: u64 = 1000;

// GPIO pin assignments (nRF52840-DK defaults)
//
// The status console uses UARTE0, routed to the DK's J-Link virtual COM
// port.  Adjust for your custom PCB.
//
//   Console TX     → P0.06  (115200 8N1)
//   Console RX     → P0.08  (unused)

// BLE

/// Advertising interval in 0.625 ms units. 48 = 30 ms (fast reconnect).
pub const BLE_ADV_INTERVAL: u32 = 48;

/// Preferred connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Maximum number of bonded hosts remembered (RAM only).
pub const MAX_BONDED_HOSTS: usize = 4;

// Device Information Service - PnP ID

/// Vendor ID source: 0x02 = USB Implementer's Forum.
pub const PNP_VENDOR_ID_SOURCE: u8 = 0x02;

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const PNP_VENDOR_ID: u16 = 0x1209;
pub const PNP_PRODUCT_ID: u16 = 0x0002;
pub const PNP_PRODUCT_VERSION: u16 = 0x0100;

//! GATT server - HID over GATT mouse, Battery and Device Information
//! services.
//!
//! The HID service needs a Report Reference descriptor on its input
//! report, which the `gatt_service` macro cannot express, so the table is
//! registered through the SoftDevice service builder.

use core::sync::atomic::{AtomicU8, Ordering};

use defmt::{debug, info, warn};
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, RegisterError, WriteOp};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

use crate::ble::adv::{UUID_BATTERY_SERVICE, UUID_DEVICE_INFORMATION, UUID_HID_SERVICE};
use crate::ble::pnp_id;
use crate::config;
use crate::error::{Error, GattError, Result};
use crate::hid::mouse::{BOOT_MOUSE_REPORT_SIZE, MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
use crate::hid::{ControlPoint, ProtocolMode, HID_INFORMATION, MOUSE_INPUT_REPORT_REFERENCE};
use crate::mouse::DeviceIdentity;

const HID_SERVICE: Uuid = Uuid::new_16(UUID_HID_SERVICE);
const HID_INFO: Uuid = Uuid::new_16(0x2A4A);
const HID_REPORT_MAP: Uuid = Uuid::new_16(0x2A4B);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2A4C);
const HID_REPORT: Uuid = Uuid::new_16(0x2A4D);
const HID_PROTOCOL_MODE: Uuid = Uuid::new_16(0x2A4E);
const HID_BOOT_MOUSE_INPUT: Uuid = Uuid::new_16(0x2A33);
const HID_REPORT_REFERENCE: Uuid = Uuid::new_16(0x2908);

const BATTERY_SERVICE: Uuid = Uuid::new_16(UUID_BATTERY_SERVICE);
const BATTERY_LEVEL: Uuid = Uuid::new_16(0x2A19);

const DEVICE_INFORMATION: Uuid = Uuid::new_16(UUID_DEVICE_INFORMATION);
const MANUFACTURER_NAME: Uuid = Uuid::new_16(0x2A29);
const PNP_ID: Uuid = Uuid::new_16(0x2A50);

/// Events raised from host writes.
#[derive(Clone, Copy, defmt::Format)]
pub enum ServerEvent {
    ProtocolMode(ProtocolMode),
    ControlPoint(ControlPoint),
    InputNotifications(bool),
    BootNotifications(bool),
    BatteryNotifications(bool),
}

/// Attribute handles of the registered GATT table plus the per-connection
/// HID state the host controls.
pub struct MouseServer {
    input_report: u16,
    input_report_cccd: u16,
    boot_input: u16,
    boot_input_cccd: u16,
    protocol_mode_handle: u16,
    control_point: u16,
    battery_level: u16,
    battery_level_cccd: u16,

    protocol_mode: AtomicU8,
}

fn register_failed(_: RegisterError) -> Error {
    Error::Gatt(GattError::RegisterFailed)
}

impl MouseServer {
    /// Register all services. Must run before the SoftDevice event loop
    /// starts.
    pub fn new(sd: &mut Softdevice, identity: &DeviceIdentity) -> Result<Self> {
        // HID service - encrypted link required by HOGP.
        let mut hid = ServiceBuilder::new(sd, HID_SERVICE).map_err(register_failed)?;

        hid.add_characteristic(
            HID_INFO,
            Attribute::new(HID_INFORMATION).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )
        .map_err(register_failed)?
        .build();

        hid.add_characteristic(
            HID_REPORT_MAP,
            Attribute::new(MOUSE_REPORT_DESCRIPTOR).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )
        .map_err(register_failed)?
        .build();

        let control_point = hid
            .add_characteristic(
                HID_CONTROL_POINT,
                Attribute::new([0u8]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().write_without_response()),
            )
            .map_err(register_failed)?
            .build();

        let protocol_mode = hid
            .add_characteristic(
                HID_PROTOCOL_MODE,
                Attribute::new([ProtocolMode::Report.as_u8()]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().write_without_response()),
            )
            .map_err(register_failed)?
            .build();

        let mut input = hid
            .add_characteristic(
                HID_REPORT,
                Attribute::new([0u8; MOUSE_REPORT_SIZE]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().notify()),
            )
            .map_err(register_failed)?;
        input
            .add_descriptor(
                HID_REPORT_REFERENCE,
                Attribute::new(MOUSE_INPUT_REPORT_REFERENCE).security(SecurityMode::JustWorks),
            )
            .map_err(register_failed)?;
        let input = input.build();

        let boot_input = hid
            .add_characteristic(
                HID_BOOT_MOUSE_INPUT,
                Attribute::new([0u8; BOOT_MOUSE_REPORT_SIZE]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().notify()),
            )
            .map_err(register_failed)?
            .build();

        hid.build();

        // Battery service.
        let mut battery = ServiceBuilder::new(sd, BATTERY_SERVICE).map_err(register_failed)?;
        let battery_level = battery
            .add_characteristic(
                BATTERY_LEVEL,
                Attribute::new([identity.battery_level]),
                Metadata::new(Properties::new().read().notify()),
            )
            .map_err(register_failed)?
            .build();
        battery.build();

        // Device Information service.
        let mut dis = ServiceBuilder::new(sd, DEVICE_INFORMATION).map_err(register_failed)?;
        dis.add_characteristic(
            MANUFACTURER_NAME,
            Attribute::new(identity.manufacturer.as_bytes()),
            Metadata::new(Properties::new().read()),
        )
        .map_err(register_failed)?
        .build();
        dis.add_characteristic(
            PNP_ID,
            Attribute::new(pnp_id(
                config::PNP_VENDOR_ID_SOURCE,
                config::PNP_VENDOR_ID,
                config::PNP_PRODUCT_ID,
                config::PNP_PRODUCT_VERSION,
            )),
            Metadata::new(Properties::new().read()),
        )
        .map_err(register_failed)?
        .build();
        dis.build();

        info!("GATT table registered (HID, Battery, Device Information)");

        Ok(Self {
            input_report: input.value_handle,
            input_report_cccd: input.cccd_handle,
            boot_input: boot_input.value_handle,
            boot_input_cccd: boot_input.cccd_handle,
            protocol_mode_handle: protocol_mode.value_handle,
            control_point: control_point.value_handle,
            battery_level: battery_level.value_handle,
            battery_level_cccd: battery_level.cccd_handle,
            protocol_mode: AtomicU8::new(ProtocolMode::Report.as_u8()),
        })
    }

    /// Protocol the connected host selected (Report until told otherwise).
    pub fn protocol_mode(&self) -> ProtocolMode {
        ProtocolMode::from_u8(self.protocol_mode.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Put both the cached mode and the readable attribute back to Report
    /// protocol. Call on every new connection.
    pub fn reset_protocol_mode(&self, sd: &Softdevice) -> Result<()> {
        self.store_protocol_mode(sd, ProtocolMode::on_connect())
    }

    fn store_protocol_mode(&self, sd: &Softdevice, mode: ProtocolMode) -> Result<()> {
        self.protocol_mode.store(mode.as_u8(), Ordering::Relaxed);
        // The SoftDevice keeps whatever byte the host wrote; overwrite it.
        gatt_server::set_value(sd, self.protocol_mode_handle, &[mode.as_u8()])
            .map_err(|_| GattError::SetValueFailed)?;
        Ok(())
    }

    /// Send `data` on the input characteristic matching the current
    /// protocol mode.
    pub fn notify_input(&self, conn: &Connection, mode: ProtocolMode, data: &[u8]) -> Result<()> {
        let handle = match mode {
            ProtocolMode::Report => self.input_report,
            ProtocolMode::Boot => self.boot_input,
        };
        gatt_server::notify_value(conn, handle, data).map_err(|_| Error::Notify)
    }

    /// Update the stored battery level; notify it if a host is listening.
    pub fn update_battery_level(&self, sd: &Softdevice, conn: Option<&Connection>, level: u8) -> Result<()> {
        gatt_server::set_value(sd, self.battery_level, &[level])
            .map_err(|_| GattError::SetValueFailed)?;
        if let Some(conn) = conn {
            if gatt_server::notify_value(conn, self.battery_level, &[level]).is_err() {
                debug!("Battery level not notified (host not subscribed)");
            }
        }
        Ok(())
    }

    /// Apply a host-write event to the server state.
    pub fn handle_event(&self, sd: &Softdevice, event: ServerEvent) {
        match event {
            ServerEvent::ProtocolMode(mode) => {
                info!("Host selected {} protocol", mode);
                if let Err(e) = self.store_protocol_mode(sd, mode) {
                    warn!("Protocol mode attribute not restored: {}", e);
                }
            }
            ServerEvent::ControlPoint(cmd) => info!("HID control point: {}", cmd),
            ServerEvent::InputNotifications(on) => info!("Input report notifications: {}", on),
            ServerEvent::BootNotifications(on) => info!("Boot report notifications: {}", on),
            ServerEvent::BatteryNotifications(on) => {
                info!("Battery level notifications: {}", on)
            }
        }
    }
}

impl gatt_server::Server for MouseServer {
    type Event = ServerEvent;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        // A rejected value still yields the current mode, so the handler
        // rewrites the attribute and the bad byte never stays readable.
        if handle == self.protocol_mode_handle {
            let mode = ProtocolMode::after_write(self.protocol_mode(), data);
            return Some(ServerEvent::ProtocolMode(mode));
        }

        let first = *data.first()?;
        // CCCD: bit 0 = notifications enabled.
        let notify = first & 0x01 != 0;

        if handle == self.control_point {
            ControlPoint::from_u8(first).map(ServerEvent::ControlPoint)
        } else if handle == self.input_report_cccd {
            Some(ServerEvent::InputNotifications(notify))
        } else if handle == self.boot_input_cccd {
            Some(ServerEvent::BootNotifications(notify))
        } else if handle == self.battery_level_cccd {
            Some(ServerEvent::BatteryNotifications(notify))
        } else {
            None
        }
    }
}

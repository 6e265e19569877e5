//! Host link - advertising, connection lifetime, and the [`MouseLink`]
//! implementation the mouse handle sends reports through.
//!
//! The connection manager publishes the live [`Connection`] into a shared
//! slot; the control loop only ever reads that slot, so "connected" is
//! exactly "the manager is currently serving a host".

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};

use crate::ble::adv::{AdvPayload, APPEARANCE_HID_MOUSE};
use crate::ble::bonding::Bonder;
use crate::ble::server::MouseServer;
use crate::config;
use crate::error::{Error, GattError, Result};
use crate::hid::{self, MouseReport};
use crate::mouse::MouseLink;

/// Connection currently served, if any.
static CURRENT: Mutex<CriticalSectionRawMutex, RefCell<Option<Connection>>> =
    Mutex::new(RefCell::new(None));

fn current_connection() -> Option<Connection> {
    CURRENT.lock(|slot| slot.borrow().clone())
}

fn publish_connection(conn: Option<Connection>) {
    CURRENT.lock(|slot| *slot.borrow_mut() = conn);
}

/// Set the GAP appearance and preferred connection parameters.
///
/// Call once after the SoftDevice is enabled.
pub fn configure_gap(_sd: &Softdevice) -> Result<()> {
    let ret = unsafe { raw::sd_ble_gap_appearance_set(APPEARANCE_HID_MOUSE) };
    GattError::check(ret)?;

    let ppcp = raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    };
    let ret = unsafe { raw::sd_ble_gap_ppcp_set(&ppcp) };
    GattError::check(ret)?;
    Ok(())
}

/// Advertise, serve one host until it disconnects, repeat.
pub async fn run(
    sd: &'static Softdevice,
    server: &'static MouseServer,
    bonder: &'static Bonder,
    adv_data: &'static AdvPayload,
    scan_data: &'static AdvPayload,
) -> ! {
    let adv_config = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL,
        ..Default::default()
    };

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: adv_data.as_slice(),
            scan_data: scan_data.as_slice(),
        };

        info!("Advertising as HID mouse");
        let conn = match peripheral::advertise_pairable(sd, adv, &adv_config, bonder).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Advertising failed: {}", e);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };

        info!("Host connected");
        if let Err(e) = server.reset_protocol_mode(sd) {
            warn!("Protocol mode not reset: {}", e);
        }
        publish_connection(Some(conn.clone()));

        let _ = gatt_server::run(&conn, server, |event| server.handle_event(sd, event)).await;

        publish_connection(None);
        info!("Host disconnected");
    }
}

/// [`MouseLink`] backed by the SoftDevice GATT server.
pub struct SoftdeviceLink {
    sd: &'static Softdevice,
    server: &'static MouseServer,
}

impl SoftdeviceLink {
    pub fn new(sd: &'static Softdevice, server: &'static MouseServer) -> Self {
        Self { sd, server }
    }
}

impl MouseLink for SoftdeviceLink {
    fn is_connected(&self) -> bool {
        CURRENT.lock(|slot| slot.borrow().is_some())
    }

    fn send_report(&mut self, report: &MouseReport) -> Result<()> {
        let conn = current_connection().ok_or(Error::Disconnected)?;
        let mode = self.server.protocol_mode();

        let mut buf = [0u8; hid::mouse::MOUSE_REPORT_SIZE];
        let len = hid::encode_report(report, mode, &mut buf);
        if len == 0 {
            return Err(Error::BufferOverflow);
        }
        self.server.notify_input(&conn, mode, &buf[..len])
    }

    fn set_battery_level(&mut self, level: u8) -> Result<()> {
        let conn = current_connection();
        self.server
            .update_battery_level(self.sd, conn.as_ref(), level)
    }
}

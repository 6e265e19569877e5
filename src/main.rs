//! airmouse firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Brings up the serial console and the SoftDevice, registers the GATT
//! table, starts the BLE connection manager, then runs the air mouse
//! control loop forever.

#![no_std]
#![no_main]

use core::mem;

use airmouse::ble::adv::{self, AdvPayload};
use airmouse::ble::bonding::{self, Bonder};
use airmouse::ble::link::{self, SoftdeviceLink};
use airmouse::ble::server::MouseServer;
use airmouse::config;
use airmouse::console;
use airmouse::control::{Airmouse, Step};
use airmouse::mouse::BleMouse;
use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::uarte::{self, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::Timer;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

static SERVER: StaticCell<MouseServer> = StaticCell::new();
static ADV_DATA: StaticCell<AdvPayload> = StaticCell::new();
static SCAN_DATA: StaticCell<AdvPayload> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(
    sd: &'static Softdevice,
    server: &'static MouseServer,
    bonder: &'static Bonder,
    adv_data: &'static AdvPayload,
    scan_data: &'static AdvPayload,
) -> ! {
    link::run(sd, server, bonder, adv_data, scan_data).await
}

/// Write one status line to the serial console. Console failures never
/// stop the mouse.
async fn write_status(serial: &mut UarteTx<'_, peripherals::UARTE0>, line: &str) {
    info!("{=str}", console::text(line));
    if let Err(e) = serial.write(line.as_bytes()).await {
        warn!("Serial write failed: {}", e);
    }
}

fn softdevice_config() -> nrf_softdevice::Config {
    let name = config::IDENTITY.name;
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: name.as_ptr() as _,
            current_len: name.len() as u16,
            max_len: name.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Priorities 0, 1 and 4 belong to the SoftDevice.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);

    interrupt::UARTE0_UART0.set_priority(Priority::P3);
    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let mut serial = UarteTx::new(p.UARTE0, Irqs, p.P0_06, uart_config);

    write_status(&mut serial, console::STARTUP_LINE).await;

    let sd = Softdevice::enable(&softdevice_config());
    let server: &'static MouseServer = SERVER.init(unwrap!(MouseServer::new(sd, &config::IDENTITY)));
    let sd: &'static Softdevice = sd;
    if let Err(e) = link::configure_gap(sd) {
        warn!("GAP appearance / connection parameters not set: {}", e);
    }

    let adv_data = ADV_DATA.init(unwrap!(adv::advertising_data()));
    let scan_data = SCAN_DATA.init(unwrap!(adv::scan_response_data(config::IDENTITY.name)));

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble_task(
        sd,
        server,
        bonding::bonder(),
        adv_data,
        scan_data
    )));

    let mut mouse = BleMouse::new(config::IDENTITY, SoftdeviceLink::new(sd, server));
    if let Err(e) = mouse.begin() {
        warn!("Battery level not published: {}", e);
    }

    let airmouse = Airmouse::from_config();
    loop {
        let step = airmouse.step(&mut mouse);
        if let Step::Moved { result: Err(e), .. } = step {
            warn!("Mouse report dropped: {}", e);
        }
        if let Some(line) = console::status_line(&step) {
            write_status(&mut serial, line).await;
        }
        Timer::after_millis(step.pause_ms()).await;
    }
}

//! "Just works" pairing and bonding for connecting hosts.
//!
//! Bonds live in RAM only: a power cycle forgets them and the host has to
//! pair again. Each bond also keeps the host's CCCD state (system
//! attributes) so notifications resume without re-subscribing.

use core::cell::RefCell;

use defmt::{info, warn};
use heapless::Vec;
use nrf_softdevice::ble::gatt_server;
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};
use static_cell::StaticCell;

use crate::config::MAX_BONDED_HOSTS;

/// Room for the CCCD values of every notifying characteristic.
const SYS_ATTRS_CAPACITY: usize = 62;

struct HostBond {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
    sys_attrs: Vec<u8, SYS_ATTRS_CAPACITY>,
}

pub struct Bonder {
    hosts: RefCell<Vec<HostBond, MAX_BONDED_HOSTS>>,
}

impl Bonder {
    fn new() -> Self {
        Self {
            hosts: RefCell::new(Vec::new()),
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        info!("Host bonded");
        let mut hosts = self.hosts.borrow_mut();
        if let Some(existing) = hosts.iter_mut().find(|h| h.master_id == master_id) {
            existing.key = key;
            existing.peer_id = peer_id;
            return;
        }

        // Oldest bond makes room for the newest.
        if hosts.is_full() {
            hosts.remove(0);
        }

        let _ = hosts.push(HostBond {
            master_id,
            key,
            peer_id,
            sys_attrs: Vec::new(),
        });
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.hosts
            .borrow()
            .iter()
            .find_map(|h| (h.master_id == master_id).then_some(h.key))
    }

    fn save_sys_attrs(&self, conn: &Connection) {
        let addr = conn.peer_address();
        let mut hosts = self.hosts.borrow_mut();
        let Some(host) = hosts.iter_mut().find(|h| h.peer_id.is_match(addr)) else {
            return;
        };

        let _ = host.sys_attrs.resize(SYS_ATTRS_CAPACITY, 0);
        match gatt_server::get_sys_attrs(conn, &mut host.sys_attrs) {
            Ok(len) => host.sys_attrs.truncate(len),
            Err(_) => {
                warn!("Could not read system attributes for bonded host");
                host.sys_attrs.clear();
            }
        }
    }

    fn load_sys_attrs(&self, conn: &Connection) {
        let addr = conn.peer_address();
        let hosts = self.hosts.borrow();
        let attrs = hosts
            .iter()
            .find(|h| h.peer_id.is_match(addr))
            .filter(|h| !h.sys_attrs.is_empty())
            .map(|h| h.sys_attrs.as_slice());

        if gatt_server::set_sys_attrs(conn, attrs).is_err() {
            warn!("Could not restore system attributes");
        }
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("BLE security mode updated: {}", mode);
    }
}

/// The process-wide bond table. Must be called exactly once.
pub fn bonder() -> &'static Bonder {
    static BONDER: StaticCell<Bonder> = StaticCell::new();
    BONDER.init(Bonder::new())
}

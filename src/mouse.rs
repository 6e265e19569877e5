//! The BLE mouse handle.
//!
//! [`BleMouse`] owns the device identity and the held-button state, turns
//! high-level calls (move, click, scroll) into HID reports, and hands them
//! to a [`MouseLink`]. The link is the only part that touches the radio, so
//! everything here runs unchanged on the host.

use crate::error::{Error, Result};
use crate::hid::{MouseButtons, MouseReport};

/// Highest value the Battery Level characteristic accepts.
pub const MAX_BATTERY_LEVEL: u8 = 100;

/// What the device advertises itself as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// GAP device name.
    pub name: &'static str,
    /// Device Information Service manufacturer string.
    pub manufacturer: &'static str,
    /// Battery percentage (0..=100).
    pub battery_level: u8,
}

impl DeviceIdentity {
    /// Battery levels above 100 are clamped.
    pub const fn new(name: &'static str, manufacturer: &'static str, battery_level: u8) -> Self {
        Self {
            name,
            manufacturer,
            battery_level: clamp_battery(battery_level),
        }
    }
}

const fn clamp_battery(level: u8) -> u8 {
    if level > MAX_BATTERY_LEVEL {
        MAX_BATTERY_LEVEL
    } else {
        level
    }
}

/// Transport for mouse reports.
///
/// The embedded implementation notifies through the SoftDevice GATT server;
/// tests substitute an in-memory recorder.
pub trait MouseLink {
    /// `true` while a host is connected and can receive reports.
    fn is_connected(&self) -> bool;

    /// Deliver one input report to the host.
    fn send_report(&mut self, report: &MouseReport) -> Result<()>;

    /// Publish a new battery level (and notify it when connected).
    fn set_battery_level(&mut self, level: u8) -> Result<()>;
}

/// Peripheral handle for the BLE HID mouse.
pub struct BleMouse<L: MouseLink> {
    identity: DeviceIdentity,
    link: L,
    buttons: MouseButtons,
    started: bool,
}

impl<L: MouseLink> BleMouse<L> {
    pub fn new(identity: DeviceIdentity, link: L) -> Self {
        Self {
            identity,
            link,
            buttons: MouseButtons::NONE,
            started: false,
        }
    }

    /// Publish the initial battery level on the link. Calling it again is
    /// a no-op.
    pub fn begin(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.link.set_battery_level(self.identity.battery_level)?;
        self.started = true;
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn battery_level(&self) -> u8 {
        self.identity.battery_level
    }

    /// Buttons currently held down.
    pub fn held(&self) -> MouseButtons {
        self.buttons
    }

    pub fn is_pressed(&self, buttons: MouseButtons) -> bool {
        self.buttons.contains(buttons)
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Relative cursor move with the held buttons kept down.
    pub fn move_by(&mut self, dx: i8, dy: i8) -> Result<()> {
        self.send(MouseReport::movement(self.buttons, dx, dy))
    }

    /// Scroll vertically and/or horizontally.
    pub fn scroll(&mut self, wheel: i8, hwheel: i8) -> Result<()> {
        let report = MouseReport {
            wheel,
            hwheel,
            ..MouseReport::buttons(self.buttons)
        };
        self.send(report)
    }

    /// Press then release `buttons` (two reports).
    pub fn click(&mut self, buttons: MouseButtons) -> Result<()> {
        let prior = self.buttons;
        self.send(MouseReport::buttons(prior | buttons))?;
        self.send(MouseReport::buttons(prior))
    }

    /// Hold `buttons` down. Only sends a report if the held set changes.
    pub fn press(&mut self, buttons: MouseButtons) -> Result<()> {
        self.set_buttons(self.buttons | buttons)
    }

    /// Let go of `buttons`. Only sends a report if the held set changes.
    pub fn release(&mut self, buttons: MouseButtons) -> Result<()> {
        self.set_buttons(self.buttons.difference(buttons))
    }

    /// Update the battery level; values above 100 are clamped.
    pub fn set_battery_level(&mut self, level: u8) -> Result<()> {
        let level = clamp_battery(level);
        self.identity.battery_level = level;
        self.link.set_battery_level(level)
    }

    fn set_buttons(&mut self, buttons: MouseButtons) -> Result<()> {
        if buttons == self.buttons {
            return Ok(());
        }
        self.send(MouseReport::buttons(buttons))?;
        self.buttons = buttons;
        Ok(())
    }

    fn send(&mut self, report: MouseReport) -> Result<()> {
        if !self.link.is_connected() {
            return Err(Error::Disconnected);
        }
        self.link.send_report(&report)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use heapless::Vec;

    /// In-memory link that records everything sent through it.
    #[derive(Default)]
    pub struct RecordingLink {
        pub connected: bool,
        pub reports: Vec<MouseReport, 32>,
        pub battery_updates: Vec<u8, 8>,
        pub fail_sends: bool,
    }

    impl RecordingLink {
        pub fn connected() -> Self {
            Self {
                connected: true,
                ..Self::default()
            }
        }
    }

    impl MouseLink for RecordingLink {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn send_report(&mut self, report: &MouseReport) -> Result<()> {
            if self.fail_sends {
                return Err(Error::Notify);
            }
            self.reports.push(*report).map_err(|_| Error::BufferOverflow)
        }

        fn set_battery_level(&mut self, level: u8) -> Result<()> {
            self.battery_updates
                .push(level)
                .map_err(|_| Error::BufferOverflow)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::RecordingLink;
    use super::*;

    const IDENTITY: DeviceIdentity = DeviceIdentity::new("Test Mouse", "Acme", 80);

    #[test]
    fn identity_clamps_battery() {
        let identity = DeviceIdentity::new("m", "x", 250);
        assert_eq!(identity.battery_level, 100);
    }

    #[test]
    fn begin_publishes_battery_once() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::default());
        assert!(!mouse.is_started());
        mouse.begin().unwrap();
        mouse.begin().unwrap();
        assert!(mouse.is_started());
        assert_eq!(mouse.link().battery_updates.as_slice(), &[80]);
    }

    #[test]
    fn move_requires_connection() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::default());
        assert_eq!(mouse.move_by(5, 0), Err(Error::Disconnected));
        assert!(mouse.link().reports.is_empty());
    }

    #[test]
    fn move_sends_one_relative_report() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::connected());
        mouse.move_by(5, 0).unwrap();
        assert_eq!(
            mouse.link().reports.as_slice(),
            &[MouseReport::movement(MouseButtons::NONE, 5, 0)]
        );
    }

    #[test]
    fn click_presses_then_releases() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::connected());
        mouse.click(MouseButtons::LEFT).unwrap();
        let reports = &mouse.link().reports;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].buttons, MouseButtons::LEFT);
        assert_eq!(reports[1].buttons, MouseButtons::NONE);
        assert!(!mouse.is_pressed(MouseButtons::LEFT));
    }

    #[test]
    fn press_and_release_track_held_buttons() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::connected());
        mouse.press(MouseButtons::LEFT).unwrap();
        mouse.press(MouseButtons::LEFT).unwrap(); // no change, no report
        mouse.press(MouseButtons::RIGHT).unwrap();
        assert!(mouse.is_pressed(MouseButtons::LEFT | MouseButtons::RIGHT));

        // Drag keeps buttons held.
        mouse.move_by(-3, 2).unwrap();

        mouse.release(MouseButtons::LEFT).unwrap();
        mouse.release(MouseButtons::LEFT).unwrap(); // no change, no report
        assert_eq!(mouse.held(), MouseButtons::RIGHT);

        let buttons: heapless::Vec<u8, 8> = mouse
            .link()
            .reports
            .iter()
            .map(|r| r.buttons.bits())
            .collect();
        assert_eq!(buttons.as_slice(), &[0x01, 0x03, 0x03, 0x02]);
        assert_eq!(mouse.link().reports[2].x, -3);
    }

    #[test]
    fn failed_press_leaves_state_unchanged() {
        let mut link = RecordingLink::connected();
        link.fail_sends = true;
        let mut mouse = BleMouse::new(IDENTITY, link);
        assert_eq!(mouse.press(MouseButtons::MIDDLE), Err(Error::Notify));
        assert_eq!(mouse.held(), MouseButtons::NONE);
    }

    #[test]
    fn scroll_carries_both_wheels() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::connected());
        mouse.scroll(-2, 4).unwrap();
        let report = mouse.link().reports[0];
        assert_eq!((report.wheel, report.hwheel), (-2, 4));
        assert_eq!((report.x, report.y), (0, 0));
    }

    #[test]
    fn battery_level_is_clamped_and_forwarded() {
        let mut mouse = BleMouse::new(IDENTITY, RecordingLink::default());
        mouse.set_battery_level(42).unwrap();
        mouse.set_battery_level(180).unwrap();
        assert_eq!(mouse.battery_level(), 100);
        assert_eq!(mouse.link().battery_updates.as_slice(), &[42, 100]);
    }
}

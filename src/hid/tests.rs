//! Unit tests for HID report serialization and protocol values.
//!
//! These tests run on the host (not embedded) and verify the pure
//! logic of report encoding for both HID protocol modes.

use super::mouse::{
    MouseButtons, MouseReport, BOOT_MOUSE_REPORT_SIZE, MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE,
};
use super::{encode_report, ControlPoint, ProtocolMode, MOUSE_INPUT_REPORT_REFERENCE};

// ═══════════════════════════════════════════════════════════════════════════
// Mouse Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn mouse_report_empty_is_idle() {
    let report = MouseReport::empty();
    assert!(report.is_idle());
    assert_eq!(report.to_bytes(), [0; MOUSE_REPORT_SIZE]);
}

#[test]
fn mouse_report_movement_layout() {
    let report = MouseReport::movement(MouseButtons::NONE, 5, 0);
    assert_eq!(report.to_bytes(), [0x00, 0x05, 0x00, 0x00, 0x00]);
    assert!(!report.is_idle());
}

#[test]
fn mouse_report_negative_deltas_are_twos_complement() {
    let report = MouseReport {
        buttons: MouseButtons::LEFT,
        x: -128,
        y: 127,
        wheel: -3,
        hwheel: 1,
    };
    assert_eq!(report.to_bytes(), [0x01, 0x80, 0x7F, 0xFD, 0x01]);
}

#[test]
fn mouse_report_serialize_buffer_too_small() {
    let report = MouseReport::empty();
    let mut buf = [0u8; 4];
    assert_eq!(report.serialize(&mut buf), 0);

    let mut boot = [0u8; 2];
    assert_eq!(report.serialize_boot(&mut boot), 0);
}

#[test]
fn boot_report_drops_wheels_and_extra_buttons() {
    let report = MouseReport {
        buttons: MouseButtons::LEFT | MouseButtons::BACK | MouseButtons::FORWARD,
        x: 10,
        y: -5,
        wheel: 4,
        hwheel: -4,
    };
    let mut buf = [0u8; 8];
    assert_eq!(report.serialize_boot(&mut buf), BOOT_MOUSE_REPORT_SIZE);
    assert_eq!(&buf[..3], &[0x01, 0x0A, 0xFB]);
    assert_eq!(&buf[3..], &[0; 5]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Button Bitfield Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn buttons_bit_values() {
    assert_eq!(MouseButtons::LEFT.bits(), 0x01);
    assert_eq!(MouseButtons::RIGHT.bits(), 0x02);
    assert_eq!(MouseButtons::MIDDLE.bits(), 0x04);
    assert_eq!(MouseButtons::BACK.bits(), 0x08);
    assert_eq!(MouseButtons::FORWARD.bits(), 0x10);
}

#[test]
fn buttons_contains_and_difference() {
    let held = MouseButtons::LEFT | MouseButtons::RIGHT;
    assert!(held.contains(MouseButtons::LEFT));
    assert!(held.contains(MouseButtons::LEFT | MouseButtons::RIGHT));
    assert!(!held.contains(MouseButtons::MIDDLE));
    assert!(!held.contains(MouseButtons::NONE));
    assert_eq!(held.difference(MouseButtons::LEFT), MouseButtons::RIGHT);
}

#[test]
fn buttons_from_bits_masks_undeclared() {
    assert_eq!(MouseButtons::from_bits(0xFF), MouseButtons::ALL);
}

// ═══════════════════════════════════════════════════════════════════════════
// Protocol Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn protocol_mode_decoding() {
    assert_eq!(ProtocolMode::from_u8(0), Some(ProtocolMode::Boot));
    assert_eq!(ProtocolMode::from_u8(1), Some(ProtocolMode::Report));
    assert_eq!(ProtocolMode::from_u8(2), None);
    assert_eq!(ProtocolMode::default(), ProtocolMode::Report);
    assert_eq!(ProtocolMode::Boot.as_u8(), 0);
}

#[test]
fn protocol_mode_write_switches_on_valid_value() {
    assert_eq!(
        ProtocolMode::after_write(ProtocolMode::Report, &[0x00]),
        ProtocolMode::Boot
    );
    assert_eq!(
        ProtocolMode::after_write(ProtocolMode::Boot, &[0x01]),
        ProtocolMode::Report
    );
}

#[test]
fn protocol_mode_invalid_write_keeps_current_mode() {
    // The stored attribute is rewritten from this value, so a rejected
    // byte must never become readable.
    for current in [ProtocolMode::Boot, ProtocolMode::Report] {
        assert_eq!(ProtocolMode::after_write(current, &[0x02]), current);
        assert_eq!(ProtocolMode::after_write(current, &[0xFF, 0x01]), current);
        assert_eq!(ProtocolMode::after_write(current, &[]), current);
    }
}

#[test]
fn new_connection_starts_in_report_protocol() {
    // A previous host left the device in Boot mode.
    let stale = ProtocolMode::after_write(ProtocolMode::Report, &[0x00]);
    assert_eq!(stale, ProtocolMode::Boot);
    assert_eq!(ProtocolMode::on_connect().as_u8(), 0x01);
}

#[test]
fn control_point_decoding() {
    assert_eq!(ControlPoint::from_u8(0), Some(ControlPoint::Suspend));
    assert_eq!(ControlPoint::from_u8(1), Some(ControlPoint::ExitSuspend));
    assert_eq!(ControlPoint::from_u8(7), None);
}

#[test]
fn encode_report_follows_protocol_mode() {
    let report = MouseReport::movement(MouseButtons::RIGHT, 1, 2);
    let mut buf = [0u8; 8];
    assert_eq!(encode_report(&report, ProtocolMode::Report, &mut buf), 5);
    assert_eq!(encode_report(&report, ProtocolMode::Boot, &mut buf), 3);
}

#[test]
fn report_reference_matches_descriptor_report_id() {
    // 0x85 = Report ID item; its payload must match the GATT descriptor.
    let pos = MOUSE_REPORT_DESCRIPTOR
        .iter()
        .position(|&b| b == 0x85)
        .expect("descriptor declares a report id");
    assert_eq!(MOUSE_REPORT_DESCRIPTOR[pos + 1], MOUSE_INPUT_REPORT_REFERENCE[0]);
}

#[test]
fn report_descriptor_collections_are_balanced() {
    let opens = MOUSE_REPORT_DESCRIPTOR.iter().filter(|&&b| b == 0xA1).count();
    let closes = MOUSE_REPORT_DESCRIPTOR.iter().filter(|&&b| b == 0xC0).count();
    assert_eq!(opens, 2);
    assert_eq!(closes, 2);
}

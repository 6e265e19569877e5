//! Plain-text status lines for the 115200-baud serial console.
//!
//! The same text also goes to `defmt`; serial gets the CRLF-terminated
//! form so a terminal on the board's UART shows one status per line.

use crate::control::Step;

/// Printed once, before the BLE stack comes up.
pub const STARTUP_LINE: &str = "Starting BLE Mouse...\r\n";

/// Printed on every iteration without a connected host.
pub const WAITING_LINE: &str = "Waiting for connection...\r\n";

/// Serial line for one loop iteration. Connected iterations are silent.
pub fn status_line(step: &Step) -> Option<&'static str> {
    match step {
        Step::Waiting { .. } => Some(WAITING_LINE),
        Step::Moved { .. } => None,
    }
}

/// `line` without its terminator, for `defmt`.
pub fn text(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

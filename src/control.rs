//! The air mouse control loop.
//!
//! One [`Airmouse::step`] is one loop iteration: check the link, then either
//! nudge the cursor or report that we are still waiting. The caller owns the
//! clock and sleeps for [`Step::pause_ms`] between iterations.

use crate::config;
use crate::error::Error;
use crate::mouse::{BleMouse, MouseLink};

/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// A host was connected and one movement was requested. `result` is
    /// informational only; the loop never retries.
    Moved {
        dx: i8,
        dy: i8,
        result: Result<(), Error>,
        pause_ms: u64,
    },
    /// No host is connected.
    Waiting { pause_ms: u64 },
}

impl Step {
    pub fn pause_ms(&self) -> u64 {
        match self {
            Step::Moved { pause_ms, .. } | Step::Waiting { pause_ms } => *pause_ms,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Step::Waiting { .. })
    }
}

/// Fixed-motion polling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Airmouse {
    dx: i8,
    dy: i8,
    connected_pause_ms: u64,
    disconnected_pause_ms: u64,
}

impl Airmouse {
    pub const fn new(dx: i8, dy: i8, connected_pause_ms: u64, disconnected_pause_ms: u64) -> Self {
        Self {
            dx,
            dy,
            connected_pause_ms,
            disconnected_pause_ms,
        }
    }

    /// The firmware's loop: (5, 0) every 500 ms, waiting every 1000 ms.
    pub const fn from_config() -> Self {
        Self::new(
            config::MOVE_DX,
            config::MOVE_DY,
            config::CONNECTED_PAUSE_MS,
            config::DISCONNECTED_PAUSE_MS,
        )
    }

    /// Run one iteration against `mouse`.
    pub fn step<L: MouseLink>(&self, mouse: &mut BleMouse<L>) -> Step {
        if mouse.is_connected() {
            let result = mouse.move_by(self.dx, self.dy);
            Step::Moved {
                dx: self.dx,
                dy: self.dy,
                result,
                pause_ms: self.connected_pause_ms,
            }
        } else {
            Step::Waiting {
                pause_ms: self.disconnected_pause_ms,
            }
        }
    }
}

impl Default for Airmouse {
    fn default() -> Self {
        Self::from_config()
    }
}

/*
 * The state shared between all tasks of the signal.
 *
 * There are exactly two shared values: the phase the signal is showing and
 * whether night mode was requested. Each lives in its own atomic cell, so a
 * reader always observes a value that was written as a whole. Nothing ties
 * the two cells together; a reader may see the old phase for up to one
 * scheduler tick after night mode flips.
 *
 * Each cell has a single writer. The phase scheduler writes the phase, the
 * mode controller writes the night mode flag. Everybody else only reads.
 * Because of that discipline the toggle below is a plain load and store,
 * which also works on cores without compare-and-swap.
 */

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Phase {
    Open,
    Yellow,
    Closed,
    // Blinking; the lit and unlit halves are not visible here.
    Night,
}

impl Phase {
    /// The name shown on the status display.
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Open => "ABERTO",
            Phase::Yellow => "AMARELO",
            Phase::Closed => "FECHADO",
            Phase::Night => "NOTURNO",
        }
    }
}

pub struct SignalState {
    phase: AtomicU8,
    night_mode: AtomicBool,
}

impl SignalState {
    pub const fn new() -> Self {
        SignalState {
            phase: AtomicU8::new(Phase::Closed as u8),
            night_mode: AtomicBool::new(false),
        }
    }

    pub fn read_phase(&self) -> Phase {
        // Only `write_phase` stores into the cell, so the ordinal is always
        // valid.
        Phase::from_ordinal(self.phase.load(Ordering::Relaxed)).unwrap_or(Phase::Closed)
    }

    /// Only the phase scheduler may call this.
    pub fn write_phase(&self, phase: Phase) {
        self.phase.store(phase.ordinal(), Ordering::Relaxed);
    }

    pub fn read_night_mode(&self) -> bool {
        self.night_mode.load(Ordering::Relaxed)
    }

    /// Only the mode controller may call this. Returns the new value.
    pub fn toggle_night_mode(&self) -> bool {
        let night_mode = !self.night_mode.load(Ordering::Relaxed);
        self.night_mode.store(night_mode, Ordering::Relaxed);
        night_mode
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

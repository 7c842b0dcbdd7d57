/*
 * The audible pedestrian cue.
 *
 * The signaler samples the phase and the night mode flag once per loop and
 * plays a cue chosen only from those two values:
 *
 *   night mode        1000 ms tone, 2000 ms silence, repeating
 *   OPEN (entered)    a single 1000 ms tone
 *   YELLOW            200 ms tone, 1000 ms silence, repeating
 *   CLOSED            500 ms tone, 1500 ms silence, repeating
 *
 * The tone and silence are real waits, so a phase change is only noticed
 * once the current cue has finished playing.
 *
 * The only memory kept between loops is the last sampled phase, which is what
 * makes the OPEN cue fire once per entry instead of every loop.
 */

use embassy_time::{Duration, Timer};

use crate::io::ToneOutput;
use crate::state::{Phase, SignalState};

// Re-sample interval when there is nothing to play.
pub const IDLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Tone { on: Duration, off: Duration },
    Quiet(Duration),
}

const NIGHT_CUE: Cue = Cue::Tone {
    on: Duration::from_millis(1_000),
    off: Duration::from_millis(2_000),
};
const OPEN_CUE: Cue = Cue::Tone {
    on: Duration::from_millis(1_000),
    off: Duration::from_ticks(0),
};
const YELLOW_CUE: Cue = Cue::Tone {
    on: Duration::from_millis(200),
    off: Duration::from_millis(1_000),
};
const CLOSED_CUE: Cue = Cue::Tone {
    on: Duration::from_millis(500),
    off: Duration::from_millis(1_500),
};

pub struct AudioSignaler {
    last_seen: Phase,
}

impl AudioSignaler {
    pub const fn new() -> Self {
        // Anything but OPEN, so that starting in OPEN still announces it.
        AudioSignaler {
            last_seen: Phase::Night,
        }
    }

    pub fn next_cue(&mut self, phase: Phase, night_mode: bool) -> Cue {
        let previous = core::mem::replace(&mut self.last_seen, phase);

        if night_mode {
            return NIGHT_CUE;
        }

        match phase {
            Phase::Open if previous != Phase::Open => OPEN_CUE,
            Phase::Open | Phase::Night => Cue::Quiet(IDLE),
            Phase::Yellow => YELLOW_CUE,
            Phase::Closed => CLOSED_CUE,
        }
    }
}

impl Default for AudioSignaler {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(tone: &mut impl ToneOutput, state: &SignalState) -> ! {
    let mut signaler = AudioSignaler::new();

    loop {
        match signaler.next_cue(state.read_phase(), state.read_night_mode()) {
            Cue::Tone { on, off } => {
                tone.set_tone_on();
                Timer::after(on).await;
                tone.set_tone_off();
                Timer::after(off).await;
            }
            Cue::Quiet(wait) => Timer::after(wait).await,
        }
    }
}

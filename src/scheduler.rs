/*
 * The phase scheduler: the only writer of the phase and the only task that
 * drives the lights.
 *
 * The scheduler runs one of two cyclic tables, picked by the night mode flag:
 *
 *   day:   OPEN (5 s) -> YELLOW (3 s) -> CLOSED (5 s) -> OPEN ...
 *   night: lit (1.5 s) -> unlit (2 s) -> lit ...
 *
 * Both halves of the night table publish the single phase NIGHT; only the
 * lights differ. Time advances in ticks of 100 ms. Each tick re-samples the
 * night mode flag, so a mode change cuts the current dwell short at the next
 * tick boundary and enters the other table: NIGHT (lit) when night mode comes
 * on, OPEN when it goes off.
 *
 * The state machine itself never waits. `tick` is called once per tick by
 * `run`, which keeps this module testable without a time driver.
 */

use embassy_time::{Duration, Ticker};

use crate::io::{Lights, SignalLights};
use crate::state::{Phase, SignalState};

pub const TICK: Duration = Duration::from_millis(100);

const OPEN_DWELL: Duration = Duration::from_millis(5_000);
const YELLOW_DWELL: Duration = Duration::from_millis(3_000);
const CLOSED_DWELL: Duration = Duration::from_millis(5_000);
const NIGHT_LIT_DWELL: Duration = Duration::from_millis(1_500);
const NIGHT_UNLIT_DWELL: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Open,
    Yellow,
    Closed,
    NightLit,
    NightUnlit,
}

impl Step {
    fn phase(self) -> Phase {
        match self {
            Step::Open => Phase::Open,
            Step::Yellow => Phase::Yellow,
            Step::Closed => Phase::Closed,
            Step::NightLit | Step::NightUnlit => Phase::Night,
        }
    }

    fn lights(self) -> Lights {
        match self {
            Step::Open => Lights::GREEN,
            Step::Yellow | Step::NightLit => Lights::BOTH,
            Step::Closed => Lights::RED,
            Step::NightUnlit => Lights::DARK,
        }
    }

    fn dwell(self) -> Duration {
        match self {
            Step::Open => OPEN_DWELL,
            Step::Yellow => YELLOW_DWELL,
            Step::Closed => CLOSED_DWELL,
            Step::NightLit => NIGHT_LIT_DWELL,
            Step::NightUnlit => NIGHT_UNLIT_DWELL,
        }
    }

    /*
     * Determine the next step within the current table.
     */
    fn next(self) -> Step {
        match self {
            Step::Open => Step::Yellow,
            Step::Yellow => Step::Closed,
            Step::Closed => Step::Open,
            Step::NightLit => Step::NightUnlit,
            Step::NightUnlit => Step::NightLit,
        }
    }

    fn is_night(self) -> bool {
        matches!(self, Step::NightLit | Step::NightUnlit)
    }
}

fn ticks(dwell: Duration) -> u32 {
    (dwell.as_ticks() / TICK.as_ticks()) as u32
}

/// What to publish after a step change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub lights: Lights,
}

pub struct PhaseScheduler {
    step: Step,
    ticks_left: u32,
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::entering(Step::Closed)
    }

    fn entering(step: Step) -> Self {
        PhaseScheduler {
            step,
            ticks_left: ticks(step.dwell()),
        }
    }

    pub fn phase(&self) -> Phase {
        self.step.phase()
    }

    pub fn lights(&self) -> Lights {
        self.step.lights()
    }

    pub fn transition(&self) -> Transition {
        Transition {
            phase: self.phase(),
            lights: self.lights(),
        }
    }

    /// Advance by one tick. Returns the new outputs if the step changed.
    pub fn tick(&mut self, night_mode: bool) -> Option<Transition> {
        let next = if night_mode != self.step.is_night() {
            if night_mode { Step::NightLit } else { Step::Open }
        } else {
            self.ticks_left = self.ticks_left.saturating_sub(1);
            if self.ticks_left > 0 {
                return None;
            }
            self.step.next()
        };

        *self = Self::entering(next);
        Some(self.transition())
    }
}

impl Default for PhaseScheduler {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(lights: &mut impl SignalLights, state: &SignalState) -> ! {
    let mut scheduler = PhaseScheduler::new();
    state.write_phase(scheduler.phase());
    lights.show(scheduler.lights());
    info!("phase {}", scheduler.phase());

    let mut ticker = Ticker::every(TICK);
    loop {
        ticker.next().await;

        let previous = scheduler.phase();
        if let Some(transition) = scheduler.tick(state.read_night_mode()) {
            state.write_phase(transition.phase);
            lights.show(transition.lights);
            if transition.phase != previous {
                info!("phase {} -> {}", previous, transition.phase);
            } else {
                trace!("night blink {}", transition.lights);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(scheduler: &mut PhaseScheduler, count: u32, night_mode: bool) -> u32 {
        let mut changes = 0;
        for _ in 0..count {
            if scheduler.tick(night_mode).is_some() {
                changes += 1;
            }
        }
        changes
    }

    #[test]
    fn starts_closed_with_red() {
        let scheduler = PhaseScheduler::new();
        assert_eq!(scheduler.phase(), Phase::Closed);
        assert_eq!(scheduler.lights(), Lights::RED);
    }

    #[test]
    fn dwell_ticks() {
        assert_eq!(ticks(OPEN_DWELL), 50);
        assert_eq!(ticks(YELLOW_DWELL), 30);
        assert_eq!(ticks(CLOSED_DWELL), 50);
        assert_eq!(ticks(NIGHT_LIT_DWELL), 15);
        assert_eq!(ticks(NIGHT_UNLIT_DWELL), 20);
    }

    #[test]
    fn closed_is_held_for_fifty_ticks() {
        let mut scheduler = PhaseScheduler::new();
        assert_eq!(run_ticks(&mut scheduler, 49, false), 0);
        assert_eq!(
            scheduler.tick(false),
            Some(Transition {
                phase: Phase::Open,
                lights: Lights::GREEN
            })
        );
    }

    #[test]
    fn day_table_lights() {
        let mut scheduler = PhaseScheduler::new();
        run_ticks(&mut scheduler, 50, false);
        assert_eq!(scheduler.lights(), Lights::GREEN);
        run_ticks(&mut scheduler, 50, false);
        assert_eq!(scheduler.phase(), Phase::Yellow);
        assert_eq!(scheduler.lights(), Lights::BOTH);
        run_ticks(&mut scheduler, 30, false);
        assert_eq!(scheduler.phase(), Phase::Closed);
        assert_eq!(scheduler.lights(), Lights::RED);
    }

    #[test]
    fn night_mode_cuts_open_short_on_next_tick() {
        let mut scheduler = PhaseScheduler::new();
        run_ticks(&mut scheduler, 60, false);
        assert_eq!(scheduler.phase(), Phase::Open);

        assert_eq!(
            scheduler.tick(true),
            Some(Transition {
                phase: Phase::Night,
                lights: Lights::BOTH
            })
        );
    }

    #[test]
    fn night_blinks_lit_then_unlit() {
        let mut scheduler = PhaseScheduler::new();
        scheduler.tick(true);
        assert_eq!(scheduler.lights(), Lights::BOTH);

        assert_eq!(run_ticks(&mut scheduler, 14, true), 0);
        assert_eq!(
            scheduler.tick(true),
            Some(Transition {
                phase: Phase::Night,
                lights: Lights::DARK
            })
        );

        assert_eq!(run_ticks(&mut scheduler, 19, true), 0);
        assert_eq!(
            scheduler.tick(true),
            Some(Transition {
                phase: Phase::Night,
                lights: Lights::BOTH
            })
        );
    }

    #[test]
    fn leaving_night_resumes_at_open() {
        let mut scheduler = PhaseScheduler::new();
        scheduler.tick(true);
        run_ticks(&mut scheduler, 20, true);
        assert!(!scheduler.lights().green);

        assert_eq!(
            scheduler.tick(false),
            Some(Transition {
                phase: Phase::Open,
                lights: Lights::GREEN
            })
        );
        assert_eq!(run_ticks(&mut scheduler, 49, false), 0);
        assert_eq!(scheduler.tick(false).map(|t| t.phase), Some(Phase::Yellow));
    }
}

//! Runs the controller's state machines against simulated time, the way the
//! tasks interleave on the board: the scheduler on every 100 ms tick, the
//! audio signaler whenever its last cue has finished, the mode button on its
//! own poll cadence.

use embassy_time::{Duration, Instant};
use semaforo::audio::{AudioSignaler, Cue};
use semaforo::mode::{ModeController, Poll};
use semaforo::scheduler::{PhaseScheduler, TICK};
use semaforo::{Phase, SignalState};

const TICK_MS: u64 = 100;

/// Every phase entry as (millisecond it was entered, phase).
fn phase_entries(state: &SignalState, until_ms: u64, night_from_ms: Option<u64>) -> Vec<(u64, Phase)> {
    let mut scheduler = PhaseScheduler::new();
    state.write_phase(scheduler.phase());
    let mut entries = vec![(0, scheduler.phase())];

    let mut now = 0;
    while now < until_ms {
        now += TICK_MS;
        let night_mode = night_from_ms.is_some_and(|from| now >= from);
        if let Some(transition) = scheduler.tick(night_mode) {
            if transition.phase != state.read_phase() {
                entries.push((now, transition.phase));
            }
            state.write_phase(transition.phase);
        }
    }
    entries
}

#[test]
fn day_cycle_over_26_seconds() {
    let state = SignalState::new();
    let entries = phase_entries(&state, 26_000, None);

    let phases: Vec<Phase> = entries.iter().map(|(_, phase)| *phase).collect();
    assert_eq!(
        &phases[..4],
        &[Phase::Closed, Phase::Open, Phase::Yellow, Phase::Closed]
    );

    let dwell_ms: Vec<u64> = entries.windows(2).map(|w| w[1].0 - w[0].0).collect();
    for (dwell, expected) in dwell_ms.iter().zip([5_000, 5_000, 3_000, 5_000, 5_000]) {
        assert!(dwell.abs_diff(expected) <= TICK_MS, "dwell {dwell} ms, expected {expected} ms");
    }
}

#[test]
fn night_mode_during_open_switches_on_next_tick() {
    let state = SignalState::new();
    // OPEN starts at 5 s; night mode requested mid-dwell.
    let entries = phase_entries(&state, 8_000, Some(6_050));

    assert_eq!(
        entries,
        vec![(0, Phase::Closed), (5_000, Phase::Open), (6_100, Phase::Night)]
    );
}

/// Replays a phase timeline through the audio signaler and returns every tone
/// it would play as (start ms, length ms).
fn tones(timeline: &[(u64, Phase)], until_ms: u64) -> Vec<(u64, u64)> {
    let phase_at = |ms: u64| {
        timeline
            .iter()
            .rev()
            .find(|(from, _)| *from <= ms)
            .map(|(_, phase)| *phase)
            .unwrap_or(Phase::Closed)
    };

    let mut signaler = AudioSignaler::new();
    let mut played = Vec::new();
    let mut now = 0;
    while now < until_ms {
        match signaler.next_cue(phase_at(now), false) {
            Cue::Tone { on, off } => {
                played.push((now, on.as_millis()));
                now += on.as_millis() + off.as_millis();
            }
            Cue::Quiet(wait) => now += wait.as_millis(),
        }
    }
    played
}

#[test]
fn one_open_pulse_per_distinct_entry() {
    let timeline = [
        (0, Phase::Closed),
        (5_000, Phase::Open),
        (10_000, Phase::Yellow),
        (13_000, Phase::Closed),
        (18_000, Phase::Open),
    ];
    let played = tones(&timeline, 22_000);

    let open_pulses: Vec<u64> = played
        .iter()
        .filter(|(_, len)| *len == 1_000)
        .map(|(at, _)| *at)
        .collect();
    // Each entry is heard once the CLOSED cue in progress has finished.
    assert_eq!(open_pulses, vec![6_000, 19_600]);
}

#[test]
fn staying_open_pulses_once() {
    let played = tones(&[(0, Phase::Open)], 30_000);
    assert_eq!(played, vec![(0, 1_000)]);
}

#[test]
fn tone_delays_the_next_sample() {
    // CLOSED plays 500 on / 1500 off; OPEN appearing mid-cue is heard only
    // after the silence ends.
    let played = tones(&[(0, Phase::Closed), (300, Phase::Open)], 3_000);
    assert_eq!(played[0], (0, 500));
    assert_eq!(played[1], (2_000, 1_000));
}

#[test]
fn bouncing_press_toggles_night_mode_once() {
    let state = SignalState::new();
    let mut controller = ModeController::new();
    let start = Instant::from_millis(10_000);

    let mut toggles = 0;
    for offset in [0, 20, 45] {
        let at = start + Duration::from_millis(offset);
        if controller.poll(at, true) == Poll::Toggled {
            state.toggle_night_mode();
            toggles += 1;
        }
    }
    assert_eq!(toggles, 1);
    assert!(state.read_night_mode());
}

#[test]
fn night_mode_drives_scheduler_through_shared_state() {
    let state = SignalState::new();
    let mut controller = ModeController::new();
    let mut scheduler = PhaseScheduler::new();

    if controller.poll(Instant::from_millis(0), true) == Poll::Toggled {
        state.toggle_night_mode();
    }
    if let Some(transition) = scheduler.tick(state.read_night_mode()) {
        state.write_phase(transition.phase);
    }
    assert_eq!(state.read_phase(), Phase::Night);
    assert_eq!(TICK, Duration::from_millis(TICK_MS));
}

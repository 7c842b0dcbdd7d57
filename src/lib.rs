#![cfg_attr(not(test), no_std)]

/*
 * A traffic signal controller built from independent, never-ending tasks.
 *
 * The phase scheduler drives the lights through the day and night tables. The
 * mode controller flips night mode from a button. The audio signaler, status
 * display and pixel matrix only read, each at its own cadence. The tasks
 * never talk to each other directly; they share two atomic cells in
 * `SignalState` and poll them.
 *
 * Each task is split in two: a plain state machine that is easy to test on
 * the host, and an async `run` loop that owns the waiting and the peripheral,
 * reached through the traits in `io`.
 */

// must come first, the other modules use its macros
mod fmt;

pub mod audio;
pub mod display;
pub mod io;
pub mod matrix;
pub mod mode;
pub mod scheduler;
pub mod state;
pub mod tasks;
pub mod terminal;

pub use io::Lights;
pub use state::{Phase, SignalState};

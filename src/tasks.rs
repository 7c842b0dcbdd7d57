/*
 * The tasks that make up the controller and the priority each one runs at.
 *
 * This table is the single place that decides priorities. The mode controller
 * is the only elevated task, so a button press is always sampled on time no
 * matter how busy the display, matrix or buzzer are. The firmware maps
 * `Elevated` to a preempting interrupt executor and `Normal` to the thread
 * mode executor.
 */

use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Task {
    ModeController,
    PhaseScheduler,
    AudioSignaler,
    StatusDisplay,
    MatrixRenderer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    Elevated,
    Normal,
}

impl Task {
    pub const fn priority(self) -> Priority {
        match self {
            Task::ModeController => Priority::Elevated,
            Task::PhaseScheduler
            | Task::AudioSignaler
            | Task::StatusDisplay
            | Task::MatrixRenderer => Priority::Normal,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Task::ModeController => "mode controller",
            Task::PhaseScheduler => "phase scheduler",
            Task::AudioSignaler => "audio signaler",
            Task::StatusDisplay => "status display",
            Task::MatrixRenderer => "matrix renderer",
        }
    }
}

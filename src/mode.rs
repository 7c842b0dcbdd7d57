/*
 * The night mode button.
 *
 * This is a level check with a minimum time between toggles, not an edge
 * detector. Holding the button down toggles night mode once per settle
 * interval; the guard only stops a bouncing contact from toggling faster
 * than once per debounce window.
 */

use embassy_time::{Duration, Instant, Timer};

use crate::io::ModeInput;
use crate::state::SignalState;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEBOUNCE: Duration = Duration::from_millis(50);
pub const SETTLE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    Released,
    // Pressed again inside the debounce window.
    Ignored,
    Toggled,
}

impl Poll {
    /// How long to wait before the next poll.
    pub const fn wait(self) -> Duration {
        match self {
            Poll::Toggled => SETTLE,
            Poll::Released | Poll::Ignored => POLL_INTERVAL,
        }
    }
}

pub struct ModeController {
    last_toggle: Option<Instant>,
}

impl ModeController {
    pub const fn new() -> Self {
        ModeController { last_toggle: None }
    }

    pub fn poll(&mut self, now: Instant, asserted: bool) -> Poll {
        if !asserted {
            return Poll::Released;
        }

        match self.last_toggle {
            Some(at) if now.saturating_duration_since(at) < DEBOUNCE => Poll::Ignored,
            _ => {
                self.last_toggle = Some(now);
                Poll::Toggled
            }
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(button: &mut impl ModeInput, state: &SignalState) -> ! {
    let mut controller = ModeController::new();

    loop {
        let poll = controller.poll(Instant::now(), button.is_asserted());
        match poll {
            Poll::Toggled => {
                let night_mode = state.toggle_night_mode();
                info!("night mode {}", if night_mode { "on" } else { "off" });
            }
            Poll::Ignored => debug!("mode button bounce ignored"),
            Poll::Released => {}
        }

        Timer::after(poll.wait()).await;
    }
}

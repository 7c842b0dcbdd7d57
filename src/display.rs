/*
 * The text status display: a title and the name of the current phase.
 *
 * Each refresh swaps background and foreground. That is only a heartbeat
 * showing the display task is alive; it carries no meaning.
 */

use embassy_time::{Duration, Timer};

use crate::io::TextPanel;
use crate::state::{Phase, SignalState};

pub const REFRESH: Duration = Duration::from_millis(735);
pub const TITLE: &str = "Semaforo";

const TITLE_AT: (u8, u8) = (0, 1);
const LABEL_AT: (u8, u8) = (3, 1);

pub struct StatusDisplay {
    inverted: bool,
}

impl StatusDisplay {
    pub const fn new() -> Self {
        StatusDisplay { inverted: false }
    }

    pub async fn refresh<P: TextPanel>(&mut self, panel: &mut P, phase: Phase) -> Result<(), P::Error> {
        let inverted = self.inverted;
        self.inverted = !inverted;

        panel.clear(inverted).await?;
        panel.draw_text(TITLE_AT.0, TITLE_AT.1, TITLE).await?;
        panel.draw_text(LABEL_AT.0, LABEL_AT.1, phase.label()).await?;
        panel.flush().await
    }
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn run(panel: &mut impl TextPanel, state: &SignalState) -> ! {
    let mut display = StatusDisplay::new();

    loop {
        if display.refresh(panel, state.read_phase()).await.is_err() {
            warn!("status display refresh failed");
        }
        Timer::after(REFRESH).await;
    }
}

/*
 * The seams between the control tasks and the hardware.
 *
 * Every task in this crate talks to its peripheral through one of these
 * traits. The firmware's board module implements them for the real pins and
 * buses; the tests implement them with recorders. Nothing in here knows about
 * a specific microcontroller.
 */

use crate::matrix::Frame;

/// Both light outputs, commanded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lights {
    pub green: bool,
    pub red: bool,
}

impl Lights {
    pub const DARK: Lights = Lights::new(false, false);
    pub const GREEN: Lights = Lights::new(true, false);
    pub const RED: Lights = Lights::new(false, true);
    // Green and red together read as yellow on a two-color light.
    pub const BOTH: Lights = Lights::new(true, true);

    pub const fn new(green: bool, red: bool) -> Self {
        Lights { green, red }
    }
}

pub trait ModeInput {
    /// True while the mode button is held down.
    fn is_asserted(&mut self) -> bool;
}

pub trait SignalLights {
    fn show(&mut self, lights: Lights);
}

pub trait ToneOutput {
    fn set_tone_on(&mut self);
    fn set_tone_off(&mut self);
}

#[allow(async_fn_in_trait)]
pub trait TextPanel {
    type Error;

    /// Blank the panel. `inverted` swaps background and foreground.
    async fn clear(&mut self, inverted: bool) -> Result<(), Self::Error>;

    /// Place `text` with its first character at `line`, `col` (both 0-based).
    async fn draw_text(&mut self, line: u8, col: u8, text: &str) -> Result<(), Self::Error>;

    /// Make everything drawn since the last `clear` visible.
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

#[allow(async_fn_in_trait)]
pub trait PixelMatrix {
    type Error;

    async fn emit_pixel_frame(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

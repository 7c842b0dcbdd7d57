/*
 * The 5x5 pixel matrix icon.
 *
 * Every tick the renderer reads the phase and sends a full frame of 25
 * colors, row by row. Rows and columns are counted from the corner where the
 * pixel chain starts.
 *
 *   OPEN     green arrow             YELLOW   yellow border     CLOSED   red X
 *   . . # . .                        # # # # #                  # . . . #
 *   . . # . .                        # . . . #                  . # . # .
 *   . . # . .                        # . . . #                  . . # . .
 *   . # # # .                        # . . . #                  . # . # .
 *   . . # . .                        # # # # #                  # . . . #
 *
 * NIGHT has no icon; the matrix stays dark while the lights blink.
 */

use embassy_time::{Duration, Timer};

use crate::io::PixelMatrix;
use crate::state::{Phase, SignalState};

pub const SIDE: usize = 5;
pub const PIXELS: usize = SIDE * SIDE;
pub const REFRESH: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0x00, 0x00, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0xff, 0x00);
    pub const YELLOW: Rgb = Rgb::new(0xff, 0x3f, 0x00);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Packed as `0xGGRRBB00`, the order the pixels shift in.
    pub const fn grb_word(self) -> u32 {
        (self.g as u32) << 24 | (self.r as u32) << 16 | (self.b as u32) << 8
    }
}

pub type Frame = [Rgb; PIXELS];

fn is_lit(phase: Phase, r: usize, c: usize) -> bool {
    match phase {
        Phase::Open => (r == 4 && c == 2) || (r == 3 && (1..=3).contains(&c)) || (r <= 2 && c == 2),
        Phase::Yellow => r == 0 || r == 4 || c == 0 || c == 4,
        Phase::Closed => r == c || r + c == 4,
        Phase::Night => false,
    }
}

fn color(phase: Phase) -> Rgb {
    match phase {
        Phase::Open => Rgb::GREEN,
        Phase::Yellow => Rgb::YELLOW,
        Phase::Closed => Rgb::RED,
        Phase::Night => Rgb::OFF,
    }
}

pub fn icon(phase: Phase) -> Frame {
    let mut frame = [Rgb::OFF; PIXELS];
    for r in 0..SIDE {
        for c in 0..SIDE {
            if is_lit(phase, r, c) {
                frame[r * SIDE + c] = color(phase);
            }
        }
    }
    frame
}

pub async fn run(matrix: &mut impl PixelMatrix, state: &SignalState) -> ! {
    loop {
        if matrix.emit_pixel_frame(&icon(state.read_phase())).await.is_err() {
            warn!("pixel matrix frame dropped");
        }
        Timer::after(REFRESH).await;
    }
}

/*
 * WS2812 pixels driven from a SPI MOSI line.
 *
 * With the SPI clock at 4 MHz one WS2812 bit (1.25 us nominal, 1 us here) is
 * four SPI bits: a 0 is sent as 1000 and a 1 as 1110, so two WS2812 bits fit
 * in each SPI byte. After the frame the line has to stay low for at least
 * 50 us before the pixels latch, which the trailing zero bytes take care of.
 */
pub mod ws2812 {
    use super::{Frame, PIXELS};

    pub const SPI_HZ: u32 = 4_000_000;

    const ZERO: u8 = 0b1000;
    const ONE: u8 = 0b1110;
    const BYTES_PER_PIXEL: usize = 3 * 8 / 2;
    // 32 bytes at 4 MHz is 64 us.
    const RESET_BYTES: usize = 32;

    pub const FRAME_BYTES: usize = PIXELS * BYTES_PER_PIXEL + RESET_BYTES;

    fn nibble(bit: bool) -> u8 {
        if bit { ONE } else { ZERO }
    }

    pub fn encode(frame: &Frame, out: &mut [u8; FRAME_BYTES]) {
        let mut bytes = out.iter_mut();
        for pixel in frame {
            let word = pixel.grb_word();
            for pair in 0..BYTES_PER_PIXEL as u32 {
                let high = word & (1 << (31 - pair * 2)) != 0;
                let low = word & (1 << (30 - pair * 2)) != 0;
                if let Some(byte) = bytes.next() {
                    *byte = nibble(high) << 4 | nibble(low);
                }
            }
        }
        bytes.for_each(|byte| *byte = 0);
    }
}

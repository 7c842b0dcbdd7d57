/*
 * A text panel on a serial VT100/ANSI terminal.
 *
 * Drawing only fills a fixed buffer with escape sequences and text; `flush`
 * hands the whole frame to the byte sink in one write, so the terminal never
 * shows half a frame.
 */

use core::fmt::Write;

use heapless::String;

use crate::io::TextPanel;

pub const FRAME_CAPACITY: usize = 128;

const RESET: &str = "\x1b[0m";
const REVERSE: &str = "\x1b[7m";
const ERASE: &str = "\x1b[2J";

#[allow(async_fn_in_trait)]
pub trait ByteSink {
    type Error;

    async fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminalError<E> {
    Overflow,
    Sink(E),
}

pub struct AnsiTerminal<W> {
    sink: W,
    frame: String<FRAME_CAPACITY>,
}

impl<W: ByteSink> AnsiTerminal<W> {
    pub fn new(sink: W) -> Self {
        AnsiTerminal {
            sink,
            frame: String::new(),
        }
    }

    fn push(&mut self, text: &str) -> Result<(), TerminalError<W::Error>> {
        self.frame.push_str(text).map_err(|_| TerminalError::Overflow)
    }
}

impl<W: ByteSink> TextPanel for AnsiTerminal<W> {
    type Error = TerminalError<W::Error>;

    async fn clear(&mut self, inverted: bool) -> Result<(), Self::Error> {
        self.frame.clear();
        self.push(RESET)?;
        if inverted {
            self.push(REVERSE)?;
        }
        self.push(ERASE)
    }

    async fn draw_text(&mut self, line: u8, col: u8, text: &str) -> Result<(), Self::Error> {
        // ANSI rows and columns start at 1.
        write!(self.frame, "\x1b[{};{}H{}", line as u16 + 1, col as u16 + 1, text)
            .map_err(|_| TerminalError::Overflow)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        let result = self.sink.write(self.frame.as_bytes()).await;
        self.frame.clear();
        result.map_err(TerminalError::Sink)
    }
}

/*
 * The board module for the DESPI-M02.
 *
 * This is the only device-specific part of the program. It wraps the STM32
 * pins and buses in the collaborator traits from `semaforo::io`, so the
 * control tasks never see a HAL type.
 */

use defmt::warn;
use embassy_stm32::{
    gpio::{Input, Level, Output},
    mode::{Async, Blocking},
    spi::{self, Spi},
    usart::{self, Uart},
};
use semaforo::{
    Lights,
    io::{ModeInput, PixelMatrix, SignalLights, ToneOutput},
    matrix::{Frame, ws2812},
    terminal::ByteSink,
};

fn level(on: bool) -> Level {
    if on { Level::High } else { Level::Low }
}

pub struct ModeButton {
    // pulled up, the button shorts to ground
    input: Input<'static>,
}

impl ModeButton {
    pub fn new(input: Input<'static>) -> Self {
        Self { input }
    }
}

impl ModeInput for ModeButton {
    fn is_asserted(&mut self) -> bool {
        self.input.is_low()
    }
}

pub struct TwoColorLight {
    green: Output<'static>,
    red: Output<'static>,
}

impl TwoColorLight {
    pub fn new(green: Output<'static>, red: Output<'static>) -> Self {
        Self { green, red }
    }
}

impl SignalLights for TwoColorLight {
    fn show(&mut self, lights: Lights) {
        self.green.set_level(level(lights.green));
        self.red.set_level(level(lights.red));
    }
}

// An active buzzer: it sounds for as long as the pin is high.
pub struct Buzzer {
    pin: Output<'static>,
}

impl Buzzer {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl ToneOutput for Buzzer {
    fn set_tone_on(&mut self) {
        self.pin.set_high();
    }

    fn set_tone_off(&mut self) {
        self.pin.set_low();
    }
}

pub struct SerialPort {
    usart: Uart<'static, Async>,
}

impl SerialPort {
    pub fn new(usart: Uart<'static, Async>) -> Self {
        Self { usart }
    }
}

impl ByteSink for SerialPort {
    type Error = usart::Error;

    async fn write(&mut self, bytes: &[u8]) -> Result<(), usart::Error> {
        self.usart.write(bytes).await.inspect_err(|e| warn!("usart: {}", e))
    }
}

pub struct PixelChain {
    spi: Spi<'static, Blocking>,
    buffer: [u8; ws2812::FRAME_BYTES],
}

impl PixelChain {
    pub fn new(spi: Spi<'static, Blocking>) -> Self {
        Self {
            spi,
            buffer: [0; ws2812::FRAME_BYTES],
        }
    }
}

impl PixelMatrix for PixelChain {
    type Error = spi::Error;

    async fn emit_pixel_frame(&mut self, frame: &Frame) -> Result<(), spi::Error> {
        ws2812::encode(frame, &mut self.buffer);
        self.spi.blocking_write(&self.buffer).inspect_err(|e| warn!("spi: {}", e))
    }
}

#![no_std]
#![no_main]

// https://github.com/embassy-rs/embassy/blob/main/examples/stm32f4/src/bin/multiprio.rs

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{Config, Uart};
use embassy_stm32::{bind_interrupts, interrupt, peripherals, usart};
use enum_ordinalize::Ordinalize;
use panic_probe as _;
use semaforo::{SignalState, audio, display, matrix, mode, scheduler, tasks, terminal::AnsiTerminal};

mod board;
use board::{Buzzer, ModeButton, PixelChain, SerialPort, TwoColorLight};

static SIGNAL_STATE: SignalState = SignalState::new();

// Runs the `Elevated` tasks; preempts the thread mode executor.
static EXECUTOR_ELEVATED: InterruptExecutor = InterruptExecutor::new();

// UART4 is not wired on this board, its vector is free for the executor.
#[interrupt]
unsafe fn UART4() {
    unsafe { EXECUTOR_ELEVATED.on_interrupt() }
}

#[embassy_executor::task]
async fn mode_controller_task(mut button: ModeButton) -> ! {
    mode::run(&mut button, &SIGNAL_STATE).await
}

#[embassy_executor::task]
async fn phase_scheduler_task(mut lights: TwoColorLight) -> ! {
    scheduler::run(&mut lights, &SIGNAL_STATE).await
}

#[embassy_executor::task]
async fn audio_signaler_task(mut buzzer: Buzzer) -> ! {
    audio::run(&mut buzzer, &SIGNAL_STATE).await
}

#[embassy_executor::task]
async fn status_display_task(mut terminal: AnsiTerminal<SerialPort>) -> ! {
    display::run(&mut terminal, &SIGNAL_STATE).await
}

#[embassy_executor::task]
async fn matrix_renderer_task(mut pixels: PixelChain) -> ! {
    matrix::run(&mut pixels, &SIGNAL_STATE).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());
    info!("semaforo starting");

    bind_interrupts!(struct Irqs {
        USART1 => usart::InterruptHandler<peripherals::USART1>;
    });

    let button = ModeButton::new(Input::new(peripherals.PE11, Pull::Up));

    let lights = TwoColorLight::new(
        Output::new(peripherals.PB14, Level::Low, Speed::Low),
        Output::new(peripherals.PB10, Level::Low, Speed::Low),
    );

    let buzzer = Buzzer::new(Output::new(peripherals.PB12, Level::Low, Speed::Low));

    let usart = unwrap!(Uart::new(
        peripherals.USART1,
        peripherals.PA10,
        peripherals.PA9,
        Irqs,
        peripherals.DMA1_CH4,
        peripherals.DMA1_CH5,
        Config::default(), // 115200 baud
    ));
    let terminal = AnsiTerminal::new(SerialPort::new(usart));

    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(matrix::ws2812::SPI_HZ);
    let pixels = PixelChain::new(Spi::new_blocking_txonly(
        peripherals.SPI2,
        peripherals.PB13,
        peripherals.PB15,
        spi_config,
    ));

    // `Normal` tasks go to the thread mode executor of `main`, `Elevated` ones
    // to the interrupt executor.
    defmt::assert_eq!(tasks::Task::ModeController.priority(), tasks::Priority::Elevated);
    interrupt::UART4.set_priority(Priority::P6);
    let elevated_spawner = EXECUTOR_ELEVATED.start(interrupt::UART4);

    unwrap!(elevated_spawner.spawn(mode_controller_task(button)));
    unwrap!(spawner.spawn(phase_scheduler_task(lights)));
    unwrap!(spawner.spawn(audio_signaler_task(buzzer)));
    unwrap!(spawner.spawn(status_display_task(terminal)));
    unwrap!(spawner.spawn(matrix_renderer_task(pixels)));

    for task in tasks::Task::VARIANTS {
        info!("{} running at {} priority", task.name(), task.priority());
    }
}

//! Marquee Display Firmware
//!
//! Scrolls the message from the embedded `marquee.toml` across an I2C OLED
//! or character LCD (STM32F042K6). A press on the button stops the scroll
//! and blanks the panel.

#![no_std]
#![no_main]

mod pacer;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::Pull;
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::I2C1;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use marquee_core::config::{DisplayKind, MarqueeConfig};
use marquee_core::{parse_config, ScrollEngine, ScrollSettings, SessionResult};
use marquee_display::{DisplayError, DisplaySurface, LcdSurface, OledSurface};

use crate::pacer::SignalPacer;

bind_interrupts!(struct Irqs {
    I2C1 => i2c::EventInterruptHandler<I2C1>, i2c::ErrorInterruptHandler<I2C1>;
    EXTI0_1 => exti::InterruptHandler<embassy_stm32::interrupt::typelevel::EXTI0_1>;
});

type Bus = I2c<'static, Async, i2c::Master>;

/// Configuration embedded at build time (validated by build.rs)
const CONFIG_TOML: &str = include_str!("../marquee.toml");

/// Raised by the button; stops the running session
static CANCEL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    let p = embassy_stm32::init(Default::default());

    let config = match parse_config(CONFIG_TOML) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid marquee.toml: {:?}", e);
            return;
        }
    };
    log_config_summary(&config);

    // Setup I2C for the display (PB6=SCL, PB7=SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(100);

    let i2c = I2c::new(
        p.I2C1, p.PB6, p.PB7, Irqs, p.DMA1_CH2, p.DMA1_CH3, i2c_config,
    );

    // Button on PA0 to GND
    let button = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up, Irqs);
    if let Err(e) = spawner.spawn(button_task(button)) {
        warn!("Button task not started: {:?}", e);
    }

    let result = match config.display.kind {
        DisplayKind::Oled => run_oled(i2c, &config).await,
        DisplayKind::Lcd => run_lcd(i2c, &config).await,
    };

    report(result, &config.message);
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &MarqueeConfig) {
    info!("Configuration loaded");
    debug!("  display: {:?}", config.display.kind);
    debug!("  geometry: {:?}", config.geometry());
    debug!("  loops: {:?}", config.scroll.loops);
    debug!("  message: {} bytes", config.message.len());
}

async fn run_oled(i2c: Bus, config: &MarqueeConfig) -> Result<SessionResult, DisplayError> {
    let address = config.transport_address()?;
    let style = config.font_style()?;
    let settings = config.scroll_settings()?;

    let mut oled = OledSurface::open(
        i2c,
        config.display.controller,
        config.geometry(),
        address,
        style,
    )
    .await?;
    info!("OLED initialized at {:#x}", address.device_address);

    Ok(run_session(&mut oled, config, &settings).await)
}

async fn run_lcd(i2c: Bus, config: &MarqueeConfig) -> Result<SessionResult, DisplayError> {
    let address = config.transport_address()?;
    let settings = config.scroll_settings()?;

    let mut lcd = LcdSurface::open(
        i2c,
        Delay,
        config.geometry(),
        address,
        config.cell_style(),
    )
    .await?;
    info!("LCD initialized at {:#x}", address.device_address);

    Ok(run_session(&mut lcd, config, &settings).await)
}

async fn run_session<S: DisplaySurface>(
    surface: &mut S,
    config: &MarqueeConfig,
    settings: &ScrollSettings,
) -> SessionResult {
    // A press before the session started is not a cancel
    CANCEL.reset();

    let mut engine = ScrollEngine::new(SignalPacer::new(&CANCEL), &CANCEL);
    engine.scroll(surface, &config.message, settings).await
}

/// Log how the session ended, once
fn report(result: Result<SessionResult, DisplayError>, message: &str) {
    match result {
        Ok(SessionResult::Completed { loops_run }) => {
            info!("Scroll complete after {} loops", loops_run);
        }
        Ok(SessionResult::Cancelled { clear_error }) => {
            info!("Scroll cancelled");
            if let Some(e) = clear_error {
                warn!("Clearing after cancel failed: {:?}", e);
            }
        }
        Ok(SessionResult::Failed {
            reason,
            clear_error,
        }) => {
            error!("Scroll of \"{}\" failed: {:?}", message, reason);
            if let Some(e) = clear_error {
                warn!("Clearing after failure failed: {:?}", e);
            }
        }
        Err(e) => {
            error!("Display setup failed: {:?}", e);
        }
    }
}

/// Button press task
#[embassy_executor::task]
async fn button_task(mut btn: ExtiInput<'static>) {
    info!("Button task started");

    loop {
        btn.wait_for_falling_edge().await;

        // Debounce
        Timer::after(Duration::from_millis(20)).await;

        if btn.is_low() {
            debug!("Button: cancel");
            CANCEL.signal(());

            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(50)).await;
        }
    }
}

//! Glasspane - Touchscreen Panel Firmware
//!
//! Firmware binary for RP2040 boards driving a 320x240 ILI9341 TFT with an
//! XPT2046 resistive digitizer. The panel is configured from `panel.toml`
//! at build time; the render/input loop runs in the embassy main task.

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use heapless::String;
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use glasspane_core::config::{CalibrationProfile, PanelConfig};
use glasspane_core::engine::WidgetTree;
use glasspane_core::registry::ObjectSlot;
use glasspane_core::scheduler::TickScheduler;
use glasspane_core::Runtime;
use glasspane_display::{Ili9341, Xpt2046};
use glasspane_hal::Rotation;
use glasspane_scene::SceneEngine;

use crate::clock::EmbassyClock;
use crate::flow::NavigationFlow;

mod clock;
mod flow;

/// Constants generated from panel.toml by build.rs
mod panel_config {
    include!(concat!(env!("OUT_DIR"), "/panel_config.rs"));
}

type DisplaySpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>;
type TouchSpi = ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, Delay>;
type PanelRuntime = Runtime<
    SceneEngine<'static>,
    Ili9341<DisplaySpi, Output<'static>>,
    Xpt2046<TouchSpi, Input<'static>>,
    NavigationFlow,
>;

// Partial render buffer (must live forever for the scene engine)
static DRAW_BUFFER: ConstStaticCell<[u16; panel_config::DRAW_BUFFER_PIXELS]> =
    ConstStaticCell::new([0; panel_config::DRAW_BUFFER_PIXELS]);

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Glasspane firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let rotation = unwrap!(Rotation::from_u8(panel_config::ROTATION));
    let config = PanelConfig {
        width: panel_config::WIDTH,
        height: panel_config::HEIGHT,
        rotation,
        calibration: CalibrationProfile::new(
            panel_config::CAL_X_MIN,
            panel_config::CAL_X_MAX,
            panel_config::CAL_Y_MIN,
            panel_config::CAL_Y_MAX,
        ),
        draw_buffer_divisor: panel_config::DRAW_BUFFER_DIVISOR,
        min_pressure: panel_config::MIN_PRESSURE,
        yield_ms: panel_config::YIELD_MS,
        swap_bytes: panel_config::SWAP_BYTES,
    };
    info!("Panel config: {}", config);

    // TFT on SPI1: SCK=GP10, MOSI=GP11, MISO=GP12, CS=GP13, DC=GP14, RST=GP15, BL=GP16
    let mut display_spi_config = SpiConfig::default();
    display_spi_config.frequency = panel_config::DISPLAY_SPI_HZ;
    let display_bus = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, display_spi_config);
    let display_cs = Output::new(p.PIN_13, Level::High);
    let display_dc = Output::new(p.PIN_14, Level::Low);
    let mut display_rst = Output::new(p.PIN_15, Level::High);
    let _backlight = Output::new(p.PIN_16, Level::High);

    display_rst.set_low();
    Timer::after_millis(10).await;
    display_rst.set_high();
    Timer::after_millis(120).await;

    let display_device = unwrap!(ExclusiveDevice::new(display_bus, display_cs, Delay));
    let mut panel = Ili9341::new(display_device, display_dc, rotation);
    if let Err(e) = panel.init(&mut Delay) {
        defmt::panic!("Display init failed: {}", e);
    }
    if let Err(e) = panel.fill(0x0000) {
        defmt::panic!("Display clear failed: {}", e);
    }
    info!("ILI9341 initialized, rotation {}", panel.rotation());

    // Touch on SPI0: SCK=GP2, MOSI=GP3, MISO=GP4, CS=GP5, PENIRQ=GP6
    let mut touch_spi_config = SpiConfig::default();
    touch_spi_config.frequency = panel_config::TOUCH_SPI_HZ;
    let touch_bus = Spi::new_blocking(p.SPI0, p.PIN_2, p.PIN_3, p.PIN_4, touch_spi_config);
    let touch_cs = Output::new(p.PIN_5, Level::High);
    let touch_irq = Input::new(p.PIN_6, Pull::Up);
    let touch_device = unwrap!(ExclusiveDevice::new(touch_bus, touch_cs, Delay));
    let digitizer = Xpt2046::new(touch_device, Some(touch_irq), rotation)
        .with_threshold(panel_config::MIN_PRESSURE);

    let engine = SceneEngine::new(DRAW_BUFFER.take());

    let mut runtime: PanelRuntime =
        match Runtime::new(config, engine, panel, digitizer, NavigationFlow::new()) {
            Ok(runtime) => runtime,
            Err(e) => defmt::panic!("Runtime setup failed: {}", e),
        };
    if let Err(e) = runtime.init() {
        defmt::panic!("Screen construction failed: {}", e);
    }
    info!("Screens constructed, Main active");

    let mut scheduler = TickScheduler::new(EmbassyClock, config.yield_ms);
    let mut shown_second = u32::MAX;

    loop {
        if let Err(e) = scheduler.step(&mut runtime) {
            defmt::panic!("Screen registry fault: {}", e);
        }

        if let Some(screen) = runtime.flow_mut().take_navigation() {
            if let Err(e) = runtime.load_screen(screen) {
                defmt::panic!("Failed to load screen {}: {}", screen, e);
            }
            info!(
                "Loaded screen {} after {} flow actions",
                screen.name(),
                runtime.flow().propagations()
            );
        }

        let second = scheduler.last_tick() / 1000;
        if second != shown_second {
            shown_second = second;
            update_clock_label(&mut runtime, second);
        }

        Timer::after_millis(scheduler.yield_ms() as u64).await;
    }
}

/// Show uptime as MM:SS on the Main screen clock label
fn update_clock_label(runtime: &mut PanelRuntime, seconds: u32) {
    let Some(label) = runtime.registry().object(ObjectSlot::Obj0) else {
        return;
    };

    let mut text: String<8> = String::new();
    if write!(text, "{:02}:{:02}", (seconds / 60) % 100, seconds % 60).is_err() {
        return;
    }
    if let Err(e) = runtime.engine_mut().set_text(label, &text) {
        warn!("Clock label update failed: {}", e);
    }
}

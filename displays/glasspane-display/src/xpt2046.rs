//! XPT2046 resistive touch controller driver
//!
//! Each conversion is one 24-clock SPI frame: a control byte, then the
//! 12-bit result left-aligned in the following 16 bits. The driver averages
//! the two closest of three readings per axis and maps them to the panel's
//! rotation.

use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;
use glasspane_hal::{Digitizer, RawSample, Rotation, RAW_MAX};

/// Default pressure below which the panel counts as untouched
pub const DEFAULT_Z_THRESHOLD: u16 = 300;

/// Control bytes: start bit, channel, 12-bit differential mode, power-down
/// bits (`01` keeps the ADC on, `00` powers down and re-enables PENIRQ)
mod cmd {
    pub const X: u8 = 0xD1;
    pub const Y: u8 = 0x91;
    pub const Y_POWER_DOWN: u8 = 0x90;
    pub const Z1: u8 = 0xB1;
    pub const Z2: u8 = 0xC1;
    pub const Z2_POWER_DOWN: u8 = 0xC0;
}

/// Digitizer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// SPI transfer failed
    Spi,
    /// PENIRQ pin could not be read
    Gpio,
}

/// XPT2046 driver
///
/// `IRQ` is the optional PENIRQ input (active low). When present it
/// short-cuts [`Digitizer::touched`] without touching the bus.
pub struct Xpt2046<SPI, IRQ> {
    spi: SPI,
    irq: Option<IRQ>,
    rotation: Rotation,
    z_threshold: u16,
}

impl<SPI, IRQ> Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    /// Create a driver
    pub fn new(spi: SPI, irq: Option<IRQ>, rotation: Rotation) -> Self {
        Self {
            spi,
            irq,
            rotation,
            z_threshold: DEFAULT_Z_THRESHOLD,
        }
    }

    /// Set the pressure threshold used by [`Digitizer::touched`]
    pub fn with_threshold(mut self, z_threshold: u16) -> Self {
        self.z_threshold = z_threshold;
        self
    }

    /// Run one conversion and return the 12-bit result
    fn convert(&mut self, command: u8) -> Result<u16, TouchError> {
        let mut frame = [command, 0, 0];
        self.spi
            .transfer_in_place(&mut frame)
            .map_err(|_| TouchError::Spi)?;
        Ok((u16::from_be_bytes([frame[1], frame[2]]) >> 3) & RAW_MAX)
    }

    /// Pressure from the two Z channels
    fn pressure(&mut self, z2_command: u8) -> Result<u16, TouchError> {
        let z1 = self.convert(cmd::Z1)?;
        let z2 = self.convert(z2_command)?;
        Ok(z1 + (RAW_MAX - z2))
    }

    /// Check PENIRQ; `None` when there is no pin
    fn pen_down(&mut self) -> Result<Option<bool>, TouchError> {
        match self.irq.as_mut() {
            Some(irq) => irq.is_low().map(Some).map_err(|_| TouchError::Gpio),
            None => Ok(None),
        }
    }

    /// Read one averaged, rotated sample
    fn sample(&mut self) -> Result<RawSample, TouchError> {
        let z = self.pressure(cmd::Z2)?;

        // First position conversion after the Z channels settles poorly
        self.convert(cmd::X)?;

        let mut xs = [0u16; 3];
        let mut ys = [0u16; 3];
        for i in 0..3 {
            xs[i] = self.convert(cmd::X)?;
            ys[i] = self.convert(if i == 2 { cmd::Y_POWER_DOWN } else { cmd::Y })?;
        }

        let x = best_two_average(xs[0], xs[1], xs[2]);
        let y = best_two_average(ys[0], ys[1], ys[2]);
        let (x, y) = rotate(x, y, self.rotation);
        Ok(RawSample::new(x, y, z))
    }
}

impl<SPI, IRQ> Digitizer for Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    type Error = TouchError;

    fn touched(&mut self) -> bool {
        match self.pen_down() {
            Ok(Some(false)) => return false,
            Ok(_) => {}
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("PENIRQ read failed: {}", _e);
                return false;
            }
        }

        match self.pressure(cmd::Z2_POWER_DOWN) {
            Ok(z) => z >= self.z_threshold,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("touch pressure read failed: {}", _e);
                false
            }
        }
    }

    fn get_point(&mut self) -> Result<RawSample, TouchError> {
        self.sample()
    }
}

/// Average of the two readings closest to each other
pub fn best_two_average(a: u16, b: u16, c: u16) -> u16 {
    let ab = a.abs_diff(b);
    let ac = a.abs_diff(c);
    let bc = b.abs_diff(c);

    let (p, q) = if ab <= ac && ab <= bc {
        (a, b)
    } else if ac <= ab && ac <= bc {
        (a, c)
    } else {
        (b, c)
    };
    ((u32::from(p) + u32::from(q)) / 2) as u16
}

/// Map controller axes onto the panel's rotation
pub fn rotate(x: u16, y: u16, rotation: Rotation) -> (u16, u16) {
    match rotation {
        Rotation::Portrait => (RAW_MAX - y, x),
        Rotation::Landscape => (x, y),
        Rotation::PortraitFlipped => (y, RAW_MAX - x),
        Rotation::LandscapeFlipped => (RAW_MAX - x, RAW_MAX - y),
    }
}

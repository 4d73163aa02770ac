//! ILI9341 TFT controller driver
//!
//! 240x320 native portrait panel driven over 4-wire SPI (SCK, MOSI, CS and a
//! data/command select line) in 16-bit RGB565 mode.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use glasspane_hal::{PanelController, Rotation};

/// Native panel width (portrait)
pub const NATIVE_WIDTH: u16 = 240;

/// Native panel height (portrait)
pub const NATIVE_HEIGHT: u16 = 320;

/// Bytes sent per SPI transaction while streaming pixels
const CHUNK_BYTES: usize = 64;

/// ILI9341 commands
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const GAMMASET: u8 = 0x26;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const PIXFMT: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const DFUNCTR: u8 = 0xB6;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const VMCTR1: u8 = 0xC5;
    pub const VMCTR2: u8 = 0xC7;
}

/// Memory access control bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
    pub const BGR: u8 = 0x08;
}

/// 16 bits per pixel on both interfaces
const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// Power, VCOM, frame rate and gamma setup sent after reset
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::PWCTR1, &[0x23]),
    (cmd::PWCTR2, &[0x10]),
    (cmd::VMCTR1, &[0x3E, 0x28]),
    (cmd::VMCTR2, &[0x86]),
    (cmd::PIXFMT, &[PIXEL_FORMAT_RGB565]),
    (cmd::FRMCTR1, &[0x00, 0x18]),
    (cmd::DFUNCTR, &[0x08, 0x82, 0x27]),
    (cmd::GAMMASET, &[0x01]),
];

/// Display controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// SPI transfer failed
    Spi,
    /// Data/command pin could not be driven
    Gpio,
    /// Window or pixel write outside a write transaction
    NoTransaction,
    /// Write transaction already open
    Busy,
    /// Window empty or outside the panel
    InvalidWindow,
}

/// MADCTL value for a rotation (row/column exchange and mirroring, BGR order)
pub const fn madctl_for(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::Portrait => madctl::MX | madctl::BGR,
        Rotation::Landscape => madctl::MV | madctl::BGR,
        Rotation::PortraitFlipped => madctl::MY | madctl::BGR,
        Rotation::LandscapeFlipped => madctl::MX | madctl::MY | madctl::MV | madctl::BGR,
    }
}

/// ILI9341 driver
pub struct Ili9341<SPI, DC> {
    spi: SPI,
    dc: DC,
    rotation: Rotation,
    in_write: bool,
}

impl<SPI, DC> Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create a driver; call [`Ili9341::init`] before drawing
    pub fn new(spi: SPI, dc: DC, rotation: Rotation) -> Self {
        Self {
            spi,
            dc,
            rotation,
            in_write: false,
        }
    }

    /// Reset and configure the controller, then turn the display on
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError> {
        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);

        for (command, data) in INIT_SEQUENCE {
            self.command(*command, data)?;
        }
        self.command(cmd::MADCTL, &[madctl_for(self.rotation)])?;

        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);
        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(20);

        #[cfg(feature = "defmt")]
        defmt::info!("ILI9341 ready, rotation {}", self.rotation);

        Ok(())
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Fill the whole panel with one color
    pub fn fill(&mut self, color: u16) -> Result<(), PanelError> {
        let (width, height) = self.dimensions();
        self.begin_write()?;
        let result = self.fill_window(width, height, color);
        self.in_write = false;
        result
    }

    fn fill_window(&mut self, width: u16, height: u16, color: u16) -> Result<(), PanelError> {
        self.set_address_window(0, 0, width, height)?;

        let mut chunk = [0u8; CHUNK_BYTES];
        for pair in chunk.chunks_exact_mut(2) {
            pair.copy_from_slice(&color.to_be_bytes());
        }

        let mut remaining = width as usize * height as usize * 2;
        self.dc.set_high().map_err(|_| PanelError::Gpio)?;
        while remaining > 0 {
            let n = remaining.min(CHUNK_BYTES);
            self.spi.write(&chunk[..n]).map_err(|_| PanelError::Spi)?;
            remaining -= n;
        }
        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Gpio)?;
        self.spi.write(&[command]).map_err(|_| PanelError::Spi)?;
        if !data.is_empty() {
            self.dc.set_high().map_err(|_| PanelError::Gpio)?;
            self.spi.write(data).map_err(|_| PanelError::Spi)?;
        }
        Ok(())
    }
}

impl<SPI, DC> PanelController for Ili9341<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = PanelError;

    fn begin_write(&mut self) -> Result<(), PanelError> {
        if self.in_write {
            return Err(PanelError::Busy);
        }
        self.in_write = true;
        Ok(())
    }

    fn set_address_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), PanelError> {
        if !self.in_write {
            return Err(PanelError::NoTransaction);
        }
        let (panel_width, panel_height) = self.dimensions();
        if width == 0
            || height == 0
            || u32::from(x) + u32::from(width) > u32::from(panel_width)
            || u32::from(y) + u32::from(height) > u32::from(panel_height)
        {
            return Err(PanelError::InvalidWindow);
        }

        let x_end = x + width - 1;
        let y_end = y + height - 1;
        let [x0, x1] = x.to_be_bytes();
        let [xe0, xe1] = x_end.to_be_bytes();
        let [y0, y1] = y.to_be_bytes();
        let [ye0, ye1] = y_end.to_be_bytes();

        self.command(cmd::CASET, &[x0, x1, xe0, xe1])?;
        self.command(cmd::PASET, &[y0, y1, ye0, ye1])?;
        self.command(cmd::RAMWR, &[])
    }

    fn push_pixels(&mut self, pixels: &[u16], swap_bytes: bool) -> Result<(), PanelError> {
        if !self.in_write {
            return Err(PanelError::NoTransaction);
        }
        self.dc.set_high().map_err(|_| PanelError::Gpio)?;

        let mut chunk = [0u8; CHUNK_BYTES];
        for pixels in pixels.chunks(CHUNK_BYTES / 2) {
            for (bytes, pixel) in chunk.chunks_exact_mut(2).zip(pixels) {
                let encoded = if swap_bytes {
                    pixel.to_be_bytes()
                } else {
                    pixel.to_le_bytes()
                };
                bytes.copy_from_slice(&encoded);
            }
            self.spi
                .write(&chunk[..pixels.len() * 2])
                .map_err(|_| PanelError::Spi)?;
        }
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), PanelError> {
        self.in_write = false;
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        if self.rotation.swaps_axes() {
            (NATIVE_HEIGHT, NATIVE_WIDTH)
        } else {
            (NATIVE_WIDTH, NATIVE_HEIGHT)
        }
    }
}
